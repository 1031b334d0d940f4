//! Scheduled-task queue — отложенные вызовы против frame clock
//!
//! Вместо вложенных delayed-callback замыканий — одна очередь
//! (fire_at_ms, task), которую тик дренирует после продвижения часов.
//! Это даёт:
//! - тривиальную cancel/refresh семантику для buff revert'ов
//!   (re-collect того же баффа = cancel + schedule заново);
//! - детерминированный fast-forward в тестах без реальных задержек.
//!
//! "Suspension" в этой системе — только такие задачи; никакой
//! настоящей конкурентности нет, всё на одном тике.

use bevy::prelude::*;

use crate::components::powerup::PowerUpKind;

/// Часы симуляции (мс от старта сессии). Двигаются ПЕРВЫМИ в тике.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SimClock {
    pub elapsed_ms: f64,
}

/// Закрытый набор отложенных задач
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    /// Revert баффа (one-shot, cancel-on-reactivation)
    ClearBuff(PowerUpKind),
    /// Конец анонс-паузы в начале волны
    EndWavePause,
    /// Открыть магазин после клира волны
    OpenShop,
    /// Handoff в game-over сцену
    FinishGameOver,
}

#[derive(Debug, Clone, Copy)]
struct TaskEntry {
    fire_at_ms: f64,
    seq: u64,
    task: ScheduledTask,
}

/// Очередь отложенных задач
#[derive(Resource, Debug, Default)]
pub struct TaskQueue {
    entries: Vec<TaskEntry>,
    next_seq: u64,
}

impl TaskQueue {
    pub fn schedule_in(&mut self, clock: &SimClock, delay_ms: f64, task: ScheduledTask) {
        self.entries.push(TaskEntry {
            fire_at_ms: clock.elapsed_ms + delay_ms,
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
    }

    /// Снимает revert конкретного баффа (refresh duration при re-collect)
    pub fn cancel_buff(&mut self, kind: PowerUpKind) {
        self.entries
            .retain(|e| e.task != ScheduledTask::ClearBuff(kind));
    }

    /// Снимает wave-transition задачи (на game over шоп не открываем)
    pub fn cancel_wave_transitions(&mut self) {
        self.entries.retain(|e| {
            !matches!(e.task, ScheduledTask::EndWavePause | ScheduledTask::OpenShop)
        });
    }

    /// Забирает созревшие задачи в порядке (fire_at, seq)
    pub fn take_due(&mut self, clock: &SimClock) -> Vec<ScheduledTask> {
        let mut due: Vec<TaskEntry> = Vec::new();
        self.entries.retain(|e| {
            if e.fire_at_ms <= clock.elapsed_ms {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| {
            a.fire_at_ms
                .partial_cmp(&b.fire_at_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
        due.into_iter().map(|e| e.task).collect()
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn has_task(&self, task: ScheduledTask) -> bool {
        self.entries.iter().any(|e| e.task == task)
    }
}

/// System: продвижение часов симуляции (первым в тике)
pub fn advance_clock(time: Res<Time>, mut clock: ResMut<SimClock>) {
    clock.elapsed_ms += time.delta_secs_f64() * 1000.0;
}
