//! Потокобезопасный pluggable logger
//!
//! Симуляция не знает, куда пишет presentation layer (console, engine
//! console, файл) — поэтому sink подключается через trait object.
//! По умолчанию (headless runner, тесты) — stdout.

use once_cell::sync::Lazy;
use std::sync::Mutex;

static SINK: Lazy<Mutex<Option<Box<dyn LogSink>>>> = Lazy::new(|| Mutex::new(None));
static MIN_LEVEL: Lazy<Mutex<LogLevel>> = Lazy::new(|| Mutex::new(LogLevel::Debug));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

pub trait LogSink: Send + Sync {
    fn write(&self, level: LogLevel, message: &str);
}

pub fn set_sink(sink: Box<dyn LogSink>) {
    *SINK.lock().unwrap() = Some(sink);
}

pub fn set_min_level(level: LogLevel) {
    *MIN_LEVEL.lock().unwrap() = level;
}

/// Ставит sink только если его ещё нет (idempotent init из тестов)
pub fn set_sink_if_needed(sink: Box<dyn LogSink>) {
    let mut guard = SINK.lock().unwrap();
    if guard.is_none() {
        *guard = Some(sink);
    }
}

pub fn log_debug(message: &str) {
    log_with_level(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    log_with_level(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_with_level(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_with_level(LogLevel::Error, message);
}

pub fn log_with_level(level: LogLevel, message: &str) {
    if level < *MIN_LEVEL.lock().unwrap() {
        return;
    }
    // Timestamp добавляем здесь, не в sink'ах
    if let Some(sink) = SINK.lock().unwrap().as_ref() {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        sink.write(level, &format!("[{}] {}", timestamp, message));
    }
}

struct StdoutSink;

impl LogSink for StdoutSink {
    fn write(&self, level: LogLevel, message: &str) {
        println!("[{}] {}", level.as_str(), message);
    }
}

pub fn init_stdout_logger() {
    set_sink_if_needed(Box::new(StdoutSink));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_level_labels() {
        assert_eq!(LogLevel::Warning.as_str(), "WARNING");
        assert_eq!(LogLevel::Error.as_str(), "ERROR");
    }
}
