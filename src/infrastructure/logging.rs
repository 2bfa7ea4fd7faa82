use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Local;

use crate::presentation::display::{format_duration, FindSummary};

/// 日志记录器trait
pub trait LoggerTrait: Send + Sync {
    fn is_enabled(&self) -> bool;
    fn log_message(&self, message: &str) -> io::Result<()>;
    fn log_dir(&self, path: &Path, entries: usize) -> io::Result<()>;
    fn finalize(&self, summary: &FindSummary) -> io::Result<()>;
}

type SharedWriter = Arc<Mutex<Option<Box<dyn Write + Send>>>>;

/// 调试日志记录器（记录遍历过程）
pub struct Logger {
    writer: SharedWriter,
    enabled: bool,
}

impl Logger {
    /// 不输出任何内容的记录器
    pub fn disabled() -> Self {
        Self {
            writer: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    /// 写入任意输出目标
    pub fn from_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Some(writer))),
            enabled: true,
        }
    }

    pub fn stderr() -> Self {
        Self::from_writer(Box::new(io::stderr()))
    }

    /// 追加写入日志文件
    pub fn to_file(log_path: &Path) -> io::Result<Self> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        // 写入日志头部信息
        let now = Local::now();
        writeln!(file, "# pathfind 调试日志")?;
        writeln!(file, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file, "# --------------------------------------------")?;

        Ok(Self::from_writer(Box::new(file)))
    }

    fn write_line(&self, line: std::fmt::Arguments<'_>) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if let Ok(mut writer_guard) = self.writer.lock() {
            if let Some(ref mut writer) = *writer_guard {
                writer.write_fmt(line)?;
                writer.write_all(b"\n")?;
                writer.flush()?;
            }
        }

        Ok(())
    }
}

impl LoggerTrait for Logger {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn log_message(&self, message: &str) -> io::Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        self.write_line(format_args!("[{}] {}", timestamp, message))
    }

    fn log_dir(&self, path: &Path, entries: usize) -> io::Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        self.write_line(format_args!(
            "[{}] 目录: {} | 条目: {}",
            timestamp,
            path.display(),
            entries
        ))
    }

    fn finalize(&self, summary: &FindSummary) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let now = Local::now();
        self.write_line(format_args!("# --------------------------------------------"))?;
        self.write_line(format_args!("# 查找完成时间: {}", now.format("%Y-%m-%d %H:%M:%S")))?;
        self.write_line(format_args!("# 总用时: {}", format_duration(summary.duration)))?;
        self.write_line(format_args!("# 访问条目数: {}", summary.visited_entries))?;
        self.write_line(format_args!("# 匹配数: {}", summary.matches))?;
        self.write_line(format_args!("# 跳过错误数: {}", summary.skipped_errors))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_logger_creation() {
        let logger = Logger::disabled();
        assert!(!logger.is_enabled());
        assert!(logger.log_message("ignored").is_ok());

        let logger = Logger::from_writer(Box::new(io::sink()));
        assert!(logger.is_enabled());
    }

    #[test]
    fn test_logger_trait() {
        let buffer = SharedBuffer::default();
        let logger = Logger::from_writer(Box::new(buffer.clone()));
        let logger_trait: &dyn LoggerTrait = &logger;

        logger_trait.log_message("test message").unwrap();
        logger_trait.log_dir(Path::new("some/dir"), 3).unwrap();

        let summary = FindSummary {
            duration: Duration::from_millis(1500),
            visited_entries: 10,
            matches: 4,
            skipped_errors: 1,
        };
        logger_trait.finalize(&summary).unwrap();

        let contents = buffer.contents();
        assert!(contents.contains("test message"));
        assert!(contents.contains("some/dir"));
        assert!(contents.contains("1.500s"));
        assert!(contents.lines().next().unwrap().starts_with('['));
    }

    #[test]
    fn test_log_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("debug.log");

        let logger = Logger::to_file(&log_path).unwrap();
        logger.log_message("hello").unwrap();

        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert!(contents.starts_with("# pathfind"));
        assert!(contents.contains("hello"));
    }
}
