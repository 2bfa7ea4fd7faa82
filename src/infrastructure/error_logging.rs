use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Local;

/// 错误类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// 目录读取错误
    DirectoryRead,
    /// 目录项类型无法确定
    EntryMetadata,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::DirectoryRead => "目录读取",
            ErrorType::EntryMetadata => "条目元数据",
        }
    }
}

/// 错误日志记录器，记录被跳过的错误并按类型计数
pub struct ErrorLogger {
    writer: Arc<Mutex<Option<Box<dyn Write + Send>>>>,
    error_path: Option<PathBuf>,
    enabled: bool,
    error_counts: Arc<Mutex<HashMap<ErrorType, usize>>>,
}

impl ErrorLogger {
    pub fn disabled() -> Self {
        Self {
            writer: Arc::new(Mutex::new(None)),
            error_path: None,
            enabled: false,
            error_counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn from_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Some(writer))),
            error_path: None,
            enabled: true,
            error_counts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn stderr() -> Self {
        Self::from_writer(Box::new(io::stderr()))
    }

    /// 追加写入错误日志文件
    pub fn to_file(error_path: &Path) -> io::Result<Self> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(error_path)?;

        // 写入错误日志头部信息
        let now = Local::now();
        writeln!(file, "# pathfind 错误日志")?;
        writeln!(file, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file, "# ============================================")?;
        writeln!(file)?;

        let mut logger = Self::from_writer(Box::new(file));
        logger.error_path = Some(error_path.to_path_buf());
        Ok(logger)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn error_path(&self) -> Option<&Path> {
        self.error_path.as_deref()
    }

    /// 记录错误
    pub fn log_error(
        &self,
        error_type: ErrorType,
        path: Option<&Path>,
        message: &str,
        details: Option<&str>,
    ) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

        // 更新错误计数
        if let Ok(mut counts) = self.error_counts.lock() {
            *counts.entry(error_type).or_insert(0) += 1;
        }

        if let Ok(mut writer_guard) = self.writer.lock() {
            if let Some(ref mut writer) = *writer_guard {
                writeln!(writer, "[{}] {} - {}", timestamp, error_type.as_str(), message)?;

                if let Some(path) = path {
                    writeln!(writer, "  路径: {}", path.display())?;
                }

                if let Some(detail) = details {
                    writeln!(writer, "  详细信息: {}", detail)?;
                }

                writer.flush()?;
            }
        }

        Ok(())
    }

    /// 获取错误统计信息
    pub fn error_summary(&self) -> HashMap<ErrorType, usize> {
        match self.error_counts.lock() {
            Ok(counts) => counts.clone(),
            Err(_) => HashMap::new(),
        }
    }

    pub fn total_errors(&self) -> usize {
        match self.error_counts.lock() {
            Ok(counts) => counts.values().sum(),
            Err(_) => 0,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors() > 0
    }

    /// 写入错误统计并结束记录
    pub fn finalize(&self) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let summary = self.error_summary();
        let total = self.total_errors();

        if let Ok(mut writer_guard) = self.writer.lock() {
            if let Some(ref mut writer) = *writer_guard {
                let now = Local::now();
                writeln!(writer, "# ============================================")?;
                writeln!(writer, "# 结束时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;

                if summary.is_empty() {
                    writeln!(writer, "# 无错误记录")?;
                } else {
                    writeln!(writer, "# 错误统计:")?;
                    for (error_type, count) in &summary {
                        writeln!(writer, "#   {}: {} 次", error_type.as_str(), count)?;
                    }
                    writeln!(writer, "#   总计: {} 个错误", total)?;
                }

                writer.flush()?;
            }
        }

        Ok(())
    }
}
