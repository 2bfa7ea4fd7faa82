use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 查找过程中可能出现的错误
#[derive(Debug, Error)]
pub enum FindError {
    /// 根路径无法解析（不存在、符号链接损坏或无法获取绝对路径）
    #[error("无法解析根路径 {path}: {source}")]
    RootResolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 目录无法列出
    #[error("无法读取目录 {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 取消信号触发
    #[error("查找已取消")]
    Cancelled,

    /// 模板既不是字符串也不是字符串列表
    #[error("无法识别模板类型: {0}")]
    InvalidPattern(String),

    /// 写入输出或日志失败
    #[error("写入输出失败: {0}")]
    SinkWrite(#[source] io::Error),

    #[error("无效的查找选项: {0}")]
    InvalidOptions(String),
}

pub type FindResult<T> = Result<T, FindError>;
