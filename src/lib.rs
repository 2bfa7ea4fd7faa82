//! 按边界感知的模板语言查找文件和目录
//!
//! 模板写法见 [`Template`]。查找支持递归、类型过滤、结果数上限、
//! 取消，以及批量和流式两种结果交付方式。
//!
//! ```no_run
//! use pathfind::{find, EntryType, FindOptions};
//!
//! let options = FindOptions::new()
//!     .with_recursive(true)
//!     .with_entry_type(EntryType::File);
//!
//! let results = find("path/to/the/source", "*.txt", options).unwrap();
//! ```

// 分层架构模块
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

// 重新导出主要类型
pub use domain::{
    match_all, match_any, CancellationToken, EntryType, ErrorPolicy, FindError, FindOptions,
    FindResult, MatchPolicy, Pattern, Template, TemplateSet,
};
pub use application::{find, find_streaming, Config, FindStream, Finder};
pub use infrastructure::{ErrorLogger, ErrorType, Logger, LoggerTrait};
pub use presentation::FindSummary;
