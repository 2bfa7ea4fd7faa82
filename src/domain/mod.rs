pub mod cancel;
pub mod error;
pub mod file_walker;
pub mod matcher;
pub mod options;
pub mod pattern;
pub mod template;

pub use cancel::CancellationToken;
pub use error::{FindError, FindResult};
pub use file_walker::{resolve_path, FileWalker, ResultSink, WalkStats};
pub use matcher::MatchEngine;
pub use options::{EntryType, ErrorPolicy, FindOptions, MatchScope, DEFAULT_QUEUE_CAPACITY};
pub use pattern::Pattern;
pub use template::{match_all, match_any, MatchPolicy, Template, TemplateSet};
