use serde::{Deserialize, Serialize};

use super::error::{FindError, FindResult};
use super::template::MatchPolicy;

/// 结果通道的默认容量
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// 查找对象类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// 只要文件（非目录）
    File,
    /// 只要目录
    Folder,
    /// 文件和目录
    #[default]
    Both,
}

impl EntryType {
    pub fn accepts(self, is_dir: bool) -> bool {
        match self {
            EntryType::Both => true,
            EntryType::File => !is_dir,
            EntryType::Folder => is_dir,
        }
    }
}

/// 子目录读取失败时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// 返回错误，终止查找
    #[default]
    Propagate,
    /// 跳过出错的分支
    Skip,
    /// 跳过并写入错误日志
    SkipAndLog,
}

impl ErrorPolicy {
    pub fn skips(self) -> bool {
        !matches!(self, ErrorPolicy::Propagate)
    }

    pub fn logs(self) -> bool {
        matches!(self, ErrorPolicy::SkipAndLog)
    }
}

/// 匹配对象：目录项名称或完整路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchScope {
    Name,
    FullPath,
}

/// 单次查找的配置
///
/// 查找期间不会被修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindOptions {
    /// 结果中包含文件、目录或两者
    pub entry_type: EntryType,
    /// 递归查找子目录
    pub recursive: bool,
    /// 输出中只保留名称
    pub name_only: bool,
    /// 要求所有模板都匹配
    pub match_all: bool,
    /// 匹配完整路径而不只是名称
    pub match_full_path: bool,
    /// 输出保留调用者给出的根路径形式，不使用解析后的路径。
    /// 与 `name_only` 同时设置时无效
    pub relative_paths: bool,
    /// 不区分大小写
    pub insensitive: bool,
    /// 最大结果数，`None` 表示不限制
    pub max_results: Option<usize>,
    pub errors: ErrorPolicy,
    /// 匹配后立即写入输出
    pub output: bool,
    /// 流式查找时结果通道的容量
    pub queue_capacity: usize,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            entry_type: EntryType::Both,
            recursive: false,
            name_only: false,
            match_all: false,
            match_full_path: false,
            relative_paths: false,
            insensitive: false,
            max_results: None,
            errors: ErrorPolicy::Propagate,
            output: false,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry_type(mut self, entry_type: EntryType) -> Self {
        self.entry_type = entry_type;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_name_only(mut self, name_only: bool) -> Self {
        self.name_only = name_only;
        self
    }

    pub fn with_match_all(mut self, match_all: bool) -> Self {
        self.match_all = match_all;
        self
    }

    pub fn with_full_path(mut self, match_full_path: bool) -> Self {
        self.match_full_path = match_full_path;
        self
    }

    pub fn with_relative_paths(mut self, relative_paths: bool) -> Self {
        self.relative_paths = relative_paths;
        self
    }

    pub fn with_insensitive(mut self, insensitive: bool) -> Self {
        self.insensitive = insensitive;
        self
    }

    pub fn with_max_results(mut self, max_results: Option<usize>) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_error_policy(mut self, errors: ErrorPolicy) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_output(mut self, output: bool) -> Self {
        self.output = output;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn policy(&self) -> MatchPolicy {
        if self.match_all {
            MatchPolicy::All
        } else {
            MatchPolicy::Any
        }
    }

    pub fn scope(&self) -> MatchScope {
        if self.match_full_path {
            MatchScope::FullPath
        } else {
            MatchScope::Name
        }
    }

    /// 验证选项的有效性
    pub fn validate(&self) -> FindResult<()> {
        if self.max_results == Some(0) {
            return Err(FindError::InvalidOptions(
                "max_results 必须大于 0".to_string(),
            ));
        }

        if self.queue_capacity == 0 {
            return Err(FindError::InvalidOptions(
                "queue_capacity 不能为 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = FindOptions::default();
        assert_eq!(options.entry_type, EntryType::Both);
        assert!(!options.recursive);
        assert_eq!(options.max_results, None);
        assert_eq!(options.errors, ErrorPolicy::Propagate);
        assert_eq!(options.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(options.policy(), MatchPolicy::Any);
        assert_eq!(options.scope(), MatchScope::Name);
    }

    #[test]
    fn test_entry_type_filter() {
        assert!(EntryType::Both.accepts(true));
        assert!(EntryType::Both.accepts(false));
        assert!(EntryType::File.accepts(false));
        assert!(!EntryType::File.accepts(true));
        assert!(EntryType::Folder.accepts(true));
        assert!(!EntryType::Folder.accepts(false));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let options: FindOptions = toml::from_str(
            r#"
            entry_type = "file"
            recursive = true
            errors = "skip_and_log"
            max_results = 3
            "#,
        )
        .unwrap();

        assert_eq!(options.entry_type, EntryType::File);
        assert!(options.recursive);
        assert!(options.errors.logs());
        assert_eq!(options.max_results, Some(3));
        assert_eq!(options.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert!(!options.insensitive);
    }

    #[test]
    fn test_validation() {
        assert!(FindOptions::new().validate().is_ok());
        assert!(FindOptions::new().with_max_results(Some(1)).validate().is_ok());
        assert!(matches!(
            FindOptions::new().with_max_results(Some(0)).validate(),
            Err(FindError::InvalidOptions(_))
        ));
        assert!(FindOptions::new().with_queue_capacity(0).validate().is_err());
    }
}
