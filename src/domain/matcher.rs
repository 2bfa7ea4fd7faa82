use std::borrow::Cow;

use super::options::{FindOptions, MatchScope};
use super::pattern::Pattern;
use super::template::{MatchPolicy, TemplateSet};

/// 根据配置选择匹配对象并处理大小写
#[derive(Debug, Clone)]
pub struct MatchEngine {
    templates: TemplateSet,
    policy: MatchPolicy,
    scope: MatchScope,
    insensitive: bool,
}

impl MatchEngine {
    /// 不区分大小写时，过滤字符串和匹配对象都转为小写
    pub fn new(
        pattern: &Pattern,
        policy: MatchPolicy,
        scope: MatchScope,
        insensitive: bool,
    ) -> Self {
        let templates = if insensitive {
            pattern.to_templates(str::to_lowercase)
        } else {
            pattern.to_templates(str::to_string)
        };

        Self {
            templates,
            policy,
            scope,
            insensitive,
        }
    }

    pub fn from_options(pattern: &Pattern, options: &FindOptions) -> Self {
        Self::new(pattern, options.policy(), options.scope(), options.insensitive)
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// 检查目录项是否匹配
    pub fn is_match(&self, name: &str, full_path: &str) -> bool {
        let target = match self.scope {
            MatchScope::Name => name,
            MatchScope::FullPath => full_path,
        };

        let target: Cow<'_, str> = if self.insensitive {
            Cow::Owned(target.to_lowercase())
        } else {
            Cow::Borrowed(target)
        };

        self.templates.matches(self.policy, &target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_scope() {
        let engine = MatchEngine::new(&"*.txt".into(), MatchPolicy::Any, MatchScope::Name, false);
        assert!(engine.is_match("a.txt", "/tmp/x/a.txt"));
        assert!(!engine.is_match("a.log", "/tmp/x.txt/a.log"));
    }

    #[test]
    fn test_full_path_scope() {
        let engine =
            MatchEngine::new(&"*sub*".into(), MatchPolicy::Any, MatchScope::FullPath, false);
        assert!(engine.is_match("file", "/tmp/sub/file"));
        assert!(!engine.is_match("sub", "/tmp/other"));
    }

    #[test]
    fn test_case_insensitive() {
        let engine = MatchEngine::new(&"*README*".into(), MatchPolicy::Any, MatchScope::Name, true);
        assert!(engine.is_match("readme.md", ""));
        assert!(engine.is_match("ReadMe.md", ""));

        let sensitive =
            MatchEngine::new(&"*README*".into(), MatchPolicy::Any, MatchScope::Name, false);
        assert!(!sensitive.is_match("readme.md", ""));
    }

    #[test]
    fn test_policy_from_options() {
        let pattern = Pattern::from(["*a*", "*b*"]);
        let all = MatchEngine::from_options(&pattern, &FindOptions::new().with_match_all(true));
        let any = MatchEngine::from_options(&pattern, &FindOptions::new());

        assert!(all.is_match("cab", ""));
        assert!(!all.is_match("ca", ""));
        assert!(any.is_match("ca", ""));
        assert!(!any.is_match("xyz", ""));
    }
}
