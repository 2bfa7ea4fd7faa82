use super::error::{FindError, FindResult};
use super::template::TemplateSet;

/// 查找模板输入：单个过滤字符串或过滤字符串列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Single(String),
    List(Vec<String>),
}

impl Pattern {
    /// 所有过滤字符串
    pub fn filters(&self) -> &[String] {
        match self {
            Pattern::Single(filter) => std::slice::from_ref(filter),
            Pattern::List(filters) => filters,
        }
    }

    /// 解析为模板集合，`fold` 作用于每个过滤字符串
    pub fn to_templates<F>(&self, fold: F) -> TemplateSet
    where
        F: Fn(&str) -> String,
    {
        TemplateSet::parse(self.filters().iter().map(|f| fold(f)))
    }
}

impl From<&str> for Pattern {
    fn from(filter: &str) -> Self {
        Pattern::Single(filter.to_string())
    }
}

impl From<String> for Pattern {
    fn from(filter: String) -> Self {
        Pattern::Single(filter)
    }
}

impl From<&String> for Pattern {
    fn from(filter: &String) -> Self {
        Pattern::Single(filter.clone())
    }
}

impl From<Vec<String>> for Pattern {
    fn from(filters: Vec<String>) -> Self {
        Pattern::List(filters)
    }
}

impl From<Vec<&str>> for Pattern {
    fn from(filters: Vec<&str>) -> Self {
        Pattern::List(filters.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Pattern {
    fn from(filters: &[&str]) -> Self {
        Pattern::List(filters.iter().map(|f| f.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Pattern {
    fn from(filters: [&str; N]) -> Self {
        Pattern::List(filters.iter().map(|f| f.to_string()).collect())
    }
}

impl TryFrom<&toml::Value> for Pattern {
    type Error = FindError;

    fn try_from(value: &toml::Value) -> FindResult<Self> {
        match value {
            toml::Value::String(filter) => Ok(Pattern::Single(filter.clone())),
            toml::Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    toml::Value::String(filter) => Ok(filter.clone()),
                    other => Err(FindError::InvalidPattern(format!(
                        "列表元素应为字符串, 实际为 {}",
                        other.type_str()
                    ))),
                })
                .collect::<FindResult<Vec<_>>>()
                .map(Pattern::List),
            other => Err(FindError::InvalidPattern(format!(
                "应为字符串或字符串列表, 实际为 {}",
                other.type_str()
            ))),
        }
    }
}

impl TryFrom<toml::Value> for Pattern {
    type Error = FindError;

    fn try_from(value: toml::Value) -> FindResult<Self> {
        Pattern::try_from(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Pattern::from("*.txt"), Pattern::Single("*.txt".to_string()));
        assert_eq!(
            Pattern::from(["*a*", "*b*"]).filters(),
            &["*a*".to_string(), "*b*".to_string()]
        );
        assert_eq!(Pattern::from("x").filters().len(), 1);
    }

    #[test]
    fn test_from_toml_value() {
        let single = Pattern::try_from(toml::Value::String("*x*".into())).unwrap();
        assert_eq!(single, Pattern::Single("*x*".into()));

        let list = toml::Value::Array(vec!["a".into(), "b".into()]);
        assert_eq!(
            Pattern::try_from(&list).unwrap(),
            Pattern::List(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn test_invalid_toml_value() {
        let number = toml::Value::Integer(42);
        assert!(matches!(
            Pattern::try_from(&number),
            Err(FindError::InvalidPattern(_))
        ));

        let mixed = toml::Value::Array(vec!["a".into(), toml::Value::Boolean(true)]);
        assert!(matches!(
            Pattern::try_from(mixed),
            Err(FindError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_folded_templates() {
        let set = Pattern::from("*ABC*").to_templates(str::to_lowercase);
        assert!(set.match_any("xabcx"));
        assert!(!set.match_any("xABCx"));
    }
}
