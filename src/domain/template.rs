use std::path::MAIN_SEPARATOR;

/// 匹配任意路径的通配符
const WILDCARD: &str = "*";

/// 解析后的单个过滤条件
///
/// 过滤字符串支持以下写法：
///
/// ```text
/// *str*    路径段包含 str
/// str      路径段等于 str
/// *str     路径段以 str 结尾
/// str*     路径段以 str 开头
/// !...     对上述结果取反
/// a&b      a 匹配且 b 匹配
/// a|b      a 匹配或 b 匹配
/// ```
///
/// 没有括号，也没有运算符优先级：字符串中第一个 `&` 或 `|` 把它分成
/// 左侧叶子和右侧剩余部分，剩余部分整体递归解析为一个后续条件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    base: String,
    negate: bool,
    anchor_left: bool,
    anchor_right: bool,
    and_next: Option<Box<Template>>,
    or_next: Option<Box<Template>>,
}

impl Template {
    /// 从过滤字符串创建模板
    pub fn parse(filter: &str) -> Self {
        let Some(sep) = filter.find(|c: char| c == '&' || c == '|') else {
            return Self::parse_leaf(filter);
        };

        let leaf = Self::parse_leaf(&filter[..sep]);
        let rest = Self::parse(&filter[sep + 1..]);

        if filter.as_bytes()[sep] == b'&' {
            leaf.and(rest)
        } else {
            leaf.or(rest)
        }
    }

    /// 解析不含 `&`、`|` 的叶子条件
    fn parse_leaf(leaf: &str) -> Self {
        let (negate, rest) = match leaf.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, leaf),
        };

        // 单独的 '*' 匹配一切，忽略 '!'
        if rest == WILDCARD {
            return Self {
                base: WILDCARD.to_string(),
                negate,
                anchor_left: false,
                anchor_right: false,
                and_next: None,
                or_next: None,
            };
        }

        let anchor_left = !rest.starts_with('*');
        let rest = rest.strip_prefix('*').unwrap_or(rest);
        let anchor_right = !rest.ends_with('*');
        let base = rest.strip_suffix('*').unwrap_or(rest);

        Self {
            base: base.to_string(),
            negate,
            anchor_left,
            anchor_right,
            and_next: None,
            or_next: None,
        }
    }

    /// 附加 AND 后续条件
    pub fn and(mut self, next: Template) -> Self {
        self.and_next = Some(Box::new(next));
        self
    }

    /// 附加 OR 后续条件
    pub fn or(mut self, next: Template) -> Self {
        self.or_next = Some(Box::new(next));
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }

    pub fn is_anchored_left(&self) -> bool {
        self.anchor_left
    }

    pub fn is_anchored_right(&self) -> bool {
        self.anchor_right
    }

    pub fn and_next(&self) -> Option<&Template> {
        self.and_next.as_deref()
    }

    pub fn or_next(&self) -> Option<&Template> {
        self.or_next.as_deref()
    }

    /// 检查字符串是否匹配模板
    ///
    /// OR 后续条件只在本节点直接匹配失败时求值；AND 后续条件只在
    /// (经过 OR 回退后) 结果为真时求值。
    pub fn matches(&self, candidate: &str) -> bool {
        let mut matched = self.direct_match(candidate);

        if !matched {
            if let Some(or_next) = &self.or_next {
                matched = or_next.matches(candidate);
            }
        }

        if !matched {
            return false;
        }

        match &self.and_next {
            Some(and_next) => and_next.matches(candidate),
            None => true,
        }
    }

    /// 只检查本节点的叶子条件
    fn direct_match(&self, candidate: &str) -> bool {
        if self.base == WILDCARD {
            return true;
        }
        if self.base.is_empty() {
            return false;
        }

        let Some((left, right)) = candidate.split_once(self.base.as_str()) else {
            // 不包含时，取反条件视为匹配
            return self.negate;
        };

        let left_ok = left.is_empty() || left.ends_with(MAIN_SEPARATOR);
        let right_ok = right.is_empty() || right.starts_with(MAIN_SEPARATOR);

        let bounded = match (self.anchor_left, self.anchor_right) {
            (true, true) => left_ok && right_ok,
            (true, false) => left_ok,
            (false, true) => right_ok,
            (false, false) => true,
        };

        bounded != self.negate
    }
}

/// 多个模板的组合方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// 任意模板匹配即可
    #[default]
    Any,
    /// 所有模板都必须匹配
    All,
}

/// 按顺序排列、彼此独立解析的模板集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSet {
    templates: Vec<Template>,
}

impl TemplateSet {
    /// 把字符串列表逐个解析为模板
    pub fn parse<I, S>(filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        filters
            .into_iter()
            .map(|filter| Template::parse(filter.as_ref()))
            .collect()
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// 任意模板匹配时返回 true
    pub fn match_any(&self, candidate: &str) -> bool {
        self.templates.iter().any(|t| t.matches(candidate))
    }

    /// 所有模板都匹配时返回 true
    pub fn match_all(&self, candidate: &str) -> bool {
        self.templates.iter().all(|t| t.matches(candidate))
    }

    pub fn matches(&self, policy: MatchPolicy, candidate: &str) -> bool {
        match policy {
            MatchPolicy::Any => self.match_any(candidate),
            MatchPolicy::All => self.match_all(candidate),
        }
    }
}

impl FromIterator<Template> for TemplateSet {
    fn from_iter<I: IntoIterator<Item = Template>>(iter: I) -> Self {
        Self {
            templates: iter.into_iter().collect(),
        }
    }
}

/// 任意模板匹配时返回 true
pub fn match_any(set: &TemplateSet, candidate: &str) -> bool {
    set.match_any(candidate)
}

/// 所有模板都匹配时返回 true
pub fn match_all(set: &TemplateSet, candidate: &str) -> bool {
    set.match_all(candidate)
}
