use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::finder::Finder;
use crate::domain::{FindOptions, FindResult, Pattern};

/// 保存在 TOML 文件中的查找配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 查找目标
    pub search: SearchConfig,
    /// 查找选项
    #[serde(default)]
    pub options: FindOptions,
}

/// 查找目标配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// 查找的根目录
    pub root: PathBuf,
    /// 过滤字符串或过滤字符串列表，读取时不校验类型
    pub pattern: toml::Value,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                root: PathBuf::from("."),
                pattern: toml::Value::String("*".to_string()),
            },
            options: FindOptions::default(),
        }
    }
}

impl Config {
    /// 从配置文件加载配置，如果文件不存在则创建默认配置文件
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            let config = Self::default();
            config.save_to_file(config_path)?;
            Ok(config)
        }
    }

    /// 从文件加载配置
    pub fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("无法读取配置文件: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", config_path.display()))?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, config_path: &Path) -> Result<()> {
        // 确保目录存在
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("无法序列化配置")?;

        fs::write(config_path, content)
            .with_context(|| format!("无法写入配置文件: {}", config_path.display()))?;

        Ok(())
    }

    /// 解析配置中的模板
    pub fn pattern(&self) -> FindResult<Pattern> {
        Pattern::try_from(&self.search.pattern)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        self.options.validate()?;
        self.pattern()?;
        Ok(())
    }

    /// 按配置执行批量查找
    pub fn find(&self) -> Result<Vec<PathBuf>> {
        self.validate()?;
        let pattern = self.pattern()?;

        let results = Finder::new(self.options.clone())
            .find(&self.search.root, pattern)
            .with_context(|| format!("查找失败: {}", self.search.root.display()))?;

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntryType, FindError};
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search.root, PathBuf::from("."));
        assert_eq!(config.pattern().unwrap(), Pattern::from("*"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("find.toml");

        let created = Config::load_or_create(&config_path).unwrap();
        assert!(config_path.exists());

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(created.options, loaded.options);
        assert_eq!(loaded.pattern().unwrap(), Pattern::from("*"));
    }

    #[test]
    fn test_pattern_list_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("find.toml");
        fs::write(
            &config_path,
            r#"
            [search]
            root = "/srv/data"
            pattern = ["*a*", "*b*"]

            [options]
            entry_type = "folder"
            match_all = true
            "#,
        )
        .unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.options.entry_type, EntryType::Folder);
        assert!(config.options.match_all);
        assert_eq!(config.pattern().unwrap(), Pattern::from(["*a*", "*b*"]));
    }

    #[test]
    fn test_invalid_pattern_type() {
        let mut config = Config::default();
        config.search.pattern = toml::Value::Integer(7);

        assert!(matches!(config.pattern(), Err(FindError::InvalidPattern(_))));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.options.max_results = Some(0);
        assert!(config.validate().is_err());

        config = Config::default();
        config.options.queue_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_find_from_config() {
        let temp_dir = tempdir().unwrap();
        File::create(temp_dir.path().join("keep.txt")).unwrap();
        File::create(temp_dir.path().join("drop.log")).unwrap();

        let mut config = Config::default();
        config.search.root = temp_dir.path().to_path_buf();
        config.search.pattern = toml::Value::String("*.txt".to_string());

        let results = config.find().unwrap();
        assert_eq!(results, vec![temp_dir.path().join("keep.txt")]);
    }
}
