use std::env;
use std::fs::{self, DirEntry};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;

use super::cancel::CancellationToken;
use super::error::{FindError, FindResult};
use super::matcher::MatchEngine;
use super::options::FindOptions;
// 使用infrastructure层的LoggerTrait
use crate::infrastructure::{ErrorLogger, ErrorType, LoggerTrait};
use crate::presentation::display::write_result;

/// 查找结果的接收端
pub trait ResultSink {
    fn deliver(&mut self, path: PathBuf) -> FindResult<()>;
}

impl ResultSink for Vec<PathBuf> {
    fn deliver(&mut self, path: PathBuf) -> FindResult<()> {
        self.push(path);
        Ok(())
    }
}

/// 接收方已关闭时停止遍历
impl ResultSink for Sender<PathBuf> {
    fn deliver(&mut self, path: PathBuf) -> FindResult<()> {
        self.send(path).map_err(|_| FindError::Cancelled)
    }
}

/// 遍历统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkStats {
    pub visited: u64,
    pub matches: u64,
    pub skipped: u64,
}

/// 解析符号链接并转为绝对路径
pub fn resolve_path(path: &Path) -> io::Result<PathBuf> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.file_type().is_symlink() {
        return fs::canonicalize(path);
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };

    // components() 会去掉路径中间的 '.'
    Ok(absolute.components().collect())
}

/// 一次性读取目录的全部条目
fn list_dir(dir: &Path) -> io::Result<Vec<DirEntry>> {
    fs::read_dir(dir)?.collect()
}

/// 单次查找的目录遍历器
///
/// 深度优先、单线程。每处理一个目录项前检查一次取消信号，
/// 结果数达到上限后立即停止，不再访问后续条目。
pub struct FileWalker<'a> {
    options: &'a FindOptions,
    matcher: &'a MatchEngine,
    cancel: &'a CancellationToken,
    logger: &'a dyn LoggerTrait,
    error_logger: &'a ErrorLogger,
    output: Option<&'a mut dyn Write>,
    remaining: Option<usize>,
    resolved_root: PathBuf,
    original_root: PathBuf,
    // 当前目录链的规范路径，用于发现符号链接循环
    ancestors: Vec<PathBuf>,
    stats: WalkStats,
}

impl<'a> FileWalker<'a> {
    pub fn new(
        options: &'a FindOptions,
        matcher: &'a MatchEngine,
        cancel: &'a CancellationToken,
        logger: &'a dyn LoggerTrait,
        error_logger: &'a ErrorLogger,
        output: Option<&'a mut dyn Write>,
    ) -> Self {
        Self {
            options,
            matcher,
            cancel,
            logger,
            error_logger,
            output,
            remaining: options.max_results,
            resolved_root: PathBuf::new(),
            original_root: PathBuf::new(),
            ancestors: Vec::new(),
            stats: WalkStats::default(),
        }
    }

    /// 遍历 `root`，把匹配结果交给 `sink`
    ///
    /// 根路径解析失败或根目录无法读取时总是返回错误，与错误策略无关。
    pub fn walk(mut self, root: &Path, sink: &mut dyn ResultSink) -> FindResult<WalkStats> {
        let root_error = |source| FindError::RootResolution {
            path: root.to_path_buf(),
            source,
        };

        let resolved = resolve_path(root).map_err(root_error)?;
        let canonical = fs::canonicalize(&resolved).map_err(root_error)?;

        self.log(|| format!("开始查找: {}", resolved.display()))?;

        let entries = list_dir(&resolved).map_err(|source| FindError::DirectoryRead {
            path: resolved.clone(),
            source,
        })?;

        self.resolved_root = resolved.clone();
        self.original_root = root.to_path_buf();
        self.ancestors.push(canonical);

        if self.exhausted() {
            return Ok(self.stats);
        }

        self.visit_entries(&resolved, entries, sink)?;
        Ok(self.stats)
    }

    fn exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    fn log<F>(&self, message: F) -> FindResult<()>
    where
        F: FnOnce() -> String,
    {
        if self.logger.is_enabled() {
            self.logger
                .log_message(&message())
                .map_err(FindError::SinkWrite)?;
        }
        Ok(())
    }

    fn visit_entries(
        &mut self,
        dir: &Path,
        entries: Vec<DirEntry>,
        sink: &mut dyn ResultSink,
    ) -> FindResult<()> {
        if self.logger.is_enabled() {
            self.logger
                .log_dir(dir, entries.len())
                .map_err(FindError::SinkWrite)?;
        }

        for entry in entries {
            if self.exhausted() {
                break;
            }
            self.cancel.check()?;
            self.stats.visited += 1;

            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            let path = dir.join(&file_name);

            let is_dir = match entry_is_dir(&entry, &path) {
                Ok(is_dir) => is_dir,
                Err(source) => {
                    let err = FindError::DirectoryRead {
                        path: path.clone(),
                        source,
                    };
                    self.skip_or_fail(err, ErrorType::EntryMetadata, &path)?;
                    continue;
                }
            };

            if self.options.entry_type.accepts(is_dir)
                && self.matcher.is_match(&name, &path.to_string_lossy())
            {
                let value = self.emitted_value(&file_name, &path);
                self.emit(value, sink)?;

                if self.exhausted() {
                    return Ok(());
                }
            }

            if is_dir && self.options.recursive {
                self.descend(&path, sink)?;
            }
        }

        Ok(())
    }

    /// 进入子目录，子目录同样经过符号链接解析
    fn descend(&mut self, path: &Path, sink: &mut dyn ResultSink) -> FindResult<()> {
        let resolved = resolve_path(path).and_then(|resolved| {
            let canonical = fs::canonicalize(&resolved)?;
            Ok((resolved, canonical))
        });
        let (resolved, canonical) = match resolved {
            Ok(paths) => paths,
            Err(source) => {
                let err = FindError::DirectoryRead {
                    path: path.to_path_buf(),
                    source,
                };
                return self.skip_or_fail(err, ErrorType::DirectoryRead, path);
            }
        };

        if self.ancestors.contains(&canonical) {
            return self.log(|| {
                format!("跳过符号链接循环: {} -> {}", path.display(), canonical.display())
            });
        }

        let entries = match list_dir(&resolved) {
            Ok(entries) => entries,
            Err(source) => {
                let err = FindError::DirectoryRead {
                    path: resolved.clone(),
                    source,
                };
                return self.skip_or_fail(err, ErrorType::DirectoryRead, &resolved);
            }
        };

        self.ancestors.push(canonical);
        let result = self.visit_entries(&resolved, entries, sink);
        self.ancestors.pop();
        result
    }

    /// 计算输出值：完整路径、名称或保留原始根路径形式的路径
    fn emitted_value(&self, file_name: &std::ffi::OsStr, path: &Path) -> PathBuf {
        if self.options.name_only {
            return PathBuf::from(file_name);
        }

        if self.options.relative_paths {
            if let Ok(rest) = path.strip_prefix(&self.resolved_root) {
                return self.original_root.join(rest);
            }
        }

        path.to_path_buf()
    }

    fn emit(&mut self, value: PathBuf, sink: &mut dyn ResultSink) -> FindResult<()> {
        if let Some(output) = self.output.as_mut() {
            write_result(&mut **output, &value).map_err(FindError::SinkWrite)?;
        }

        sink.deliver(value)?;
        self.stats.matches += 1;

        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(1);
        }

        Ok(())
    }

    /// 按错误策略处理子目录错误
    fn skip_or_fail(
        &mut self,
        err: FindError,
        error_type: ErrorType,
        path: &Path,
    ) -> FindResult<()> {
        if !self.options.errors.skips() {
            return Err(err);
        }

        self.stats.skipped += 1;

        if self.options.errors.logs() {
            // 路径单独记录，消息只保留底层错误
            let message = match std::error::Error::source(&err) {
                Some(source) => source.to_string(),
                None => err.to_string(),
            };
            self.error_logger
                .log_error(error_type, Some(path), &message, None)
                .map_err(FindError::SinkWrite)?;
        }

        Ok(())
    }
}

/// 符号链接按目标类型判断，损坏的链接视为非目录
fn entry_is_dir(entry: &DirEntry, path: &Path) -> io::Result<bool> {
    let file_type = entry.file_type()?;
    if file_type.is_symlink() {
        return Ok(fs::metadata(path).map_or(false, |metadata| metadata.is_dir()));
    }
    Ok(file_type.is_dir())
}
