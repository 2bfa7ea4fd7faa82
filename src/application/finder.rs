use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{bounded, Receiver};

use crate::domain::{
    CancellationToken, FileWalker, FindError, FindOptions, FindResult, MatchEngine, Pattern,
    ResultSink,
};
use crate::infrastructure::{ErrorLogger, Logger, LoggerTrait};
use crate::presentation::FindSummary;

/// 查找器：持有选项以及取消令牌、日志和输出等协作对象
///
/// ```no_run
/// use pathfind::{EntryType, FindOptions, Finder};
///
/// let options = FindOptions::new()
///     .with_entry_type(EntryType::File)
///     .with_recursive(true);
///
/// let mut finder = Finder::new(options);
/// for path in finder.find("src", "*.rs").unwrap() {
///     println!("{}", path.display());
/// }
/// ```
pub struct Finder {
    options: FindOptions,
    cancel: CancellationToken,
    logger: Arc<dyn LoggerTrait>,
    error_logger: Option<Arc<ErrorLogger>>,
    output: Box<dyn Write + Send>,
}

impl Finder {
    pub fn new(options: FindOptions) -> Self {
        Self {
            options,
            cancel: CancellationToken::new(),
            logger: Arc::new(Logger::disabled()),
            error_logger: None,
            output: Box::new(io::stdout()),
        }
    }

    pub fn options(&self) -> &FindOptions {
        &self.options
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// 调试日志，默认不记录
    pub fn with_logger(mut self, logger: Arc<dyn LoggerTrait>) -> Self {
        self.logger = logger;
        self
    }

    /// `SkipAndLog` 策略使用的错误日志，默认写到标准错误
    pub fn with_error_logger(mut self, error_logger: Arc<ErrorLogger>) -> Self {
        self.error_logger = Some(error_logger);
        self
    }

    /// 设置立即输出的目标并开启立即输出
    pub fn with_output(mut self, output: Box<dyn Write + Send>) -> Self {
        self.output = output;
        self.options.output = true;
        self
    }

    /// 批量查找，遍历结束后返回全部结果
    pub fn find<P, T>(&mut self, root: P, pattern: T) -> FindResult<Vec<PathBuf>>
    where
        P: AsRef<Path>,
        T: Into<Pattern>,
    {
        self.find_with_summary(root, pattern).map(|(results, _)| results)
    }

    /// 批量查找并返回查找摘要
    pub fn find_with_summary<P, T>(
        &mut self,
        root: P,
        pattern: T,
    ) -> FindResult<(Vec<PathBuf>, FindSummary)>
    where
        P: AsRef<Path>,
        T: Into<Pattern>,
    {
        let mut results = Vec::new();
        let summary = self.run(root.as_ref(), &pattern.into(), &mut results)?;
        Ok((results, summary))
    }

    /// 流式查找
    ///
    /// 遍历在单独的线程中进行，结果写入容量为 `queue_capacity` 的通道。
    /// 调用者必须持续读取结果：通道满时遍历线程会一直阻塞。
    pub fn find_streaming<P, T>(self, root: P, pattern: T) -> FindStream
    where
        P: AsRef<Path>,
        T: Into<Pattern>,
    {
        let (result_tx, result_rx) = bounded::<PathBuf>(self.options.queue_capacity);
        let (error_tx, error_rx) = bounded::<FindError>(1);

        let root = root.as_ref().to_path_buf();
        let pattern = pattern.into();
        let mut finder = self;

        let worker = thread::spawn(move || {
            let mut sink = result_tx;
            if let Err(err) = finder.run(&root, &pattern, &mut sink) {
                let _ = error_tx.send(err);
            }
            // 发送端在此处释放，两个通道随之关闭
        });

        FindStream {
            results: result_rx,
            errors: error_rx,
            worker: Some(worker),
        }
    }

    fn run(
        &mut self,
        root: &Path,
        pattern: &Pattern,
        sink: &mut dyn ResultSink,
    ) -> FindResult<FindSummary> {
        self.options.validate()?;

        let matcher = MatchEngine::from_options(pattern, &self.options);
        let error_logger = match &self.error_logger {
            Some(error_logger) => Arc::clone(error_logger),
            None if self.options.errors.logs() => Arc::new(ErrorLogger::stderr()),
            None => Arc::new(ErrorLogger::disabled()),
        };

        let output: Option<&mut dyn Write> = if self.options.output {
            Some(&mut *self.output)
        } else {
            None
        };

        let start_time = Instant::now();
        let walker = FileWalker::new(
            &self.options,
            &matcher,
            &self.cancel,
            self.logger.as_ref(),
            error_logger.as_ref(),
            output,
        );
        let stats = walker.walk(root, sink)?;

        if self.options.output {
            self.output.flush().map_err(FindError::SinkWrite)?;
        }

        if self.options.errors.logs() {
            error_logger.finalize().map_err(FindError::SinkWrite)?;
        }

        let summary = FindSummary::new(stats, start_time.elapsed());
        if self.logger.is_enabled() {
            self.logger.finalize(&summary).map_err(FindError::SinkWrite)?;
        }

        Ok(summary)
    }
}

/// 流式查找的结果
///
/// 作为迭代器逐个产出结果；读完后调用 [`FindStream::finish`] 取得终止错误。
/// 提前丢弃会关闭结果通道，遍历线程在下一次发送时停止。
pub struct FindStream {
    results: Receiver<PathBuf>,
    errors: Receiver<FindError>,
    worker: Option<JoinHandle<()>>,
}

impl FindStream {
    pub fn results(&self) -> &Receiver<PathBuf> {
        &self.results
    }

    /// 至多包含一个终止错误，遍历结束后关闭
    pub fn errors(&self) -> &Receiver<FindError> {
        &self.errors
    }

    /// 丢弃剩余结果，等待遍历线程结束并返回终止错误
    pub fn finish(mut self) -> FindResult<()> {
        for _ in self.results.iter() {}

        if let Some(worker) = self.worker.take() {
            if let Err(panic) = worker.join() {
                std::panic::resume_unwind(panic);
            }
        }

        match self.errors.try_recv() {
            Ok(err) => Err(err),
            Err(_) => Ok(()),
        }
    }

    /// 收集全部结果
    pub fn collect_all(mut self) -> FindResult<Vec<PathBuf>> {
        let results: Vec<PathBuf> = self.by_ref().collect();
        self.finish()?;
        Ok(results)
    }
}

impl Iterator for FindStream {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        self.results.recv().ok()
    }
}

/// 使用默认协作对象的批量查找
pub fn find<P, T>(root: P, pattern: T, options: FindOptions) -> FindResult<Vec<PathBuf>>
where
    P: AsRef<Path>,
    T: Into<Pattern>,
{
    Finder::new(options).find(root, pattern)
}

/// 使用默认协作对象的流式查找
pub fn find_streaming<P, T>(root: P, pattern: T, options: FindOptions) -> FindStream
where
    P: AsRef<Path>,
    T: Into<Pattern>,
{
    Finder::new(options).find_streaming(root, pattern)
}
