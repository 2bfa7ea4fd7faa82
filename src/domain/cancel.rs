//! 查找取消信号
//!
//! 遍历在处理每个目录项之前检查一次令牌，所以取消后最多再处理
//! 一个目录项就会停止。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::error::{FindError, FindResult};

/// 可在线程间共享的取消令牌，支持手动取消和截止时间
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    /// 创建永不自动过期的令牌
    pub fn new() -> Self {
        Self::default()
    }

    /// 到达截止时间后视为已取消
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// 取消所有共享此令牌的查找
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self.deadline.map_or(false, |deadline| Instant::now() >= deadline)
    }

    /// 已取消时返回 [`FindError::Cancelled`]
    pub fn check(&self) -> FindResult<()> {
        if self.is_cancelled() {
            Err(FindError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_token_is_active() {
        let token = CancellationToken::default();
        assert!(!token.is_cancelled());
        assert!(token.check().is_ok());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();

        clone.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(FindError::Cancelled)));
    }

    #[test]
    fn test_deadline() {
        let expired = CancellationToken::with_deadline(Instant::now());
        assert!(expired.is_cancelled());

        let later = CancellationToken::with_timeout(Duration::from_secs(3600));
        assert!(!later.is_cancelled());
    }
}
