//! 作答倒计时模块
//! 提供每题限时的单次触发倒计时，支持取消、重启与剩余时间读取

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, Duration};

/// 截止倒计时
///
/// start 启动一轮倒计时，每秒递减一次剩余时间，归零时恰好回调一次 on_expire；
/// cancel 通过递增世代号令在途的倒计时失效，重复取消为空操作。
/// 触发前用 compare_exchange 抢占世代号，因此取消与到期竞争时至多一方生效。
pub struct DeadlineTimer {
    generation: Arc<AtomicU64>,
    remaining: Arc<AtomicI64>,
}

impl DeadlineTimer {
    pub fn new() -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            remaining: Arc::new(AtomicI64::new(0)),
        }
    }

    /// 启动新一轮倒计时；之前未触发的轮次全部失效
    ///
    /// 需要在 tokio 运行时内调用。
    pub fn start<F>(&self, duration_seconds: u32, on_expire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.remaining
            .store(duration_seconds as i64, Ordering::SeqCst);

        let generation = Arc::clone(&self.generation);
        let remaining = Arc::clone(&self.remaining);

        tokio::spawn(async move {
            let mut left = duration_seconds as i64;
            while left > 0 {
                sleep(Duration::from_secs(1)).await;
                if generation.load(Ordering::SeqCst) != token {
                    return;
                }
                left -= 1;
                remaining.store(left, Ordering::SeqCst);
            }
            // 抢占世代号成功才触发，保证 cancel 之后绝不回调
            if generation
                .compare_exchange(token, token + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                on_expire();
            }
        });
    }

    /// 取消当前倒计时；幂等
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// 当前剩余秒数（仅供界面展示，读取不影响触发）
    pub fn remaining_seconds(&self) -> i64 {
        self.remaining.load(Ordering::SeqCst).max(0)
    }
}

impl Default for DeadlineTimer {
    fn default() -> Self {
        Self::new()
    }
}
