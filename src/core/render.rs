use crate::core::fetcher::AdviceFetcher;
use crate::core::{AdviceRecord, AdviceSource, AdviceView, FetchOutcome, RenderState, RenderTimings};
use crate::domain::model::Element;
use crate::utils::error::{AdviceError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, sleep_until, Instant};

#[derive(Debug, Clone)]
pub struct CycleReport {
    pub outcome: FetchOutcome,
    pub elapsed: Duration,
    /// 換字過程中的畫面錯誤 (已記錄，cleanup 仍會執行)
    pub render_error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum CycleOutcome {
    Completed(CycleReport),
    /// 已有 cycle 進行中，這次觸發被忽略
    Skipped,
    /// 缺少必要元素，未進入 loading
    Aborted { missing: Vec<Element> },
}

impl CycleOutcome {
    pub fn report(&self) -> Option<&CycleReport> {
        match self {
            CycleOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }
}

/// Idle → Loading → Transitioning → Idle
pub struct RenderController<S: AdviceSource, V: AdviceView> {
    fetcher: AdviceFetcher<S>,
    view: Arc<V>,
    timings: RenderTimings,
    state: Mutex<RenderState>,
}

impl<S: AdviceSource, V: AdviceView> RenderController<S, V> {
    pub fn new(fetcher: AdviceFetcher<S>, view: Arc<V>, timings: RenderTimings) -> Self {
        Self {
            fetcher,
            view,
            timings,
            state: Mutex::new(RenderState::Idle),
        }
    }

    pub fn state(&self) -> RenderState {
        *self.state.lock()
    }

    pub fn is_busy(&self) -> bool {
        self.state() != RenderState::Idle
    }

    pub async fn run_cycle(&self) -> CycleOutcome {
        let missing: Vec<Element> = self
            .view
            .missing_elements()
            .into_iter()
            .filter(|element| Element::REQUIRED_FOR_RENDER.contains(element))
            .collect();
        if !missing.is_empty() {
            let error = AdviceError::missing_elements(&missing);
            tracing::warn!("Render aborted: {}", error);
            return CycleOutcome::Aborted { missing };
        }

        let Some(guard) = CycleGuard::acquire(&self.state, self.view.as_ref()) else {
            tracing::debug!("Render cycle already in progress, ignoring trigger");
            return CycleOutcome::Skipped;
        };

        let started = Instant::now();
        guard.enter_loading();

        // fetch 與最短 loading 時間都完成才往下走
        let (outcome, ()) = tokio::join!(self.fetcher.fetch(), sleep(self.timings.min_loading));

        guard.set_state(RenderState::Transitioning);
        let swapped = self.swap_content(&outcome.record).await;
        // 換字失敗也要淡入，畫面不能停在隱藏狀態
        let render_error = match swapped.and(self.view.set_advice_visible(true)) {
            Ok(()) => None,
            Err(e) => {
                tracing::error!("Error rendering advice: {}", e);
                Some(e.to_string())
            }
        };

        sleep_until(started + self.timings.settle).await;
        guard.release();

        let elapsed = started.elapsed();
        tracing::info!(
            "Rendered advice #{} in {:?}{}",
            outcome.record.id,
            elapsed,
            if outcome.is_fallback() { " (fallback)" } else { "" }
        );

        CycleOutcome::Completed(CycleReport {
            outcome,
            elapsed,
            render_error,
        })
    }

    async fn swap_content(&self, record: &AdviceRecord) -> Result<()> {
        self.view.set_advice_visible(false)?;
        sleep(self.timings.fade_out).await;
        self.view.show_advice(&record.advice, &record.label())
    }
}

/// 持有「生成中」狀態；release 或 drop 時恢復按鈕並移除 loading
struct CycleGuard<'a, V: AdviceView> {
    state: &'a Mutex<RenderState>,
    view: &'a V,
    released: bool,
}

impl<'a, V: AdviceView> CycleGuard<'a, V> {
    fn acquire(state: &'a Mutex<RenderState>, view: &'a V) -> Option<Self> {
        let mut current = state.lock();
        if *current != RenderState::Idle {
            return None;
        }
        *current = RenderState::Loading;
        Some(Self {
            state,
            view,
            released: false,
        })
    }

    fn set_state(&self, next: RenderState) {
        *self.state.lock() = next;
    }

    fn enter_loading(&self) {
        if let Err(e) = self.view.set_loading(true) {
            tracing::warn!("Failed to show loading state: {}", e);
        }
        if let Err(e) = self.view.set_trigger_enabled(false) {
            tracing::warn!("Failed to disable trigger: {}", e);
        }
    }

    fn release(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Err(e) = self.view.set_loading(false) {
            tracing::warn!("Failed to clear loading state: {}", e);
        }
        if let Err(e) = self.view.set_trigger_enabled(true) {
            tracing::warn!("Failed to re-enable trigger: {}", e);
        }
        *self.state.lock() = RenderState::Idle;
    }
}

impl<V: AdviceView> Drop for CycleGuard<'_, V> {
    fn drop(&mut self) {
        self.finish();
    }
}
