use crate::core::{AdviceView, SectionBounds, StatsSettings};
use crate::utils::error::Result;
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};

/// 只觸發一次的可見度監看，觸發後即中斷連線
#[derive(Debug, Clone)]
pub struct VisibilityWatch {
    threshold: f64,
    bottom_margin_px: f64,
    connected: bool,
}

impl VisibilityWatch {
    pub fn new(threshold: f64, bottom_margin_px: f64) -> Self {
        Self {
            threshold,
            bottom_margin_px,
            connected: true,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// 區塊落在 viewport (扣掉底部 margin) 內的比例
    pub fn intersection_ratio(&self, section: SectionBounds, viewport_height: f64) -> f64 {
        if section.height <= 0.0 {
            return 0.0;
        }
        let root_bottom = (viewport_height - self.bottom_margin_px).max(0.0);
        let visible_top = section.top.max(0.0);
        let visible_bottom = (section.top + section.height).min(root_bottom);
        let visible = (visible_bottom - visible_top).max(0.0);
        (visible / section.height).min(1.0)
    }

    /// 回傳 true 代表這次觀測觸發了動畫；之後永遠回傳 false
    pub fn observe(&mut self, section: SectionBounds, viewport_height: f64) -> bool {
        if !self.connected {
            return false;
        }
        let ratio = self.intersection_ratio(section, viewport_height);
        if ratio > 0.0 && ratio >= self.threshold {
            tracing::debug!("Stats section {:.0}% visible, triggering", ratio * 100.0);
            self.connected = false;
            return true;
        }
        false
    }
}

pub struct StatsAnimator {
    settings: StatsSettings,
}

impl StatsAnimator {
    pub fn new(settings: StatsSettings) -> Self {
        Self { settings }
    }

    pub fn progress_at(&self, elapsed: Duration) -> f64 {
        let total = self.settings.total_duration();
        if total.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / total.as_secs_f64()).min(1.0)
    }

    /// 依實際經過時間插值，直到所有數字到達目標
    pub async fn run<V: AdviceView + ?Sized>(&self, view: &V) -> Result<()> {
        let frame = self.settings.step_interval.max(Duration::from_millis(1));
        let mut ticker = interval(frame);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let start = Instant::now();

        loop {
            ticker.tick().await;
            let progress = self.progress_at(start.elapsed());

            for (index, target) in self.settings.targets.iter().enumerate() {
                if target.is_animated() {
                    view.set_stat_text(index, &target.render(progress))?;
                }
            }

            if progress >= 1.0 {
                break;
            }
        }

        tracing::debug!("Stats animation finished in {:?}", start.elapsed());
        Ok(())
    }
}
