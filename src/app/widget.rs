use crate::core::bindings::{bind, tilt_transforms, Action, InputEvent};
use crate::core::fetcher::AdviceFetcher;
use crate::core::particles::generate_particles;
use crate::core::render::{CycleOutcome, RenderController};
use crate::core::stats::{StatsAnimator, VisibilityWatch};
use crate::core::{AdviceSource, AdviceView, ConfigProvider, SectionBounds};
use crate::domain::model::Element;
use crate::utils::error::{AdviceError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub enum WidgetTask {
    Render(JoinHandle<CycleOutcome>),
    Stats(JoinHandle<Result<()>>),
}

impl WidgetTask {
    fn is_finished(&self) -> bool {
        match self {
            WidgetTask::Render(handle) => handle.is_finished(),
            WidgetTask::Stats(handle) => handle.is_finished(),
        }
    }
}

/// 尚未結束的背景 task；離開前要等它們跑完
#[derive(Debug, Default)]
pub struct PendingTasks {
    tasks: Vec<WidgetTask>,
}

impl PendingTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, task: Option<WidgetTask>) {
        self.tasks.retain(|task| !task.is_finished());
        if let Some(task) = task {
            self.tasks.push(task);
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// 依序等待所有 task，回傳 render cycle 的結果
    pub async fn drain(&mut self) -> Vec<CycleOutcome> {
        let mut outcomes = Vec::new();
        for task in self.tasks.drain(..) {
            match task {
                WidgetTask::Render(handle) => match handle.await {
                    Ok(outcome) => outcomes.push(outcome),
                    Err(e) => tracing::warn!("Render task failed: {}", e),
                },
                WidgetTask::Stats(handle) => match handle.await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => tracing::warn!("Stats animation failed: {}", e),
                    Err(e) => tracing::warn!("Stats task failed: {}", e),
                },
            }
        }
        outcomes
    }
}

#[derive(Debug)]
pub struct Dispatch {
    pub prevent_default: bool,
    pub task: Option<WidgetTask>,
}

/// 啟動時建立一次的 widget context，持有畫面與各元件
pub struct AdviceWidget<S: AdviceSource, V: AdviceView> {
    controller: RenderController<S, V>,
    view: Arc<V>,
    stats: StatsAnimator,
    watch: Mutex<VisibilityWatch>,
    particle_count: usize,
}

impl<S: AdviceSource, V: AdviceView> AdviceWidget<S, V> {
    pub fn new<C: ConfigProvider + ?Sized>(fetcher: AdviceFetcher<S>, view: Arc<V>, config: &C) -> Self {
        let stats = config.stats_settings();
        let watch = VisibilityWatch::new(stats.threshold, stats.bottom_margin_px);
        Self {
            controller: RenderController::new(fetcher, Arc::clone(&view), config.render_timings()),
            view,
            stats: StatsAnimator::new(stats),
            watch: Mutex::new(watch),
            particle_count: config.particle_count(),
        }
    }

    pub fn controller(&self) -> &RenderController<S, V> {
        &self.controller
    }

    /// 掛上背景粒子，回傳實際掛上的數量
    pub fn mount_particles(&self) -> Result<usize> {
        if self.view.missing_elements().contains(&Element::ParticleContainer) {
            let error = AdviceError::missing_elements(&[Element::ParticleContainer]);
            tracing::warn!("Skipping particles: {}", error);
            return Ok(0);
        }
        let particles = generate_particles(self.particle_count, &mut rand::rng());
        self.view.mount_particles(&particles)?;
        tracing::debug!("Mounted {} particles", particles.len());
        Ok(particles.len())
    }

    /// 頁面載入：粒子 + 第一則 advice
    pub async fn start(&self) -> CycleOutcome {
        if let Err(e) = self.mount_particles() {
            tracing::warn!("Failed to mount particles: {}", e);
        }
        self.generate().await
    }

    pub async fn generate(&self) -> CycleOutcome {
        self.controller.run_cycle().await
    }

    pub fn apply_tilt(&self, x: f64, y: f64) -> Result<()> {
        for (card, transform) in tilt_transforms(&self.view.cards(), x, y) {
            self.view.set_card_transform(card, transform.as_deref())?;
        }
        Ok(())
    }

    pub fn scroll_to_advice(&self) -> Result<()> {
        if self.view.missing_elements().contains(&Element::AdviceCard) {
            return Err(AdviceError::missing_elements(&[Element::AdviceCard]));
        }
        self.view.scroll_to_advice()
    }

    /// stats 區塊捲動觀測；只有第一次達到門檻時回傳 true
    pub fn observe_stats(&self, section: SectionBounds, viewport_height: f64) -> bool {
        if self.view.missing_elements().contains(&Element::StatsSection) {
            return false;
        }
        self.watch.lock().observe(section, viewport_height)
    }

    pub async fn animate_stats(&self) -> Result<()> {
        self.stats.run(self.view.as_ref()).await
    }
}

impl<S, V> AdviceWidget<S, V>
where
    S: AdviceSource + 'static,
    V: AdviceView + 'static,
{
    /// 把輸入事件轉成動作；耗時的部分在背景 task 執行
    pub fn dispatch(self: &Arc<Self>, event: InputEvent) -> Dispatch {
        let binding = bind(&event);
        let task = match binding.action {
            Action::Generate => {
                let widget = Arc::clone(self);
                Some(WidgetTask::Render(tokio::spawn(async move {
                    widget.generate().await
                })))
            }
            Action::Tilt { x, y } => {
                if let Err(e) = self.apply_tilt(x, y) {
                    tracing::warn!("Failed to apply tilt: {}", e);
                }
                None
            }
            Action::WatchStats {
                viewport_height,
                stats_section,
            } => {
                if self.observe_stats(stats_section, viewport_height) {
                    let widget = Arc::clone(self);
                    Some(WidgetTask::Stats(tokio::spawn(async move {
                        widget.animate_stats().await
                    })))
                } else {
                    None
                }
            }
            Action::FocusAdvice => {
                if let Err(e) = self.scroll_to_advice() {
                    tracing::warn!("Failed to scroll to advice: {}", e);
                }
                None
            }
            Action::Ignore => None,
        };

        Dispatch {
            prevent_default: binding.prevent_default,
            task,
        }
    }
}
