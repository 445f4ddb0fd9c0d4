use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const FALLBACK_ADVICE: &str = "The best way to predict the future is to create it.";

/// fallback id 取自 [0, FALLBACK_ID_BOUND)
pub const FALLBACK_ID_BOUND: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceRecord {
    pub id: u32,
    pub advice: String,
}

impl AdviceRecord {
    pub fn new(id: u32, advice: impl Into<String>) -> Self {
        Self {
            id,
            advice: advice.into(),
        }
    }

    /// 卡片上顯示的編號標籤
    pub fn label(&self) -> String {
        format!("ADVICE #{}", self.id)
    }
}

/// 這筆 advice 的來源
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdviceOrigin {
    Remote,
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchOutcome {
    pub record: AdviceRecord,
    pub origin: AdviceOrigin,
}

impl FetchOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, AdviceOrigin::Fallback { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Particle {
    pub left_pct: f64,
    pub top_pct: f64,
    pub delay_secs: f64,
    pub duration_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatTarget {
    Count { value: u32 },
    Suffixed { value: u32, suffix: String },
    Symbol { symbol: String },
}

impl StatTarget {
    pub fn is_animated(&self) -> bool {
        !matches!(self, StatTarget::Symbol { .. })
    }

    /// 依進度 (0.0..=1.0) 格式化目前數值，完成時回傳精確目標值
    pub fn render(&self, progress: f64) -> String {
        let progress = progress.clamp(0.0, 1.0);
        let current = |value: u32| -> u64 {
            if progress >= 1.0 {
                u64::from(value)
            } else {
                (f64::from(value) * progress).floor() as u64
            }
        };

        match self {
            StatTarget::Count { value } => current(*value).to_string(),
            StatTarget::Suffixed { value, suffix } => format!("{}{}", current(*value), suffix),
            StatTarget::Symbol { symbol } => symbol.clone(),
        }
    }
}

pub fn default_stat_targets() -> Vec<StatTarget> {
    vec![
        StatTarget::Count { value: 224 },
        StatTarget::Suffixed {
            value: 15,
            suffix: "K+".to_string(),
        },
        StatTarget::Symbol {
            symbol: "∞".to_string(),
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardId {
    Advice,
    Stat(usize),
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardId::Advice => f.write_str("advice-card"),
            CardId::Stat(index) => write!(f, "stat-card-{}", index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardRect {
    pub id: CardId,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Tilt {
    pub fn to_transform(&self) -> String {
        format!(
            "perspective(1000px) rotateX({}deg) rotateY({}deg) translateZ(20px)",
            self.rotate_x, self.rotate_y
        )
    }
}

/// 區塊相對於 viewport 頂端的位置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionBounds {
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    AdviceText,
    AdviceLabel,
    GenerateButton,
    AdviceCard,
    ParticleContainer,
    StatsSection,
}

impl Element {
    /// render cycle 不能缺少的元素
    pub const REQUIRED_FOR_RENDER: [Element; 3] = [
        Element::AdviceText,
        Element::AdviceLabel,
        Element::GenerateButton,
    ];
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Element::AdviceText => "advice",
            Element::AdviceLabel => "advice-no",
            Element::GenerateButton => "generate-btn",
            Element::AdviceCard => "advice-card",
            Element::ParticleContainer => "particles",
            Element::StatsSection => "stats-section",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderState {
    #[default]
    Idle,
    Loading,
    Transitioning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTimings {
    /// loading 狀態最少維持的時間
    pub min_loading: Duration,
    /// 淡出到換字之間的延遲
    pub fade_out: Duration,
    /// 從進入 loading 起算，恢復按鈕前至少經過的時間
    pub settle: Duration,
}

impl Default for RenderTimings {
    fn default() -> Self {
        Self {
            min_loading: Duration::from_millis(800),
            fade_out: Duration::from_millis(250),
            settle: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsSettings {
    pub targets: Vec<StatTarget>,
    pub steps: u32,
    pub step_interval: Duration,
    /// 觸發所需的可見比例
    pub threshold: f64,
    /// viewport 底部排除的高度 (px)
    pub bottom_margin_px: f64,
}

impl StatsSettings {
    pub fn total_duration(&self) -> Duration {
        self.step_interval * self.steps
    }
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            targets: default_stat_targets(),
            steps: 50,
            step_interval: Duration::from_millis(30),
            threshold: 0.3,
            bottom_margin_px: 50.0,
        }
    }
}
