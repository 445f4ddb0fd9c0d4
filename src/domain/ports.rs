use crate::domain::model::{
    AdviceRecord, CardId, CardRect, Element, Particle, RenderTimings, StatsSettings,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 遠端 advice 來源
#[async_trait]
pub trait AdviceSource: Send + Sync {
    async fn fetch_advice(&self) -> Result<AdviceRecord>;
}

/// 畫面上的元素操作。實作需自行處理內部可變性。
pub trait AdviceView: Send + Sync {
    /// 回傳目前找不到的元素
    fn missing_elements(&self) -> Vec<Element>;

    fn set_trigger_enabled(&self, enabled: bool) -> Result<()>;
    fn set_loading(&self, loading: bool) -> Result<()>;
    fn set_advice_visible(&self, visible: bool) -> Result<()>;
    fn show_advice(&self, text: &str, label: &str) -> Result<()>;
    /// 平滑捲動，讓 advice 區塊置中
    fn scroll_to_advice(&self) -> Result<()>;

    fn mount_particles(&self, particles: &[Particle]) -> Result<()>;
    fn set_stat_text(&self, index: usize, text: &str) -> Result<()>;

    fn cards(&self) -> Vec<CardRect>;
    fn set_card_transform(&self, card: CardId, transform: Option<&str>) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
    fn render_timings(&self) -> RenderTimings;
    fn particle_count(&self) -> usize;
    fn stats_settings(&self) -> StatsSettings;
}
