pub mod bindings;
pub mod fetcher;
pub mod particles;
pub mod render;
pub mod stats;

pub use crate::domain::model::{
    AdviceOrigin, AdviceRecord, CardId, CardRect, FetchOutcome, Particle, RenderState,
    RenderTimings, SectionBounds, StatTarget, StatsSettings, Tilt,
};
pub use crate::domain::ports::{AdviceSource, AdviceView, ConfigProvider};
pub use crate::utils::error::Result;
