pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{http::AdviceSlipClient, memory::InMemoryView, terminal::TerminalView};
pub use crate::app::widget::AdviceWidget;
pub use crate::config::WidgetConfig;
pub use crate::core::{fetcher::AdviceFetcher, render::RenderController};
pub use crate::utils::error::{AdviceError, Result};
