use crate::adapters::http::DEFAULT_ENDPOINT;
use crate::core::ConfigProvider;
use crate::domain::model::{default_stat_targets, RenderTimings, StatTarget, StatsSettings};
use crate::utils::error::{AdviceError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub source: SourceConfig,
    pub render: RenderConfig,
    pub particles: ParticleConfig,
    pub stats: StatsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub endpoint: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub min_loading_ms: u64,
    pub fade_ms: u64,
    pub settle_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let timings = RenderTimings::default();
        Self {
            min_loading_ms: timings.min_loading.as_millis() as u64,
            fade_ms: timings.fade_out.as_millis() as u64,
            settle_ms: timings.settle.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: crate::core::particles::DEFAULT_PARTICLE_COUNT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub steps: u32,
    pub step_interval_ms: u64,
    pub threshold: f64,
    pub bottom_margin_px: f64,
    pub targets: Vec<StatTarget>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        let settings = StatsSettings::default();
        Self {
            steps: settings.steps,
            step_interval_ms: settings.step_interval.as_millis() as u64,
            threshold: settings.threshold,
            bottom_margin_px: settings.bottom_margin_px,
            targets: default_stat_targets(),
        }
    }
}

impl WidgetConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdviceError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AdviceError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ADVICE_ENDPOINT})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AdviceError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

/// 替換後仍留下的 `${VAR}` 名稱
fn unresolved_env_var(value: &str) -> Option<&str> {
    let start = value.find("${")? + 2;
    let len = value[start..].find('}')?;
    Some(&value[start..start + len])
}

impl Validate for WidgetConfig {
    fn validate(&self) -> Result<()> {
        if let Some(var) = unresolved_env_var(&self.source.endpoint) {
            return Err(AdviceError::MissingConfigError {
                field: format!("source.endpoint (environment variable {} is not set)", var),
            });
        }
        validation::validate_url("source.endpoint", &self.source.endpoint)?;
        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_positive_number("source.timeout_seconds", timeout, 1)?;
        }

        validation::validate_range("particles.count", self.particles.count, 0, 10_000)?;

        validation::validate_positive_number("stats.steps", u64::from(self.stats.steps), 1)?;
        validation::validate_positive_number("stats.step_interval_ms", self.stats.step_interval_ms, 1)?;
        validation::validate_range("stats.threshold", self.stats.threshold, 0.0, 1.0)?;
        validation::validate_range(
            "stats.bottom_margin_px",
            self.stats.bottom_margin_px,
            0.0,
            f64::MAX,
        )?;

        for target in &self.stats.targets {
            match target {
                StatTarget::Count { .. } => {}
                StatTarget::Suffixed { suffix, .. } => {
                    validation::validate_non_empty_string("stats.targets.suffix", suffix)?
                }
                StatTarget::Symbol { symbol } => {
                    validation::validate_non_empty_string("stats.targets.symbol", symbol)?
                }
            }
        }

        Ok(())
    }
}

impl ConfigProvider for WidgetConfig {
    fn api_endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    fn render_timings(&self) -> RenderTimings {
        RenderTimings {
            min_loading: Duration::from_millis(self.render.min_loading_ms),
            fade_out: Duration::from_millis(self.render.fade_ms),
            settle: Duration::from_millis(self.render.settle_ms),
        }
    }

    fn particle_count(&self) -> usize {
        self.particles.count
    }

    fn stats_settings(&self) -> StatsSettings {
        StatsSettings {
            targets: self.stats.targets.clone(),
            steps: self.stats.steps,
            step_interval: Duration::from_millis(self.stats.step_interval_ms),
            threshold: self.stats.threshold,
            bottom_margin_px: self.stats.bottom_margin_px,
        }
    }
}
