use crate::core::{AdviceOrigin, AdviceRecord, AdviceSource, FetchOutcome};
use crate::domain::model::{FALLBACK_ADVICE, FALLBACK_ID_BOUND};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 包裝 AdviceSource，失敗時一律回傳 fallback 記錄
pub struct AdviceFetcher<S: AdviceSource> {
    source: S,
    rng: Mutex<StdRng>,
}

impl<S: AdviceSource> AdviceFetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// 固定 fallback id 的亂數種子 (測試用)
    pub fn with_seed(source: S, seed: u64) -> Self {
        Self {
            source,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub async fn fetch(&self) -> FetchOutcome {
        match self.source.fetch_advice().await {
            Ok(record) => {
                tracing::debug!("Fetched advice #{}", record.id);
                FetchOutcome {
                    record,
                    origin: AdviceOrigin::Remote,
                }
            }
            Err(e) => {
                tracing::error!("Error fetching advice: {}", e);
                let record = fallback_record(&mut *self.rng.lock());
                tracing::debug!("Using fallback advice #{}", record.id);
                FetchOutcome {
                    record,
                    origin: AdviceOrigin::Fallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    pub async fn fetch_record(&self) -> AdviceRecord {
        self.fetch().await.record
    }
}

pub fn fallback_record<R: Rng + ?Sized>(rng: &mut R) -> AdviceRecord {
    AdviceRecord::new(rng.random_range(0..FALLBACK_ID_BOUND), FALLBACK_ADVICE)
}
