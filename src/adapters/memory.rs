use crate::domain::model::{CardId, CardRect, Element, Particle, StatTarget};
use crate::domain::ports::AdviceView;
use crate::utils::error::{AdviceError, Result};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Serialize)]
pub struct ViewEvent {
    pub at_ms: u64,
    pub op: String,
}

/// 某一時刻畫面的完整狀態
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub advice_text: String,
    pub advice_label: String,
    pub advice_visible: bool,
    pub trigger_enabled: bool,
    pub loading: bool,
    pub particles: Vec<Particle>,
    pub stats: Vec<String>,
    pub card_transforms: BTreeMap<String, String>,
    pub events: Vec<ViewEvent>,
}

impl ViewSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// 把畫面狀態保存在記憶體的 AdviceView，供 `--once --json` 與測試使用
pub struct InMemoryView {
    state: Mutex<ViewSnapshot>,
    missing: Vec<Element>,
    cards: Vec<CardRect>,
    created: Instant,
    fail_on_show: AtomicBool,
}

impl InMemoryView {
    pub fn new() -> Self {
        Self::without(&[])
    }

    /// 模擬缺少部分元素的頁面
    pub fn without(missing: &[Element]) -> Self {
        Self::with_stats(missing, &crate::domain::model::default_stat_targets())
    }

    pub fn with_stats(missing: &[Element], targets: &[StatTarget]) -> Self {
        // 動畫開始前的初始數字
        let stats = targets.iter().map(|target| target.render(0.0)).collect();
        Self {
            state: Mutex::new(ViewSnapshot {
                advice_text: String::new(),
                advice_label: String::new(),
                advice_visible: true,
                trigger_enabled: true,
                loading: false,
                particles: Vec::new(),
                stats,
                card_transforms: BTreeMap::new(),
                events: Vec::new(),
            }),
            missing: missing.to_vec(),
            cards: default_cards(targets.len()),
            created: Instant::now(),
            fail_on_show: AtomicBool::new(false),
        }
    }

    pub fn fail_on_show(&self, fail: bool) {
        self.fail_on_show.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.state.lock().clone()
    }

    /// 第一次出現該操作的時間 (相對於建立時)
    pub fn event_time(&self, op: &str) -> Option<Duration> {
        self.state
            .lock()
            .events
            .iter()
            .find(|event| event.op == op)
            .map(|event| Duration::from_millis(event.at_ms))
    }

    pub fn count_events(&self, op: &str) -> usize {
        self.state
            .lock()
            .events
            .iter()
            .filter(|event| event.op == op)
            .count()
    }

    fn has(&self, element: Element) -> bool {
        !self.missing.contains(&element)
    }

    fn record(&self, state: &mut ViewSnapshot, op: String) {
        let at_ms = self.created.elapsed().as_millis() as u64;
        state.events.push(ViewEvent { at_ms, op });
    }
}

impl Default for InMemoryView {
    fn default() -> Self {
        Self::new()
    }
}

/// advice 卡片在上，stat 卡片橫排在下
pub fn default_cards(stat_count: usize) -> Vec<CardRect> {
    let mut cards = vec![CardRect {
        id: CardId::Advice,
        left: 100.0,
        top: 80.0,
        width: 600.0,
        height: 320.0,
    }];
    for index in 0..stat_count {
        cards.push(CardRect {
            id: CardId::Stat(index),
            left: 100.0 + index as f64 * 210.0,
            top: 520.0,
            width: 180.0,
            height: 120.0,
        });
    }
    cards
}

impl AdviceView for InMemoryView {
    fn missing_elements(&self) -> Vec<Element> {
        self.missing.clone()
    }

    fn set_trigger_enabled(&self, enabled: bool) -> Result<()> {
        let mut state = self.state.lock();
        if self.has(Element::GenerateButton) {
            state.trigger_enabled = enabled;
        }
        self.record(&mut state, format!("trigger:{}", enabled));
        Ok(())
    }

    fn set_loading(&self, loading: bool) -> Result<()> {
        let mut state = self.state.lock();
        if self.has(Element::AdviceCard) {
            state.loading = loading;
        }
        self.record(&mut state, format!("loading:{}", loading));
        Ok(())
    }

    fn set_advice_visible(&self, visible: bool) -> Result<()> {
        let mut state = self.state.lock();
        state.advice_visible = visible;
        self.record(&mut state, format!("visible:{}", visible));
        Ok(())
    }

    fn show_advice(&self, text: &str, label: &str) -> Result<()> {
        if self.fail_on_show.load(Ordering::SeqCst) {
            return Err(AdviceError::ViewError {
                message: "advice element detached".to_string(),
            });
        }
        let mut state = self.state.lock();
        state.advice_text = text.to_string();
        state.advice_label = label.to_string();
        self.record(&mut state, format!("advice:{}", text));
        self.record(&mut state, format!("label:{}", label));
        Ok(())
    }

    fn scroll_to_advice(&self) -> Result<()> {
        let mut state = self.state.lock();
        self.record(&mut state, "scroll:advice".to_string());
        Ok(())
    }

    fn mount_particles(&self, particles: &[Particle]) -> Result<()> {
        let mut state = self.state.lock();
        state.particles.extend_from_slice(particles);
        self.record(&mut state, format!("particles:{}", particles.len()));
        Ok(())
    }

    fn set_stat_text(&self, index: usize, text: &str) -> Result<()> {
        let mut state = self.state.lock();
        let slot = state
            .stats
            .get_mut(index)
            .ok_or_else(|| AdviceError::ViewError {
                message: format!("no stat element at index {}", index),
            })?;
        *slot = text.to_string();
        self.record(&mut state, format!("stat{}:{}", index, text));
        Ok(())
    }

    fn cards(&self) -> Vec<CardRect> {
        self.cards.clone()
    }

    fn set_card_transform(&self, card: CardId, transform: Option<&str>) -> Result<()> {
        let mut state = self.state.lock();
        let key = card.to_string();
        match transform {
            Some(value) => {
                state.card_transforms.insert(key, value.to_string());
            }
            None => {
                state.card_transforms.remove(&key);
            }
        }
        Ok(())
    }
}
