use crate::core::{CardId, CardRect, SectionBounds, Tilt};

/// 旋轉角度 = 與卡片中心的距離 / TILT_DIVISOR
pub const TILT_DIVISOR: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Space,
    Enter,
    Other(String),
}

impl Key {
    /// 依 KeyboardEvent.code 風格的名稱解析
    pub fn from_code(code: &str) -> Self {
        match code {
            "Space" => Key::Space,
            "Enter" => Key::Enter,
            other => Key::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Click,
    KeyDown(Key),
    PointerMove {
        x: f64,
        y: f64,
    },
    Scroll {
        viewport_height: f64,
        stats_section: SectionBounds,
    },
    /// 要求把 advice 區塊捲回畫面中央
    ScrollToAdvice,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Generate,
    Tilt { x: f64, y: f64 },
    WatchStats {
        viewport_height: f64,
        stats_section: SectionBounds,
    },
    FocusAdvice,
    Ignore,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub action: Action,
    pub prevent_default: bool,
}

pub fn bind(event: &InputEvent) -> Binding {
    match event {
        InputEvent::Click => Binding {
            action: Action::Generate,
            prevent_default: false,
        },
        InputEvent::KeyDown(Key::Space | Key::Enter) => Binding {
            action: Action::Generate,
            prevent_default: true,
        },
        InputEvent::KeyDown(Key::Other(_)) => Binding {
            action: Action::Ignore,
            prevent_default: false,
        },
        InputEvent::PointerMove { x, y } => Binding {
            action: Action::Tilt { x: *x, y: *y },
            prevent_default: false,
        },
        InputEvent::Scroll {
            viewport_height,
            stats_section,
        } => Binding {
            action: Action::WatchStats {
                viewport_height: *viewport_height,
                stats_section: *stats_section,
            },
            prevent_default: false,
        },
        InputEvent::ScrollToAdvice => Binding {
            action: Action::FocusAdvice,
            prevent_default: false,
        },
    }
}

/// 指標嚴格落在卡片內才傾斜，否則回傳 None (清除 transform)
pub fn compute_tilt(card: &CardRect, x: f64, y: f64) -> Option<Tilt> {
    let local_x = x - card.left;
    let local_y = y - card.top;

    if local_x > 0.0 && local_x < card.width && local_y > 0.0 && local_y < card.height {
        let center_x = card.width / 2.0;
        let center_y = card.height / 2.0;
        Some(Tilt {
            rotate_x: (local_y - center_y) / TILT_DIVISOR,
            rotate_y: (center_x - local_x) / TILT_DIVISOR,
        })
    } else {
        None
    }
}

pub fn tilt_transforms(cards: &[CardRect], x: f64, y: f64) -> Vec<(CardId, Option<String>)> {
    cards
        .iter()
        .map(|card| (card.id, compute_tilt(card, x, y).map(|tilt| tilt.to_transform())))
        .collect()
}
