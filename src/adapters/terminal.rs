use crate::adapters::memory::default_cards;
use crate::core::bindings::{InputEvent, Key};
use crate::domain::model::{CardId, CardRect, Element, Particle, SectionBounds, StatTarget};
use crate::domain::ports::AdviceView;
use crate::utils::error::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Write;

const STARFIELD_WIDTH: usize = 60;

/// 終端機版面的 viewport 高度 (px)
pub const VIEWPORT_HEIGHT: f64 = 800.0;

/// `stats` 指令把 stats 區塊捲進畫面時的位置
pub const STATS_IN_VIEW: SectionBounds = SectionBounds {
    top: 500.0,
    height: 160.0,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Input(InputEvent),
    Help,
    Quit,
}

/// 解析互動模式下的一行輸入
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    let mut parts = trimmed.split_whitespace();
    let head = parts.next().unwrap_or("");

    match head.to_ascii_lowercase().as_str() {
        "" | "enter" => Some(Command::Input(InputEvent::KeyDown(Key::Enter))),
        "space" => Some(Command::Input(InputEvent::KeyDown(Key::Space))),
        "g" | "click" => Some(Command::Input(InputEvent::Click)),
        "s" | "stats" => Some(Command::Input(InputEvent::Scroll {
            viewport_height: VIEWPORT_HEIGHT,
            stats_section: STATS_IN_VIEW,
        })),
        "a" | "advice" => Some(Command::Input(InputEvent::ScrollToAdvice)),
        "m" | "move" => {
            let x = parts.next()?.parse().ok()?;
            let y = parts.next()?.parse().ok()?;
            Some(Command::Input(InputEvent::PointerMove { x, y }))
        }
        "h" | "help" | "?" => Some(Command::Help),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

pub const HELP: &str = "Commands: <enter>/space new advice | g click | s show stats | a show advice | m <x> <y> move pointer | q quit";

struct Screen<W: Write> {
    out: W,
    text: String,
    label: String,
    stats: Vec<String>,
    transforms: HashMap<CardId, String>,
    stats_line_open: bool,
}

impl<W: Write> Screen<W> {
    fn line(&mut self, text: &str) -> Result<()> {
        if self.stats_line_open {
            writeln!(self.out)?;
            self.stats_line_open = false;
        }
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;
        Ok(())
    }

    fn redraw_stats(&mut self) -> Result<()> {
        write!(self.out, "\r  📊 {}", self.stats.join("  ·  "))?;
        self.out.flush()?;
        self.stats_line_open = true;
        Ok(())
    }
}

/// 把畫面輸出成文字行的 AdviceView
pub struct TerminalView<W: Write + Send> {
    screen: Mutex<Screen<W>>,
    cards: Vec<CardRect>,
}

impl TerminalView<std::io::Stdout> {
    pub fn stdout(targets: &[StatTarget]) -> Self {
        Self::new(std::io::stdout(), targets)
    }
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W, targets: &[StatTarget]) -> Self {
        Self {
            screen: Mutex::new(Screen {
                out,
                text: String::new(),
                label: String::new(),
                stats: targets.iter().map(|target| target.render(0.0)).collect(),
                transforms: HashMap::new(),
                stats_line_open: false,
            }),
            cards: default_cards(targets.len()),
        }
    }
}

impl TerminalView<Vec<u8>> {
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.screen.lock().out).into_owned()
    }
}

fn starfield(particles: &[Particle]) -> String {
    let mut row = vec![' '; STARFIELD_WIDTH];
    for particle in particles {
        let column = (particle.left_pct / 100.0 * STARFIELD_WIDTH as f64) as usize;
        if let Some(cell) = row.get_mut(column.min(STARFIELD_WIDTH - 1)) {
            *cell = if particle.duration_secs < 5.5 { '·' } else { '✦' };
        }
    }
    row.into_iter().collect()
}

impl<W: Write + Send> AdviceView for TerminalView<W> {
    fn missing_elements(&self) -> Vec<Element> {
        Vec::new()
    }

    fn set_trigger_enabled(&self, enabled: bool) -> Result<()> {
        if enabled {
            self.screen.lock().line(&format!("  {}", HELP))?;
        }
        Ok(())
    }

    fn set_loading(&self, loading: bool) -> Result<()> {
        if loading {
            self.screen.lock().line("  ⏳ Fetching advice...")?;
        }
        Ok(())
    }

    fn set_advice_visible(&self, visible: bool) -> Result<()> {
        if visible {
            let mut screen = self.screen.lock();
            let card = format!("\n  ── {} ──\n  “{}”\n", screen.label, screen.text);
            screen.line(&card)?;
        }
        Ok(())
    }

    fn show_advice(&self, text: &str, label: &str) -> Result<()> {
        let mut screen = self.screen.lock();
        screen.text = text.to_string();
        screen.label = label.to_string();
        Ok(())
    }

    fn scroll_to_advice(&self) -> Result<()> {
        let mut screen = self.screen.lock();
        if screen.text.is_empty() {
            return Ok(());
        }
        let card = format!("\n  ── {} ──\n  “{}”\n", screen.label, screen.text);
        screen.line(&card)
    }

    fn mount_particles(&self, particles: &[Particle]) -> Result<()> {
        self.screen.lock().line(&starfield(particles))
    }

    fn set_stat_text(&self, index: usize, text: &str) -> Result<()> {
        let mut screen = self.screen.lock();
        if let Some(slot) = screen.stats.get_mut(index) {
            if slot.as_str() == text {
                return Ok(());
            }
            *slot = text.to_string();
        }
        screen.redraw_stats()
    }

    fn cards(&self) -> Vec<CardRect> {
        self.cards.clone()
    }

    fn set_card_transform(&self, card: CardId, transform: Option<&str>) -> Result<()> {
        let mut screen = self.screen.lock();
        match transform {
            Some(value) => {
                if screen.transforms.get(&card).map(String::as_str) == Some(value) {
                    return Ok(());
                }
                screen.transforms.insert(card, value.to_string());
                screen.line(&format!("  ⟲ {}: {}", card, value))
            }
            None => {
                if screen.transforms.remove(&card).is_some() {
                    screen.line(&format!("  ⟲ {}: reset", card))?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::default_stat_targets;

    #[test]
    fn test_parse_keys_and_click() {
        assert_eq!(
            parse_command(""),
            Some(Command::Input(InputEvent::KeyDown(Key::Enter)))
        );
        assert_eq!(
            parse_command("space"),
            Some(Command::Input(InputEvent::KeyDown(Key::Space)))
        );
        assert_eq!(parse_command("g"), Some(Command::Input(InputEvent::Click)));
        assert_eq!(
            parse_command("advice"),
            Some(Command::Input(InputEvent::ScrollToAdvice))
        );
        assert_eq!(parse_command(" Q "), Some(Command::Quit));
        assert_eq!(parse_command("dance"), None);
    }

    #[test]
    fn test_parse_pointer_move() {
        assert_eq!(
            parse_command("m 120 90.5"),
            Some(Command::Input(InputEvent::PointerMove { x: 120.0, y: 90.5 }))
        );
        assert_eq!(parse_command("m 120"), None);
        assert_eq!(parse_command("m a b"), None);
    }

    #[test]
    fn test_advice_card_printed_on_fade_in() {
        let view = TerminalView::new(Vec::new(), &default_stat_targets());
        view.set_advice_visible(false).unwrap();
        view.show_advice("Test", "ADVICE #7").unwrap();
        view.set_advice_visible(true).unwrap();

        let output = view.output();
        assert!(output.contains("── ADVICE #7 ──"));
        assert!(output.contains("“Test”"));
    }

    #[test]
    fn test_scroll_to_advice_reprints_card() {
        let view = TerminalView::new(Vec::new(), &default_stat_targets());
        view.scroll_to_advice().unwrap();
        assert!(view.output().is_empty());

        view.show_advice("Test", "ADVICE #7").unwrap();
        view.scroll_to_advice().unwrap();
        assert_eq!(view.output().matches("── ADVICE #7 ──").count(), 1);
    }

    #[test]
    fn test_stats_redraw_in_place() {
        let view = TerminalView::new(Vec::new(), &default_stat_targets());
        view.set_stat_text(0, "224").unwrap();
        view.set_stat_text(1, "15K+").unwrap();
        view.set_loading(true).unwrap();

        let output = view.output();
        assert!(output.contains("\r  📊 224  ·  15K+  ·  ∞"));
        assert!(output.ends_with("  ⏳ Fetching advice...\n"));
    }

    #[test]
    fn test_starfield_width() {
        let particles = vec![
            Particle {
                left_pct: 0.0,
                top_pct: 10.0,
                delay_secs: 1.0,
                duration_secs: 4.5,
            },
            Particle {
                left_pct: 99.9,
                top_pct: 50.0,
                delay_secs: 2.0,
                duration_secs: 6.5,
            },
        ];
        let row = starfield(&particles);
        assert_eq!(row.chars().count(), STARFIELD_WIDTH);
        assert!(row.starts_with('·'));
        assert!(row.ends_with('✦'));
    }
}
