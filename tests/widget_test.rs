use advice_board::adapters::terminal::{parse_command, Command, STATS_IN_VIEW, VIEWPORT_HEIGHT};
use advice_board::app::widget::{PendingTasks, WidgetTask};
use advice_board::core::bindings::{InputEvent, Key};
use advice_board::core::render::CycleOutcome;
use advice_board::core::AdviceSource;
use advice_board::domain::model::{AdviceRecord, Element, SectionBounds};
use advice_board::{AdviceFetcher, AdviceWidget, InMemoryView, Result, TerminalView, WidgetConfig};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 每次回傳遞增 id 的假來源
struct CountingSource {
    next_id: AtomicU32,
}

impl CountingSource {
    fn new() -> Self {
        Self {
            next_id: AtomicU32::new(1),
        }
    }
}

#[async_trait]
impl AdviceSource for CountingSource {
    async fn fetch_advice(&self) -> Result<AdviceRecord> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(AdviceRecord::new(id, format!("Advice number {}", id)))
    }
}

fn widget_with(view: InMemoryView) -> (Arc<AdviceWidget<CountingSource, InMemoryView>>, Arc<InMemoryView>) {
    let view = Arc::new(view);
    let config = WidgetConfig::default();
    let widget = AdviceWidget::new(
        AdviceFetcher::new(CountingSource::new()),
        Arc::clone(&view),
        &config,
    );
    (Arc::new(widget), view)
}

async fn finish(task: Option<WidgetTask>) {
    match task {
        Some(WidgetTask::Render(handle)) => {
            handle.await.expect("render task");
        }
        Some(WidgetTask::Stats(handle)) => {
            handle.await.expect("stats task").expect("stats animation");
        }
        None => {}
    }
}

#[tokio::test(start_paused = true)]
async fn test_keyboard_triggers_cycle_and_prevents_default() {
    let (widget, view) = widget_with(InMemoryView::new());

    for key in [Key::Enter, Key::Space] {
        let dispatch = widget.dispatch(InputEvent::KeyDown(key));
        assert!(dispatch.prevent_default);
        finish(dispatch.task).await;
    }

    let snapshot = view.snapshot();
    assert_eq!(snapshot.advice_label, "ADVICE #2");
    assert_eq!(snapshot.advice_text, "Advice number 2");
    assert!(snapshot.trigger_enabled);
    assert!(!snapshot.loading);
}

#[tokio::test(start_paused = true)]
async fn test_other_keys_are_ignored() {
    let (widget, view) = widget_with(InMemoryView::new());

    let dispatch = widget.dispatch(InputEvent::KeyDown(Key::from_code("KeyX")));
    assert!(!dispatch.prevent_default);
    assert!(dispatch.task.is_none());
    assert_eq!(view.count_events("loading:true"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_clicks_run_one_cycle() {
    let (widget, view) = widget_with(InMemoryView::new());

    let first = widget.dispatch(InputEvent::Click);
    tokio::time::sleep(Duration::from_millis(100)).await;
    let second = widget.dispatch(InputEvent::Click);

    let (Some(WidgetTask::Render(first)), Some(WidgetTask::Render(second))) =
        (first.task, second.task)
    else {
        panic!("clicks should spawn render tasks");
    };

    assert!(matches!(second.await.expect("second"), CycleOutcome::Skipped));
    assert!(matches!(first.await.expect("first"), CycleOutcome::Completed(_)));
    assert_eq!(view.snapshot().advice_label, "ADVICE #1");
}

#[tokio::test(start_paused = true)]
async fn test_stats_animate_once() {
    let (widget, view) = widget_with(InMemoryView::new());
    let scroll = InputEvent::Scroll {
        viewport_height: VIEWPORT_HEIGHT,
        stats_section: STATS_IN_VIEW,
    };

    let dispatch = widget.dispatch(scroll.clone());
    assert!(matches!(dispatch.task, Some(WidgetTask::Stats(_))));
    finish(dispatch.task).await;

    let snapshot = view.snapshot();
    assert_eq!(snapshot.stats, vec!["224", "15K+", "∞"]);
    let finals = view.count_events("stat0:224");
    assert_eq!(finals, 1);
    // 符號那格從不更新
    assert!(snapshot.events.iter().all(|event| !event.op.starts_with("stat2:")));

    // 再次進入畫面不會重跑
    let dispatch = widget.dispatch(scroll);
    assert!(dispatch.task.is_none());
    assert_eq!(view.count_events("stat0:224"), finals);
}

#[tokio::test(start_paused = true)]
async fn test_stats_count_up_is_monotonic() {
    let (widget, view) = widget_with(InMemoryView::new());
    widget.animate_stats().await.unwrap();

    let values: Vec<u32> = view
        .snapshot()
        .events
        .iter()
        .filter_map(|event| event.op.strip_prefix("stat0:"))
        .map(|value| value.parse().unwrap())
        .collect();
    assert!(values.len() > 2);
    assert_eq!(values.first(), Some(&0));
    assert_eq!(values.last(), Some(&224));
    assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[tokio::test(start_paused = true)]
async fn test_hidden_stats_section_does_not_trigger() {
    let (widget, _view) = widget_with(InMemoryView::new());
    let below_fold = SectionBounds {
        top: 1200.0,
        height: 160.0,
    };
    assert!(!widget.observe_stats(below_fold, VIEWPORT_HEIGHT));
    assert!(widget.observe_stats(STATS_IN_VIEW, VIEWPORT_HEIGHT));
}

#[tokio::test(start_paused = true)]
async fn test_missing_stats_section_never_triggers() {
    let (widget, _view) = widget_with(InMemoryView::without(&[Element::StatsSection]));
    assert!(!widget.observe_stats(STATS_IN_VIEW, VIEWPORT_HEIGHT));
}

#[tokio::test(start_paused = true)]
async fn test_pointer_move_tilts_and_clears() {
    let (widget, view) = widget_with(InMemoryView::new());

    // advice 卡片位於 (100, 80)，大小 600x320
    let dispatch = widget.dispatch(InputEvent::PointerMove { x: 450.0, y: 300.0 });
    assert!(dispatch.task.is_none());
    let transforms = view.snapshot().card_transforms;
    assert_eq!(
        transforms.get("advice-card").map(String::as_str),
        Some("perspective(1000px) rotateX(6deg) rotateY(-5deg) translateZ(20px)")
    );
    assert_eq!(transforms.len(), 1);

    widget.dispatch(InputEvent::PointerMove { x: 5.0, y: 5.0 });
    assert!(view.snapshot().card_transforms.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_missing_particle_container_skips_mount() {
    let (widget, view) = widget_with(InMemoryView::without(&[Element::ParticleContainer]));
    assert_eq!(widget.mount_particles().unwrap(), 0);
    assert!(view.snapshot().particles.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_missing_button_aborts_start() {
    let (widget, view) = widget_with(InMemoryView::without(&[Element::GenerateButton]));

    let outcome = widget.start().await;
    assert!(matches!(outcome, CycleOutcome::Aborted { .. }));
    // 粒子仍然掛上
    assert_eq!(view.snapshot().particles.len(), 50);
    assert_eq!(view.snapshot().advice_text, "");
}

#[tokio::test(start_paused = true)]
async fn test_terminal_session_from_commands() {
    let view = Arc::new(TerminalView::new(Vec::new(), &WidgetConfig::default().stats.targets));
    let config = WidgetConfig::default();
    let widget = Arc::new(AdviceWidget::new(
        AdviceFetcher::new(CountingSource::new()),
        Arc::clone(&view),
        &config,
    ));

    for line in ["g", "s"] {
        let Some(Command::Input(event)) = parse_command(line) else {
            panic!("'{}' should parse to an input event", line);
        };
        let dispatch = widget.dispatch(event);
        match dispatch.task {
            Some(WidgetTask::Render(handle)) => {
                handle.await.expect("render task");
            }
            Some(WidgetTask::Stats(handle)) => {
                handle.await.expect("stats task").expect("stats animation");
            }
            None => panic!("'{}' should start a task", line),
        }
    }

    let output = view.output();
    assert!(output.contains("⏳ Fetching advice..."));
    assert!(output.contains("── ADVICE #1 ──"));
    assert!(output.contains("“Advice number 1”"));
    assert!(output.contains("224  ·  15K+  ·  ∞"));
}

#[tokio::test(start_paused = true)]
async fn test_pending_tasks_finish_before_exit() {
    let (widget, view) = widget_with(InMemoryView::new());
    let mut pending = PendingTasks::new();

    pending.track(widget.dispatch(InputEvent::Click).task);
    pending.track(
        widget
            .dispatch(InputEvent::Scroll {
                viewport_height: VIEWPORT_HEIGHT,
                stats_section: STATS_IN_VIEW,
            })
            .task,
    );
    pending.track(widget.dispatch(InputEvent::KeyDown(Key::from_code("KeyX"))).task);
    assert_eq!(pending.len(), 2);

    // 剛送出就離開：仍要等 render 與 stats 動畫跑完
    let outcomes = pending.drain().await;
    assert!(pending.is_empty());
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(outcomes[0], CycleOutcome::Completed(_)));

    let snapshot = view.snapshot();
    assert_eq!(snapshot.advice_label, "ADVICE #1");
    assert!(snapshot.advice_visible);
    assert!(snapshot.trigger_enabled);
    assert_eq!(snapshot.stats, vec!["224", "15K+", "∞"]);
}

#[tokio::test(start_paused = true)]
async fn test_pending_tasks_drop_finished_handles() {
    let (widget, _view) = widget_with(InMemoryView::new());
    let mut pending = PendingTasks::new();

    pending.track(widget.dispatch(InputEvent::Click).task);
    tokio::time::sleep(Duration::from_secs(2)).await;

    pending.track(None);
    assert!(pending.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_scroll_to_advice_command() {
    let (widget, view) = widget_with(InMemoryView::new());

    let Some(Command::Input(event)) = parse_command("a") else {
        panic!("`a` should map to an input event");
    };
    let dispatch = widget.dispatch(event);
    assert!(!dispatch.prevent_default);
    assert!(dispatch.task.is_none());
    assert_eq!(view.count_events("scroll:advice"), 1);

    let (widget, view) = widget_with(InMemoryView::without(&[Element::AdviceCard]));
    assert!(widget.scroll_to_advice().is_err());
    widget.dispatch(InputEvent::ScrollToAdvice);
    assert_eq!(view.count_events("scroll:advice"), 0);
}
