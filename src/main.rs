use advice_board::adapters::terminal::{parse_command, Command, HELP};
use advice_board::app::widget::{PendingTasks, WidgetTask};
use advice_board::core::render::CycleOutcome;
use advice_board::core::{AdviceSource, AdviceView, ConfigProvider};
use advice_board::utils::logger;
use advice_board::{
    AdviceFetcher, AdviceSlipClient, AdviceWidget, CliConfig, InMemoryView, TerminalView,
    WidgetConfig,
};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting advice-board");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let source = AdviceSlipClient::from_config(&config).context("failed to build HTTP client")?;
    tracing::debug!("Advice endpoint: {}", source.endpoint());
    let fetcher = AdviceFetcher::new(source);
    let targets = config.stats_settings().targets;

    if cli.once && cli.json {
        let view = Arc::new(InMemoryView::with_stats(&[], &targets));
        let widget = AdviceWidget::new(fetcher, Arc::clone(&view), &config);
        log_outcome(&widget.start().await);
        println!("{}", view.snapshot().to_json()?);
        return Ok(());
    }

    let view = Arc::new(TerminalView::stdout(&targets));
    let widget = Arc::new(AdviceWidget::new(fetcher, view, &config));

    if cli.once {
        log_outcome(&widget.start().await);
        return Ok(());
    }

    run_interactive(widget, &config).await
}

async fn run_interactive<S, V>(widget: Arc<AdviceWidget<S, V>>, config: &WidgetConfig) -> anyhow::Result<()>
where
    S: AdviceSource + 'static,
    V: AdviceView + 'static,
{
    tracing::debug!("Interactive mode, {} particles", config.particle_count());

    let mut pending = PendingTasks::new();
    pending.track(Some(WidgetTask::Render({
        let widget = Arc::clone(&widget);
        tokio::spawn(async move { widget.start().await })
    })));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match parse_command(&line) {
            Some(Command::Quit) => break,
            Some(Command::Help) => println!("  {}", HELP),
            Some(Command::Input(event)) => {
                let dispatch = widget.dispatch(event);
                if dispatch.prevent_default {
                    tracing::debug!("Default key behaviour suppressed");
                }
                pending.track(dispatch.task);
            }
            None => println!("  Unknown command. {}", HELP),
        }
    }

    // 讓進行中的 render / stats 動畫正常收尾
    if !pending.is_empty() {
        tracing::debug!("Waiting for {} running task(s)", pending.len());
    }
    for outcome in pending.drain().await {
        log_outcome(&outcome);
    }

    tracing::info!("👋 Bye");
    Ok(())
}

fn log_outcome(outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Completed(report) => {
            if let Some(error) = &report.render_error {
                tracing::warn!("Advice #{} rendered with errors: {}", report.outcome.record.id, error);
            }
        }
        CycleOutcome::Skipped => tracing::debug!("Render skipped, another cycle is running"),
        CycleOutcome::Aborted { missing } => {
            tracing::warn!("Render aborted, {} element(s) missing", missing.len())
        }
    }
}
