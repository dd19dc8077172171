use std::{thread, time::Duration};

use anyhow::Result;
use clap::Parser;
use lane_board::Board;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "lane_board=warn";

#[derive(Parser)]
#[command(
    name = "lane-board",
    about = "Run three concurrent workers against one progress board"
)]
struct Cli {
    /// Progress bar width (10 to 79, anything else uses 30)
    #[arg(short, long)]
    bar_len: Option<usize>,

    /// Milliseconds between repaints
    #[arg(short, long, default_value_t = 1000)]
    interval_ms: u64,

    /// Multiplier applied to every worker's sleep
    #[arg(short, long, default_value_t = 1.0)]
    scale: f64,
}

/// `RUST_LOG` wins when set; otherwise only this crate's warnings are shown.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    match directives.map(str::trim) {
        Some(directives) if !directives.is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(DEFAULT_LOG_FILTER),
    }
}

fn main() -> Result<()> {
    // The board owns stdout; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let pause = |ms: u64| thread::sleep(Duration::from_millis(ms).mul_f64(cli.scale.max(0.0)));

    let mut builder = Board::builder().refresh_interval(Duration::from_millis(cli.interval_ms));
    if let Some(bar_len) = cli.bar_len {
        builder = builder.bar_len(bar_len);
    }
    let board = builder.build();

    let task1 = board.add("Task 1", 100);
    let task2 = board.add("Task 2", 50);
    let download = board.add("Downloading", 0);

    board.start_auto_refresh()?;
    info!(bar_len = board.bar_len(), "board started");

    thread::scope(|s| {
        s.spawn(|| {
            for i in 1..=100 {
                task1.set_progress(i);
                pause(50);
            }
        });
        s.spawn(|| {
            for i in 1..=50 {
                task2.set_progress(i);
                pause(200);
            }
        });
        s.spawn(|| {
            for i in 1..500 {
                download.set_status(format!("Downloading {i}"), 0);
                pause(10);
            }
            download.set_status("Processing", 500);
            for i in 1..500 {
                download.set_progress(i);
                pause(10);
            }
        });
    });

    let cleared = board.clear_all()?;
    board.stop_auto_refresh();
    info!(cleared, "board cleared");

    Ok(())
}
