use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use colloquy::MetricsPreset;
use colloquy::core::config::{self, CliOverrides, ColloquyConfig};
use colloquy::core::thread::MessageThread;
use colloquy::layout::VerticalAnchor;
use colloquy::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "colloquy", about = "Message thread viewer for the terminal")]
struct Args {
    /// Thread JSON file to open (defaults to the bundled demo)
    #[arg(short, long)]
    thread: Option<PathBuf>,

    /// Layout unit system
    #[arg(short, long, value_enum)]
    preset: Option<MetricsPreset>,

    /// Vertical anchor for avatars
    #[arg(short, long, value_enum)]
    avatar: Option<VerticalAnchor>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to colloquy.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("colloquy.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("{e}, using defaults");
        ColloquyConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            thread: args.thread,
            preset: args.preset,
            avatar: args.avatar,
        },
    );

    log::info!(
        "Colloquy starting up with {} preset",
        resolved.preset.label()
    );

    let thread = match &resolved.thread_path {
        Some(path) => MessageThread::load(path).unwrap_or_else(|e| {
            log::error!("{e}, falling back to the demo thread");
            MessageThread::demo()
        }),
        None => MessageThread::demo(),
    }
    .with_utc_offset(resolved.utc_offset);

    tui::run(resolved, thread)
}
