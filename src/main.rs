use anonchat::Variant;
use anonchat::core::config;
use anonchat::tui;
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "anonchat", about = "Anonymous chat, with simulated strangers")]
struct Args {
    /// Room variant to run
    #[arg(short, long, value_enum)]
    mode: Option<Variant>,

    /// Seed for the simulation; the same seed replays the same session
    #[arg(short, long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to anonchat.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("anonchat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("{}, falling back to defaults", e);
        config::ChatConfigFile::default()
    });
    let resolved = config::resolve(&file_config, args.mode, args.seed);

    log::info!(
        "anonchat starting: variant={} seed={:?}",
        resolved.variant_name.label(),
        resolved.seed
    );

    tui::run(resolved)
}
