//! `folio` - the portfolio in a terminal.
//!
//! Scroll with j/k, arrows, space and PageUp/PageDown; Home/End jump.
//! Tab moves into the contact form, Enter sends it, Esc leaves it.
//! q or Ctrl+C quits.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use folio_tui::pipeline::{Page, clock, mount, run};
use folio_tui::{SiteConfig, build_site};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "A portfolio rendered in the terminal", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frames per second (overrides the configuration)
    #[arg(long)]
    fps: Option<u32>,

    /// Write logs to this file (filter with FOLIO_LOG or RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

/// Logs go to a file: the terminal belongs to the page.
fn init_logging(path: &Path) -> folio_tui::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_env("FOLIO_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn main() -> folio_tui::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let mut config = match &cli.config {
        Some(path) => SiteConfig::load(path)?,
        None => SiteConfig::default(),
    };
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    config.validate()?;

    if cli.dump_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let mut site = build_site(&config)?;
    let controller = site.controller();

    let mut page = Page::new().with_scroll_step(config.scroll_step);
    let ticker = controller.clone();
    page.add_frame_hook(move |now| ticker.tick(now));

    let mut handle = mount(page, config.fps)?;
    handle.set_key_handler(move |key, _page| controller.handle_key(key, clock::now()));

    tracing::info!(fps = config.fps, "folio started");
    let outcome = run(&mut handle);
    handle.unmount()?;
    site.teardown();
    outcome?;

    tracing::info!("folio stopped");
    Ok(())
}
