pub mod config;
pub mod event_loop;
pub mod inject;
pub mod input;
pub mod translate;

use crate::config::ControlMapping;
use crate::event_loop::{EventLoop, LoopSettings};
use crate::inject::KeyInjector;
use crate::input::gamepad::{GamepadSource, Opening};
use crate::translate::TranslatorRegistry;
use color_eyre::{eyre::WrapErr, Result};
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    setup()?;

    info!("Loading key mapping from {}", config::CONFIG_FILE);
    let mapping = config::load_or_create(Path::new(config::CONFIG_FILE))
        .wrap_err("Failed to load key mapping")?;

    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&shutdown))
            .wrap_err("Failed to register signal handler")?;
    }

    run(mapping, platform_injector()?, shutdown)
}

fn run<I: KeyInjector>(
    mapping: ControlMapping,
    injector: I,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    let registry = TranslatorRegistry::build(&mapping, &injector)
        .wrap_err("Failed to prepare synthetic key events")?;

    let source = GamepadSource::<Opening>::create()
        .and_then(|source| source.open())
        .wrap_err("Failed to open game controller")?;

    let mut event_loop = EventLoop::new(
        source,
        injector,
        registry,
        LoopSettings::default(),
        shutdown,
    );
    event_loop.run();

    drop(event_loop);
    info!("Key events released, exiting");
    Ok(())
}

#[cfg(target_os = "macos")]
fn platform_injector() -> Result<inject::quartz::QuartzInjector> {
    inject::quartz::QuartzInjector::new().wrap_err("Failed to open keyboard event source")
}

#[cfg(not(target_os = "macos"))]
fn platform_injector() -> Result<inject::dry_run::LogInjector> {
    tracing::warn!(
        "Synthetic key injection is only available on macOS, logging key events instead"
    );
    Ok(inject::dry_run::LogInjector::default())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
