//! Touchpad Numpad
//!
//! Main entry point: config, logging, device setup and the run loop.

mod cli;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use numpad_engine::Feedback;
use touchpad_numpad::config::NumpadConfig;
use touchpad_numpad::discovery::{find_touchpad, scan};
use touchpad_numpad::driver::{build_session, run, setup_interrupt_handler};
use touchpad_numpad::feedback::{DesktopFeedback, NoFeedback};
use touchpad_numpad::keyboard::VirtualKeyboard;
use touchpad_numpad::touchpad::Touchpad;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load config
    let config_path = cli.config.unwrap_or_else(NumpadConfig::default_path);
    info!("Loading config from {:?}", config_path);
    let config = NumpadConfig::load(&config_path)?;

    if cli.init_config {
        config.save(&config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    if cli.list_devices {
        list_devices(&config);
        return Ok(());
    }

    let touchpad = match &cli.device {
        Some(path) => Touchpad::open(path)?,
        None => find_touchpad(config.max_event_index, &config.name_patterns)?,
    };

    let mut keyboard = VirtualKeyboard::new(&config.device_name)?;
    info!("Created virtual keyboard: {}", keyboard.name());
    if let Some(path) = keyboard.device_path() {
        info!("Device path: {}", path.display());
    }

    let session = build_session(&touchpad, keyboard, &config)?;

    let mut feedback: Box<dyn Feedback> = if cli.quiet {
        Box::new(NoFeedback)
    } else {
        Box::new(DesktopFeedback::new(config.feedback.clone()))
    };

    let running = setup_interrupt_handler();
    run(touchpad, session, feedback.as_mut(), &running)
}

/// Print every scanned input device
fn list_devices(config: &NumpadConfig) {
    let candidates = scan(config.max_event_index, &config.name_patterns);
    if candidates.is_empty() {
        println!("No readable input devices (try running as root)");
        return;
    }

    for c in candidates {
        let marker = if c.matches { "*" } else { " " };
        println!("{} {:<20} {}", marker, c.path.display().to_string(), c.name);
    }
    println!();
    println!("* = matches {:?}", config.name_patterns);
}
