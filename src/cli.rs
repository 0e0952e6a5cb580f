// CLI definitions using clap

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "touchpad-numpad")]
#[command(author, version, about = "Use a laptop touchpad as a numeric keypad")]
pub struct Cli {
    /// Config file path (default: ~/.config/touchpad-numpad/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Touchpad event node, skips auto-discovery (e.g. /dev/input/event5)
    #[arg(short, long, value_name = "PATH")]
    pub device: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// No sounds or notifications on toggle
    #[arg(short, long)]
    pub quiet: bool,

    /// List input devices and whether they look like a touchpad, then exit
    #[arg(long)]
    pub list_devices: bool,

    /// Write the effective config to the config path, then exit
    #[arg(long)]
    pub init_config: bool,
}
