//! jtagger-ctl
//!
//! Talk to the Jtagger Arduino driver over a serial port.
//!
//! # Usage
//!
//! ```bash
//! # Pick a port interactively and start the session
//! jtagger-ctl
//!
//! # List available serial ports
//! jtagger-ctl --list
//!
//! # Use session settings from a file, decode device output as UTF-8
//! jtagger-ctl --config jtagger.toml --encoding utf-8
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use jtagger_ctl::SessionConfig;

/// Interactive console for the Jtagger Arduino driver
#[derive(Parser)]
#[command(name = "jtagger-ctl")]
#[command(version)]
#[command(about = "Interactive serial console for the Jtagger Arduino driver")]
struct Cli {
    /// Session settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Character encoding of device output (overrides the config file)
    #[arg(short, long)]
    encoding: Option<String>,

    /// List available serial ports and exit
    #[arg(short, long)]
    list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match cli.config {
        Some(ref path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(ref label) = cli.encoding {
        config = config.with_encoding(label);
        config.validate()?;
    }

    run(config, cli.list)
}

#[cfg(feature = "serial")]
fn run(config: SessionConfig, list_only: bool) -> Result<()> {
    use jtagger_ctl::serial::{self, PortConfig, SerialConnection};
    use std::io;

    let ports = serial::list_ports()?;
    let stdout = io::stdout();

    if list_only {
        if ports.is_empty() {
            println!("No serial ports found!");
        } else {
            jtagger_ctl::selector::print_ports(&ports, &mut stdout.lock())?;
        }
        return Ok(());
    }

    jtagger_ctl::run_console(&ports, io::stdin().lock(), stdout.lock(), config, |path| {
        SerialConnection::open(PortConfig::new(path))
    })
}

#[cfg(not(feature = "serial"))]
fn run(_config: SessionConfig, _list_only: bool) -> Result<()> {
    anyhow::bail!("built without serial port support; rebuild with --features serial")
}
