//! Top-level console driver: pick a port, open it, run the session.

use crate::config::SessionConfig;
use crate::selector::{self, PortDescriptor, Selection};
use crate::session::Session;
use crate::transport::{Operator, Transport};
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;

/// Drive a whole console session.
///
/// `open` is only called once the operator has picked a port, so an empty
/// port list or a cancelled selection never touches the hardware.
pub fn run_console<I, W, T, F>(
    ports: &[PortDescriptor],
    mut input: I,
    mut out: W,
    config: SessionConfig,
    open: F,
) -> Result<()>
where
    I: Operator,
    W: Write,
    T: Transport,
    F: FnOnce(&str) -> Result<T>,
{
    let codec = config.codec()?;

    if ports.is_empty() {
        writeln!(out, "{}", "No serial ports found!".yellow())?;
        return Ok(());
    }

    selector::print_ports(ports, &mut out)?;
    let port = match selector::select(ports, &mut input, &mut out)? {
        Selection::Port(port) => port,
        Selection::Cancelled => {
            log::debug!("port selection cancelled");
            return Ok(());
        }
    };
    writeln!(out, "selected: {}", port)?;

    let link = open(&port)?;
    writeln!(
        out,
        "{} Connected to {} ({})",
        "[OK]".green().bold(),
        port.white().bold(),
        codec.name()
    )?;

    let mut session = Session::new(link, input, out, config, codec);
    session
        .run()
        .with_context(|| format!("Session on {} failed", port))?;
    session.close().with_context(|| format!("Failed to close {}", port))?;
    Ok(())
}
