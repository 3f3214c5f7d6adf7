//! Prompt-driven interaction loop
//!
//! One round drains whatever the device has sent, echoing each line to the
//! terminal. A line containing the prompt marker switches the session to
//! awaiting input: one operator line is read and forwarded to the device,
//! and the round ends. If the device goes quiet without prompting, the round
//! ends without asking the operator for anything.

use crate::codec::LineCodec;
use crate::config::SessionConfig;
use crate::error::BridgeError;
use crate::transport::{Operator, Transport};
use colored::Colorize;
use std::io::Write;
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Between rounds
    Idle,
    /// Echoing buffered device output
    Draining,
    /// The device prompted; blocked on the operator
    AwaitingInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Continue,
    Stop,
}

/// An interactive session over one open link.
pub struct Session<T, I, W> {
    link: T,
    input: I,
    out: W,
    config: SessionConfig,
    codec: LineCodec,
    state: SessionState,
}

impl<T, I, W> Session<T, I, W>
where
    T: Transport,
    I: Operator,
    W: Write,
{
    pub fn new(link: T, input: I, out: W, config: SessionConfig, codec: LineCodec) -> Self {
        Self {
            link,
            input,
            out,
            config,
            codec,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn link(&self) -> &T {
        &self.link
    }

    /// Run one drain / prompt / forward round.
    pub fn round(&mut self) -> Result<RoundOutcome, BridgeError> {
        self.state = SessionState::Draining;

        while self.state == SessionState::Draining {
            if self.link.bytes_available()? == 0 {
                self.state = SessionState::Idle;
                return Ok(RoundOutcome::Continue);
            }
            self.drain_line()?;
        }

        let outcome = self.forward_input()?;
        self.state = SessionState::Idle;
        Ok(outcome)
    }

    /// Repeat rounds until one signals stop, pausing between rounds.
    pub fn run(&mut self) -> Result<(), BridgeError> {
        loop {
            match self.round()? {
                RoundOutcome::Continue => thread::sleep(self.config.round_delay),
                RoundOutcome::Stop => {
                    log::debug!("session stopped by operator");
                    return Ok(());
                }
            }
        }
    }

    /// Flush and close the link. Consumes the session so it happens once.
    pub fn close(mut self) -> Result<(), BridgeError> {
        self.link.close()?;
        writeln!(self.out, "\nSerial connection closed")?;
        self.out.flush()?;
        Ok(())
    }

    /// Read and echo one line; a failed read is reported and skipped.
    fn drain_line(&mut self) -> Result<(), BridgeError> {
        let raw = match self.link.read_line() {
            Ok(raw) => raw,
            Err(err) if err.is_recoverable() => {
                log::warn!("serial read failed: {}", err);
                writeln!(self.out, "{} {}", "Error:".red().bold(), err)?;
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        log::debug!("drained {} bytes", raw.len());
        let text = self.codec.decode(&raw);
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;

        if text.contains(self.config.prompt_marker) {
            self.state = SessionState::AwaitingInput;
        }
        Ok(())
    }

    fn forward_input(&mut self) -> Result<RoundOutcome, BridgeError> {
        let Some(line) = self.input.read_line()? else {
            log::warn!("operator input closed, ending session");
            return Ok(RoundOutcome::Stop);
        };

        let mut message = line;
        message.push('\n');
        self.link.write_all(message.as_bytes())?;
        self.link.flush()?;
        log::debug!("sent {} bytes", message.len());

        if message.trim_end_matches('\n') == self.config.exit_command {
            Ok(RoundOutcome::Stop)
        } else {
            Ok(RoundOutcome::Continue)
        }
    }
}
