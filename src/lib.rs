//! Interactive serial console for the Jtagger Arduino driver.
//!
//! The sketch prints lines over UART and ends a line with `>` when it wants
//! operator input. This crate lists the serial ports, lets the operator pick
//! one, echoes device output and forwards one typed line per prompt. Typing
//! `z` at a prompt ends the session.
//!
//! The hardware backend sits behind the `serial` feature. Everything else
//! talks to the device through [`transport::Transport`], so the session can
//! be driven from scripted byte streams.

pub mod bridge;
pub mod codec;
pub mod config;
pub mod error;
pub mod selector;
#[cfg(feature = "serial")]
pub mod serial;
pub mod session;
pub mod transport;

pub use bridge::run_console;
pub use codec::LineCodec;
pub use config::SessionConfig;
pub use error::{BridgeError, SelectionError};
pub use selector::{PortDescriptor, Selection};
pub use session::{RoundOutcome, Session, SessionState};
pub use transport::{Operator, Transport};
