//! Serial port backend
//!
//! This module provides:
//! - Enumerating available serial ports (USB-to-serial adapters, CDC ACM boards)
//! - Opening a port with the Jtagger framing (115200 8N1, 1 s timeout)
//! - A `Transport` implementation over the open port

pub mod port;

pub use port::{list_ports, PortConfig, SerialConnection};
