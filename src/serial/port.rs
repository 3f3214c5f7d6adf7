//! Serial port configuration and connection management
//!
//! Handles port discovery and the connection to the Jtagger Arduino.

use crate::error::BridgeError;
use crate::selector::PortDescriptor;
use crate::transport::Transport;
use anyhow::{Context, Result};
use serialport::{DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

/// Baud rate the Jtagger sketch is compiled for
pub const JTAGGER_BAUD: u32 = 115200;

/// Read timeout; also bounds a partial line
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for serial port connection
#[derive(Debug, Clone)]
pub struct PortConfig {
    /// Serial port path (e.g., /dev/ttyUSB0, /dev/ttyACM0, COM4)
    pub port_path: String,
    /// Baud rate (default: 115200)
    pub baud_rate: u32,
    /// Data bits (default: 8)
    pub data_bits: DataBits,
    /// Parity (default: None)
    pub parity: Parity,
    /// Stop bits (default: 1)
    pub stop_bits: StopBits,
    /// Flow control (default: None)
    pub flow_control: FlowControl,
    /// Read timeout, also the deadline for one line (default: 1 s)
    pub timeout: Duration,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            port_path: String::new(),
            baud_rate: JTAGGER_BAUD,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            timeout: READ_TIMEOUT,
        }
    }
}

impl PortConfig {
    /// Create a new configuration with the fixed Jtagger framing
    pub fn new(port_path: &str) -> Self {
        Self {
            port_path: port_path.to_string(),
            ..Default::default()
        }
    }
}

/// An open serial port speaking newline-terminated text
pub struct SerialConnection {
    port: Box<dyn SerialPort>,
    config: PortConfig,
}

impl SerialConnection {
    /// Open the port and discard anything already buffered in either direction.
    pub fn open(config: PortConfig) -> Result<Self> {
        let port = serialport::new(&config.port_path, config.baud_rate)
            .data_bits(config.data_bits)
            .parity(config.parity)
            .stop_bits(config.stop_bits)
            .flow_control(config.flow_control)
            .timeout(config.timeout)
            .open()
            .map_err(|e| BridgeError::Open {
                port: config.port_path.clone(),
                reason: e.to_string(),
            })?;

        port.clear(serialport::ClearBuffer::All)
            .with_context(|| format!("Failed to clear buffers on {}", config.port_path))?;

        log::debug!(
            "opened {} at {} baud, timeout {:?}",
            config.port_path,
            config.baud_rate,
            config.timeout
        );
        Ok(Self { port, config })
    }
}

impl Transport for SerialConnection {
    fn bytes_available(&mut self) -> Result<usize, BridgeError> {
        self.port
            .bytes_to_read()
            .map(|n| n as usize)
            .map_err(|e| BridgeError::BufferQuery(e.to_string()))
    }

    fn read_line(&mut self) -> Result<Vec<u8>, BridgeError> {
        let deadline = Instant::now() + self.config.timeout;
        let mut line = Vec::new();
        let mut byte = [0u8; 1];

        while Instant::now() < deadline {
            match self.port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    line.push(byte[0]);
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::TimedOut => break,
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(BridgeError::Read(e.to_string())),
            }
        }

        Ok(line)
    }

    fn write_all(&mut self, data: &[u8]) -> Result<(), BridgeError> {
        self.port
            .write_all(data)
            .map_err(|e| BridgeError::Write(e.to_string()))
    }

    fn flush(&mut self) -> Result<(), BridgeError> {
        self.port
            .flush()
            .map_err(|e| BridgeError::Write(e.to_string()))
    }

    fn close(&mut self) -> Result<(), BridgeError> {
        self.flush()?;
        log::debug!("closing {}", self.config.port_path);
        Ok(())
    }
}

/// Human-readable description, preferring what the USB descriptor reports
fn describe(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(info) => info
            .product
            .clone()
            .or_else(|| info.manufacturer.clone())
            .unwrap_or_else(|| format!("USB Serial ({:04x}:{:04x})", info.vid, info.pid)),
        SerialPortType::PciPort => "PCI Serial".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        SerialPortType::Unknown => "n/a".to_string(),
    }
}

/// List all serial ports the OS currently reports, in OS order
pub fn list_ports() -> Result<Vec<PortDescriptor>, BridgeError> {
    let ports =
        serialport::available_ports().map_err(|e| BridgeError::Enumerate(e.to_string()))?;

    Ok(ports
        .into_iter()
        .map(|p| PortDescriptor::new(p.port_name, describe(&p.port_type)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serialport::UsbPortInfo;

    fn usb(product: Option<&str>, manufacturer: Option<&str>) -> SerialPortType {
        SerialPortType::UsbPort(UsbPortInfo {
            vid: 0x2341,
            pid: 0x0043,
            serial_number: None,
            manufacturer: manufacturer.map(String::from),
            product: product.map(String::from),
        })
    }

    #[test]
    fn test_default_config() {
        let config = PortConfig::new("/dev/ttyACM0");
        assert_eq!(config.port_path, "/dev/ttyACM0");
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
        assert_eq!(config.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_describe_prefers_product() {
        assert_eq!(describe(&usb(Some("Arduino Uno"), Some("Arduino LLC"))), "Arduino Uno");
        assert_eq!(describe(&usb(None, Some("Arduino LLC"))), "Arduino LLC");
        assert_eq!(describe(&usb(None, None)), "USB Serial (2341:0043)");
        assert_eq!(describe(&SerialPortType::Unknown), "n/a");
    }
}
