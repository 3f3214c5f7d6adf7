//! Interactive port selection
//!
//! Lists the enumerated ports with 1-based ordinals and keeps asking until the
//! operator picks one or enters 0 to cancel.

use crate::error::{BridgeError, SelectionError};
use crate::transport::Operator;
use std::io::Write;

/// A serial port as seen before connecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortDescriptor {
    /// Device path, e.g. `/dev/ttyUSB0` or `COM4`
    pub device: String,
    pub description: String,
}

impl PortDescriptor {
    pub fn new(device: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            description: description.into(),
        }
    }
}

/// Outcome of the selection prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Port(String),
    Cancelled,
}

/// Print the numbered port list.
pub fn print_ports<W: Write>(ports: &[PortDescriptor], out: &mut W) -> Result<(), BridgeError> {
    writeln!(out, "\nAvailable ports:")?;
    for (i, port) in ports.iter().enumerate() {
        writeln!(out, "{}: {} - {}", i + 1, port.device, port.description)?;
    }
    Ok(())
}

/// Validate one typed ordinal against `count` ports.
///
/// Returns `Ok(None)` for 0 (cancel) and `Ok(Some(index))` with a zero-based
/// index otherwise.
pub fn parse_ordinal(text: &str, count: usize) -> Result<Option<usize>, SelectionError> {
    let trimmed = text.trim();
    let ordinal: i64 = trimmed
        .parse()
        .map_err(|_| SelectionError::NotANumber(trimmed.to_string()))?;

    if ordinal == 0 {
        return Ok(None);
    }
    match usize::try_from(ordinal) {
        Ok(n) if n <= count => Ok(Some(n - 1)),
        _ => Err(SelectionError::OutOfRange { ordinal, count }),
    }
}

/// Prompt until a valid ordinal or cancellation is entered.
///
/// Closed input counts as cancellation.
pub fn select<I, W>(
    ports: &[PortDescriptor],
    input: &mut I,
    out: &mut W,
) -> Result<Selection, BridgeError>
where
    I: Operator + ?Sized,
    W: Write,
{
    if ports.is_empty() {
        return Err(BridgeError::NoPorts);
    }

    loop {
        write!(out, "\nSelect port number (or 0 to exit): ")?;
        out.flush()?;

        let Some(line) = input.read_line()? else {
            log::debug!("operator input closed during port selection");
            return Ok(Selection::Cancelled);
        };

        match parse_ordinal(&line, ports.len()) {
            Ok(Some(index)) => return Ok(Selection::Port(ports[index].device.clone())),
            Ok(None) => return Ok(Selection::Cancelled),
            Err(err) => {
                log::debug!("rejected port selection {:?}: {:?}", line, err);
                writeln!(out, "{}", err)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ports() -> Vec<PortDescriptor> {
        vec![
            PortDescriptor::new("/dev/ttyUSB0", "Arduino Uno"),
            PortDescriptor::new("/dev/ttyACM0", "USB Serial"),
        ]
    }

    #[test]
    fn test_parse_boundaries() {
        assert_eq!(parse_ordinal("0", 2), Ok(None));
        assert_eq!(parse_ordinal("0", 0), Ok(None));
        assert_eq!(parse_ordinal("1", 2), Ok(Some(0)));
        assert_eq!(parse_ordinal(" 2 ", 2), Ok(Some(1)));
        assert_eq!(
            parse_ordinal("3", 2),
            Err(SelectionError::OutOfRange { ordinal: 3, count: 2 })
        );
        assert_eq!(
            parse_ordinal("-1", 2),
            Err(SelectionError::OutOfRange { ordinal: -1, count: 2 })
        );
        assert_eq!(
            parse_ordinal("two", 2),
            Err(SelectionError::NotANumber("two".into()))
        );
        assert!(parse_ordinal("", 2).is_err());
    }

    #[test]
    fn test_print_ports() {
        let mut out = Vec::new();
        print_ports(&ports(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1: /dev/ttyUSB0 - Arduino Uno\n"));
        assert!(text.contains("2: /dev/ttyACM0 - USB Serial\n"));
    }

    #[test]
    fn test_select_last_port() {
        let mut input = Cursor::new("2\n");
        let mut out = Vec::new();
        let selection = select(&ports(), &mut input, &mut out).unwrap();
        assert_eq!(selection, Selection::Port("/dev/ttyACM0".into()));
    }

    #[test]
    fn test_select_reprompts_until_valid() {
        let mut input = Cursor::new("3\nabc\n1\n");
        let mut out = Vec::new();
        let selection = select(&ports(), &mut input, &mut out).unwrap();
        assert_eq!(selection, Selection::Port("/dev/ttyUSB0".into()));

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Select port number").count(), 3);
        assert!(text.contains("Invalid selection!"));
        assert!(text.contains("Please enter a valid number!"));
    }

    #[test]
    fn test_select_cancel() {
        let mut input = Cursor::new("0\n");
        let mut out = Vec::new();
        assert_eq!(select(&ports(), &mut input, &mut out).unwrap(), Selection::Cancelled);
    }

    #[test]
    fn test_select_closed_input_cancels() {
        let mut input = Cursor::new("9\n");
        let mut out = Vec::new();
        assert_eq!(select(&ports(), &mut input, &mut out).unwrap(), Selection::Cancelled);
    }

    #[test]
    fn test_select_without_ports() {
        let mut input = Cursor::new("1\n");
        let mut out = Vec::new();
        assert!(matches!(select(&[], &mut input, &mut out), Err(BridgeError::NoPorts)));
        assert!(out.is_empty());
    }
}
