//! Seams between the session loop and the outside world.
//!
//! `Transport` is the byte link to the device and `Operator` is the human at
//! the keyboard. The real serial port lives in `serial::port`; tests drive the
//! session with scripted doubles instead.

use crate::error::BridgeError;
use std::io::{self, BufRead};

/// A line-oriented byte link to the device.
pub trait Transport {
    /// Number of received bytes waiting to be read.
    fn bytes_available(&mut self) -> Result<usize, BridgeError>;

    /// Read up to and including the next `\n`. A timeout ends the read early
    /// and returns whatever arrived, possibly nothing.
    fn read_line(&mut self) -> Result<Vec<u8>, BridgeError>;

    fn write_all(&mut self, data: &[u8]) -> Result<(), BridgeError>;

    fn flush(&mut self) -> Result<(), BridgeError>;

    /// Flush and release the link.
    fn close(&mut self) -> Result<(), BridgeError> {
        self.flush()
    }
}

/// Source of operator input lines.
pub trait Operator {
    /// Next line without its terminator, or `None` once input is closed.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

impl<R: BufRead> Operator for R {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if BufRead::read_line(self, &mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Transport that replays queued reads and records everything written.
    #[derive(Default)]
    pub struct ScriptedLink {
        incoming: VecDeque<Result<Vec<u8>, String>>,
        pub sent: Rc<RefCell<Vec<u8>>>,
        pub flushes: Rc<Cell<usize>>,
        pub closes: Rc<Cell<usize>>,
        pub fail_writes: bool,
        pub fail_queries: bool,
    }

    impl ScriptedLink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_lines(lines: &[&str]) -> Self {
            let mut link = Self::new();
            for line in lines {
                link.push_bytes(line.as_bytes());
            }
            link
        }

        pub fn push_bytes(&mut self, bytes: &[u8]) {
            self.incoming.push_back(Ok(bytes.to_vec()));
        }

        pub fn push_error(&mut self, message: &str) {
            self.incoming.push_back(Err(message.to_string()));
        }

        pub fn pending(&self) -> usize {
            self.incoming.len()
        }
    }

    impl Transport for ScriptedLink {
        fn bytes_available(&mut self) -> Result<usize, BridgeError> {
            if self.fail_queries {
                return Err(BridgeError::BufferQuery("No such device".into()));
            }
            Ok(self
                .incoming
                .iter()
                .map(|item| match item {
                    Ok(bytes) => bytes.len(),
                    Err(_) => 1,
                })
                .sum())
        }

        fn read_line(&mut self) -> Result<Vec<u8>, BridgeError> {
            match self.incoming.pop_front() {
                Some(Ok(bytes)) => Ok(bytes),
                Some(Err(message)) => Err(BridgeError::Read(message)),
                None => Ok(Vec::new()),
            }
        }

        fn write_all(&mut self, data: &[u8]) -> Result<(), BridgeError> {
            if self.fail_writes {
                return Err(BridgeError::Write("device disconnected".into()));
            }
            self.sent.borrow_mut().extend_from_slice(data);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), BridgeError> {
            self.flushes.set(self.flushes.get() + 1);
            Ok(())
        }

        fn close(&mut self) -> Result<(), BridgeError> {
            self.flush()?;
            self.closes.set(self.closes.get() + 1);
            Ok(())
        }
    }
}
