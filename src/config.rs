//! Session configuration
//!
//! Settings that shape one interactive session. Serial framing is fixed and
//! lives in `serial::PortConfig`; everything here can come from a TOML file:
//!
//! ```toml
//! prompt_marker = ">"
//! exit_command = "z"
//! encoding = "windows-1252"
//! round_delay_ms = 100
//! ```

use crate::codec::{LineCodec, DEFAULT_ENCODING};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Character in device output that means "the sketch wants input".
pub const DEFAULT_PROMPT_MARKER: char = '>';

/// Operator line that ends the session.
pub const DEFAULT_EXIT_COMMAND: &str = "z";

/// Pause between rounds to give the Arduino time to respond.
pub const DEFAULT_ROUND_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub prompt_marker: char,
    pub exit_command: String,
    /// WHATWG label of the device's character encoding
    pub encoding: String,
    pub round_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompt_marker: DEFAULT_PROMPT_MARKER,
            exit_command: DEFAULT_EXIT_COMMAND.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            round_delay: DEFAULT_ROUND_DELAY,
        }
    }
}

/// On-disk layout. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    prompt_marker: Option<char>,
    exit_command: Option<String>,
    encoding: Option<String>,
    round_delay_ms: Option<u64>,
}

impl SessionConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let defaults = Self::default();

        let config = Self {
            prompt_marker: file.prompt_marker.unwrap_or(defaults.prompt_marker),
            exit_command: file.exit_command.unwrap_or(defaults.exit_command),
            encoding: file.encoding.unwrap_or(defaults.encoding),
            round_delay: file
                .round_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.round_delay),
        };
        config.validate()?;
        Ok(config)
    }

    /// Override the encoding label
    pub fn with_encoding(mut self, label: &str) -> Self {
        self.encoding = label.to_string();
        self
    }

    pub fn with_round_delay(mut self, delay: Duration) -> Self {
        self.round_delay = delay;
        self
    }

    /// Resolve the configured encoding.
    pub fn codec(&self) -> Result<LineCodec> {
        Ok(LineCodec::for_label(&self.encoding)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.exit_command.is_empty() {
            bail!("exit_command must not be empty");
        }
        if self.exit_command.contains('\n') {
            bail!("exit_command must be a single line");
        }
        self.codec()?;
        Ok(())
    }
}
