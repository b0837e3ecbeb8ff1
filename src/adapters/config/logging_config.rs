use std::str::FromStr;

use tracing::Level;

pub const DEFAULT_LOG_FILE: &str = "brevo_to_sheets.log";

#[derive(serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: Box<str>,
    pub level: Box<str>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: DEFAULT_LOG_FILE.into(),
            level: "info".into(),
        }
    }
}

impl LoggingConfig {
    /// Falls back to `INFO` for unknown level names.
    pub fn level(&self) -> Level {
        Level::from_str(self.level.trim()).unwrap_or(Level::INFO)
    }
}
