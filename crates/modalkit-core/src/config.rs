//! Service configuration.
//!
//! Configuration is plain JSON with optional `//` and `/* */` comments:
//!
//! ```jsonc
//! {
//!     // Keep dialogs open across route changes.
//!     "close_on_navigate": false,
//!     "event_capacity": 64
//! }
//! ```

use crate::bus::DEFAULT_CAPACITY;
use crate::error::{ConfigError, ModalResult};
use modalkit_util::{LogConfig, LogLevel};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a [`ModalService`](crate::ModalService).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    /// How many events a slow subscriber may fall behind before lagging.
    pub event_capacity: usize,

    /// Close every open view when the navigation fragment changes.
    pub close_on_navigate: bool,

    /// Run open/close operations one at a time, in call order.
    pub serialize_operations: bool,

    /// Level for [`ModalConfig::log_config`]; `None` leaves logging to the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_CAPACITY,
            close_on_navigate: true,
            serialize_operations: true,
            log_level: None,
        }
    }
}

impl ModalConfig {
    /// Load configuration from a file.
    pub async fn load_file(path: &Path) -> ModalResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::parse_jsonc(&content, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), "Loaded modal configuration");
        Ok(config)
    }

    /// Parse JSONC (JSON with comments) and validate the result.
    pub fn parse_jsonc(content: &str, source: &str) -> ModalResult<Self> {
        let stripped = strip_comments(content);

        let config: Self =
            serde_json::from_str(&stripped).map_err(|e| ConfigError::InvalidJson {
                path: source.to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Logging setup requested by this config, ready for
    /// [`modalkit_util::log::init`].
    pub fn log_config(&self) -> Option<LogConfig> {
        self.log_level.map(LogConfig::stderr)
    }

    /// Check values serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.event_capacity == 0 {
            return Err(ConfigError::Validation {
                message: "event_capacity must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Strip JSON comments, leaving string contents untouched.
fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape_next = false;

    while let Some(c) = chars.next() {
        if escape_next {
            result.push(c);
            escape_next = false;
            continue;
        }

        if in_string {
            match c {
                '\\' => escape_next = true,
                '"' => in_string = false,
                _ => {}
            }
            result.push(c);
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some(&'/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            ('/', Some(&'*')) => {
                chars.next();
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    // Preserve newlines for error reporting
                    if c == '\n' {
                        result.push('\n');
                    }
                    prev = c;
                }
            }
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModalError;

    #[test]
    fn test_strip_comments() {
        let input = r#"{
            // Line comment
            "a": "value", // trailing comment
            /* block comment */
            "b": "val/*not a comment*/ue",
            "c": "escaped \" // still a string"
        }"#;

        let result = strip_comments(input);
        assert!(!result.contains("Line comment"));
        assert!(!result.contains("trailing comment"));
        assert!(!result.contains("block comment"));
        assert!(result.contains("val/*not a comment*/ue"));
        assert!(result.contains(r#"escaped \" // still a string"#));
    }

    #[test]
    fn test_defaults() {
        let config = ModalConfig::default();
        assert_eq!(config.event_capacity, 256);
        assert!(config.close_on_navigate);
        assert!(config.serialize_operations);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_parse_jsonc_partial() {
        let input = r#"{
            // Leave dialogs alone on route changes
            "close_on_navigate": false,
            "log_level": "debug"
        }"#;

        let config = ModalConfig::parse_jsonc(input, "test").unwrap();
        assert!(!config.close_on_navigate);
        assert_eq!(config.log_level, Some(LogLevel::Debug));
        assert_eq!(config.event_capacity, 256);
    }

    #[test]
    fn test_log_config_follows_level() {
        assert!(ModalConfig::default().log_config().is_none());

        let config = ModalConfig::parse_jsonc(r#"{ "log_level": "trace" }"#, "inline").unwrap();
        let log = config.log_config().unwrap();
        assert!(log.print);
        assert_eq!(log.level, LogLevel::Trace);
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = ModalConfig::parse_jsonc("{ \"event_capacity\": }", "broken.json").unwrap_err();
        match err {
            ModalError::Config(ConfigError::InvalidJson { path, .. }) => {
                assert_eq!(path, "broken.json");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = ModalConfig::parse_jsonc(r#"{ "event_capacity": 0 }"#, "test").unwrap_err();
        assert!(matches!(
            err,
            ModalError::Config(ConfigError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modalkit.jsonc");
        tokio::fs::write(&path, "/* tuned */ { \"serialize_operations\": false }")
            .await
            .unwrap();

        let config = ModalConfig::load_file(&path).await.unwrap();
        assert!(!config.serialize_operations);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = ModalConfig::load_file(Path::new("/nonexistent/modalkit.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ModalError::Io(_)));
    }
}
