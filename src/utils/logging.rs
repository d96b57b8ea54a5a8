//! Structured Logging with Sensitive Data Redaction
//!
//! Lines go to stderr as `[timestamp] LEVEL [module] message | key=value ...`.
//! Field values are redacted by key name:
//! - private keys and other secrets are fully hidden
//! - addresses keep a short prefix and suffix
//! - hashes and raw payloads are shortened
//!
//! There is no global debug switch. Debug entries are only written when the
//! caller passes its own flag via [`LogEntry::debug_enabled`], which the
//! signing context does from its settings.

use std::fmt;

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Structured log entry
#[derive(Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub module: &'static str,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
    debug: bool,
}

impl LogEntry {
    pub fn new(level: LogLevel, module: &'static str, message: impl Into<String>) -> Self {
        Self {
            level,
            module,
            message: message.into(),
            fields: Vec::new(),
            debug: false,
        }
    }

    /// Allow this entry through when it is a debug entry
    pub fn debug_enabled(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Add a field to the log entry (auto-redacts sensitive data)
    pub fn field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        let value_str = value.to_string();
        let redacted = redact_if_sensitive(key, &value_str);
        self.fields.push((key, redacted));
        self
    }

    /// Whether this entry would be written
    pub fn is_enabled(&self) -> bool {
        self.level != LogLevel::Debug || self.debug
    }

    /// Format the entry without the timestamp
    pub fn render(&self) -> String {
        let fields_str = self
            .fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");

        if fields_str.is_empty() {
            format!("{} [{}] {}", self.level, self.module, self.message)
        } else {
            format!(
                "{} [{}] {} | {}",
                self.level, self.module, self.message, fields_str
            )
        }
    }

    /// Log the entry
    pub fn log(self) {
        if !self.is_enabled() {
            return;
        }

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
        eprintln!("[{}] {}", timestamp, self.render());
    }
}

/// Redact a value if the key suggests it's sensitive
fn redact_if_sensitive(key: &str, value: &str) -> String {
    let key_lower = key.to_lowercase();

    let fully_redacted_keys = [
        "private_key",
        "privatekey",
        "secret",
        "seed",
        "mnemonic",
        "password",
        "passphrase",
        "key_hex",
        "signing_key",
    ];
    if fully_redacted_keys.iter().any(|k| key_lower.contains(k)) {
        return redact_value(value);
    }

    let address_keys = ["address", "sender", "from", "to"];
    if address_keys
        .iter()
        .any(|k| key_lower == *k || key_lower.ends_with(&format!("_{}", k)))
    {
        return redact_address(value);
    }

    let hash_keys = ["hash", "raw", "digest"];
    if hash_keys.iter().any(|k| key_lower.contains(k)) {
        return redact_hash(value);
    }

    value.to_string()
}

/// Fully redact a sensitive value
fn redact_value(value: &str) -> String {
    if value.is_empty() {
        return "[EMPTY]".to_string();
    }

    let len = value.len();
    if len <= 4 {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED:{}chars]", len)
    }
}

/// Partially redact an address (show first 6 and last 4 hex chars)
fn redact_address(address: &str) -> String {
    let trimmed = address.trim();

    if trimmed.is_empty() {
        return "[EMPTY]".to_string();
    }

    let prefix_len = if trimmed.starts_with("0x") { 8 } else { 6 };
    let suffix_len = 4;

    if trimmed.len() <= prefix_len + suffix_len + 3 {
        return redact_value(trimmed);
    }

    format!(
        "{}...{}",
        &trimmed[..prefix_len],
        &trimmed[trimmed.len() - suffix_len..]
    )
}

/// Shorten a hash or raw payload (show first 10 and last 6 hex chars)
fn redact_hash(hash: &str) -> String {
    let trimmed = hash.trim();

    if trimmed.len() <= 20 {
        return trimmed.to_string();
    }

    let prefix_len = if trimmed.starts_with("0x") { 12 } else { 10 };
    let suffix_len = 6;

    format!(
        "{}...{}",
        &trimmed[..prefix_len],
        &trimmed[trimmed.len() - suffix_len..]
    )
}

/// Debug logging gated on an explicit flag
#[macro_export]
macro_rules! log_debug {
    ($enabled:expr, $module:expr, $msg:expr) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Debug,
            $module,
            $msg
        )
        .debug_enabled($enabled)
        .log()
    };
    ($enabled:expr, $module:expr, $msg:expr, $($key:ident = $value:expr),* $(,)?) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Debug,
            $module,
            $msg
        )
        .debug_enabled($enabled)
        $(.field(stringify!($key), &$value))*
        .log()
    };
}

/// Convenience macro for warning logging
#[macro_export]
macro_rules! log_warn {
    ($module:expr, $msg:expr) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Warn,
            $module,
            $msg
        ).log()
    };
    ($module:expr, $msg:expr, $($key:ident = $value:expr),* $(,)?) => {
        $crate::utils::logging::LogEntry::new(
            $crate::utils::logging::LogLevel::Warn,
            $module,
            $msg
        )
        $(.field(stringify!($key), &$value))*
        .log()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_value() {
        assert_eq!(redact_value(""), "[EMPTY]");
        assert_eq!(redact_value("abc"), "[REDACTED]");
        assert_eq!(redact_value("secret_key_12345"), "[REDACTED:16chars]");
    }

    #[test]
    fn test_redact_address() {
        let addr = "0x3535353535353535353535353535353535353535";
        let redacted = redact_address(addr);
        assert_eq!(redacted, "0x353535...3535");
    }

    #[test]
    fn test_redact_hash() {
        let hash = "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";
        let redacted = redact_hash(hash);
        assert!(redacted.starts_with("0x1234567890"));
        assert!(redacted.ends_with("abcdef"));
        assert!(redacted.contains("..."));
    }

    #[test]
    fn test_redact_if_sensitive() {
        assert!(redact_if_sensitive("private_key", "4646464646").contains("REDACTED"));
        let recipient = "0x3535353535353535353535353535353535353535";
        assert_eq!(redact_if_sensitive("to", recipient), "0x353535...3535");
        assert!(redact_if_sensitive("message_hash", &"ab".repeat(32)).contains("..."));
        assert_eq!(redact_if_sensitive("nonce", "9"), "9");
        assert_eq!(redact_if_sensitive("total", "21000"), "21000");
    }

    #[test]
    fn test_debug_entries_need_explicit_flag() {
        let quiet = LogEntry::new(LogLevel::Debug, "test", "hidden");
        assert!(!quiet.is_enabled());

        let loud = LogEntry::new(LogLevel::Debug, "test", "shown").debug_enabled(true);
        assert!(loud.is_enabled());

        let warn = LogEntry::new(LogLevel::Warn, "test", "always");
        assert!(warn.is_enabled());
    }

    #[test]
    fn test_render_with_fields() {
        let entry = LogEntry::new(LogLevel::Info, "tx", "signed")
            .field("v", 37)
            .field("private_key", "4646464646464646");
        assert_eq!(
            entry.render(),
            "INFO [tx] signed | v=37 private_key=[REDACTED:16chars]"
        );
    }

    #[test]
    fn test_address_fields_are_shortened() {
        let entry = LogEntry::new(LogLevel::Debug, "tx", "digest")
            .debug_enabled(true)
            .field("to", "0x3535353535353535353535353535353535353535")
            .field("sender_address", "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f");
        assert_eq!(
            entry.render(),
            "DEBUG [tx] digest | to=0x353535...3535 sender_address=0x9d8a62...5a4f"
        );
    }
}
