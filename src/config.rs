//! Signer Configuration
//!
//! Settings travel with each [`SigningContext`](crate::tx::SigningContext);
//! nothing here is process-wide.

use serde::{Deserialize, Serialize};

/// Environment variable names read by [`SignerSettings::from_env`]
pub const ENV_DEBUG: &str = "EVM_SIGNER_DEBUG";
pub const ENV_CHECKSUM: &str = "EVM_SIGNER_CHECKSUM";
pub const ENV_VERIFY: &str = "EVM_SIGNER_VERIFY";
pub const ENV_MAX_INPUT: &str = "EVM_SIGNER_MAX_INPUT";

/// Default cap on call data size (128 KiB)
pub const DEFAULT_MAX_INPUT_BYTES: usize = 128 * 1024;

/// Per-context signing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignerSettings {
    /// Emit debug log lines for each pipeline stage
    pub debug: bool,
    /// Present addresses in EIP-55 mixed case
    pub checksum_addresses: bool,
    /// Verify `(r, s)` against the public key before assembling
    pub verify_after_signing: bool,
    /// Largest accepted `input` payload
    pub max_input_bytes: usize,
}

impl Default for SignerSettings {
    fn default() -> Self {
        Self {
            debug: false,
            checksum_addresses: false,
            verify_after_signing: true,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl SignerSettings {
    /// Defaults overridden by `EVM_SIGNER_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns.
    ///
    /// Values that do not parse keep their default and are logged as warnings.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let (settings, rejected) = Self::from_lookup_checked(lookup);
        for (variable, value) in rejected {
            crate::log_warn!(
                "config",
                "ignoring unparsable setting",
                variable = variable,
                value = value
            );
        }
        settings
    }

    /// Like [`from_lookup`](Self::from_lookup), returning rejected
    /// `(variable, value)` pairs instead of logging them
    pub fn from_lookup_checked<F>(lookup: F) -> (Self, Vec<(&'static str, String)>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        let mut rejected = Vec::new();

        let flags: [(&'static str, &mut bool); 3] = [
            (ENV_DEBUG, &mut settings.debug),
            (ENV_CHECKSUM, &mut settings.checksum_addresses),
            (ENV_VERIFY, &mut settings.verify_after_signing),
        ];
        for (variable, slot) in flags {
            if let Some(raw) = lookup(variable) {
                match parse_flag(&raw) {
                    Some(flag) => *slot = flag,
                    None => rejected.push((variable, raw)),
                }
            }
        }

        if let Some(raw) = lookup(ENV_MAX_INPUT) {
            match raw.trim().parse::<usize>() {
                Ok(limit) => settings.max_input_bytes = limit,
                Err(_) => rejected.push((ENV_MAX_INPUT, raw)),
            }
        }

        (settings, rejected)
    }

    /// Human-readable problems with these settings; empty when usable
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_input_bytes == 0 {
            errors.push("max_input_bytes must allow at least one byte".to_string());
        }
        if !self.verify_after_signing {
            errors.push("verify_after_signing is off; signatures are not re-checked".to_string());
        }

        errors
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
