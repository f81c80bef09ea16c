//! Core types for the HOTP/TOTP engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

use crate::otp::config::{CODE_DIGITS, CODE_MODULUS};

/// HOTP moving factor. Serialised big-endian before hashing.
pub type Counter = u64;

/// Whole seconds since the Unix epoch.
pub type EpochSeconds = u64;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Secret
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Shared HMAC key. Never empty; zeroed when dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Vec<u8>);

impl Secret {
    /// Wrap raw key bytes. Empty input is rejected.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, OtpError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(OtpError::new(
                OtpErrorKind::InvalidSecret,
                "Secret must contain at least one byte",
            ));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret([REDACTED; {} bytes])", self.0.len())
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Code
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A 6-digit one-time code. The inner value is always `< 1_000_000`.
///
/// Rendering is zero-padded, so `Code(5224)` displays as `"005224"`.
/// Parsing from text is fixed-width: `"5224"` is not a valid code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Code(u32);

impl Code {
    /// Reduce any truncated HMAC value into the code range.
    pub fn from_truncated(value: u32) -> Self {
        Self(value % CODE_MODULUS)
    }

    /// Parse user input. Spaces are ignored ("123 456"); after that the
    /// text must be exactly six ASCII digits.
    pub fn parse(text: &str) -> Result<Self, OtpError> {
        let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if cleaned.len() != CODE_DIGITS || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OtpError::new(
                OtpErrorKind::InvalidCode,
                format!("Expected {} digits", CODE_DIGITS),
            ));
        }
        let value = cleaned.parse::<u32>().map_err(|e| {
            OtpError::new(OtpErrorKind::InvalidCode, "Code is not numeric").with_detail(e.to_string())
        })?;
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Code {
    type Error = OtpError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value >= CODE_MODULUS {
            return Err(OtpError::new(
                OtpErrorKind::InvalidCode,
                format!("Code {} out of range", value),
            ));
        }
        Ok(Self(value))
    }
}

impl From<Code> for u32 {
    fn from(code: Code) -> u32 {
        code.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0>width$}", self.0, width = CODE_DIGITS)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Verification result
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Outcome of checking a code against a window of time steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResult {
    pub valid: bool,
    /// Offset of the matching time step from "now" (0 = exact).
    pub drift: i64,
    /// The counter value that matched (if any).
    pub matched_counter: Option<Counter>,
}

impl VerifyResult {
    pub fn rejected() -> Self {
        Self {
            valid: false,
            drift: 0,
            matched_counter: None,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Error type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Error kind for this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtpErrorKind {
    /// The secure random source could not be read.
    EntropyUnavailable,
    /// Text is not valid base-32.
    InvalidEncoding,
    /// Verification window exceeds the hard cap.
    WindowTooLarge,
    InvalidSecret,
    InvalidCode,
    InvalidStep,
    InvalidCounter,
    InvalidConfig,
    InvalidUri,
}

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpError {
    pub kind: OtpErrorKind,
    pub message: String,
    pub detail: Option<String>,
}

impl fmt::Display for OtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(d) = &self.detail {
            write!(f, " ({})", d)?;
        }
        Ok(())
    }
}

impl std::error::Error for OtpError {}

impl OtpError {
    pub fn new(kind: OtpErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl From<OtpError> for String {
    fn from(e: OtpError) -> String {
        e.to_string()
    }
}
