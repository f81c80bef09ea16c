//! Shared-secret generation and base-32 exchange encoding.
//!
//! The base-32 text (RFC 4648 alphabet, `=` padding stripped) is the only
//! form of the secret that leaves this crate.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::otp::config::DEFAULT_SECRET_LENGTH;
use crate::otp::types::*;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Entropy
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A source of cryptographically secure random bytes.
pub trait EntropySource {
    /// Fill `buf` completely or fail with `EntropyUnavailable`.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), OtpError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), OtpError> {
        OsRng.try_fill_bytes(buf).map_err(|e| {
            log::warn!("OS random source unavailable: {}", e);
            OtpError::new(OtpErrorKind::EntropyUnavailable, "Random source unavailable")
                .with_detail(e.to_string())
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Generation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Generate a `length`-byte secret from the OS random source.
pub fn generate_secret(length: usize) -> Result<Secret, OtpError> {
    generate_secret_with(&mut OsEntropy, length)
}

/// Generate a secret of [`DEFAULT_SECRET_LENGTH`] bytes from the OS random source.
pub fn generate_default_secret() -> Result<Secret, OtpError> {
    generate_secret(DEFAULT_SECRET_LENGTH)
}

/// Generate a `length`-byte secret from an explicit entropy source.
pub fn generate_secret_with<E: EntropySource + ?Sized>(
    source: &mut E,
    length: usize,
) -> Result<Secret, OtpError> {
    if length == 0 {
        return Err(OtpError::new(
            OtpErrorKind::InvalidSecret,
            "Secret length must be greater than zero",
        ));
    }
    let mut buf = vec![0u8; length];
    source.fill(&mut buf)?;
    log::debug!("generated {}-byte secret", length);
    Secret::from_bytes(buf)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Base-32
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Encode a secret to base-32 (uppercase, no padding).
pub fn encode_secret(secret: &Secret) -> String {
    base32::encode(base32::Alphabet::Rfc4648 { padding: false }, secret.as_bytes())
}

/// Decode base-32 text into a secret.
///
/// Case-insensitive; spaces, dashes and trailing `=` padding are ignored.
/// Unused bits in the final symbol must be zero.
pub fn decode_secret(text: &str) -> Result<Secret, OtpError> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect::<String>()
        .to_ascii_uppercase();
    let cleaned = cleaned.trim_end_matches('=');

    if cleaned.is_empty() {
        return Err(OtpError::new(OtpErrorKind::InvalidEncoding, "Empty base-32 secret"));
    }
    if let Some(bad) = cleaned.chars().find(|c| !matches!(c, 'A'..='Z' | '2'..='7')) {
        return Err(OtpError::new(
            OtpErrorKind::InvalidEncoding,
            "Invalid base-32 secret",
        )
        .with_detail(format!("unexpected character {:?}", bad)));
    }
    // 1, 3 or 6 trailing symbols can never come out of an encoder.
    if matches!(cleaned.len() % 8, 1 | 3 | 6) {
        return Err(OtpError::new(
            OtpErrorKind::InvalidEncoding,
            "Invalid base-32 secret",
        )
        .with_detail(format!("impossible length {}", cleaned.len())));
    }
    // Bits past the last whole byte must be zero.
    let spare_bits = (cleaned.len() % 8) * 5 % 8;
    if let Some(last) = cleaned.chars().last() {
        if symbol_value(last) & ((1u8 << spare_bits) - 1) != 0 {
            return Err(OtpError::new(
                OtpErrorKind::InvalidEncoding,
                "Invalid base-32 secret",
            )
            .with_detail(format!("non-zero trailing bits in {:?}", last)));
        }
    }

    let bytes = base32::decode(base32::Alphabet::Rfc4648 { padding: false }, cleaned)
        .ok_or_else(|| OtpError::new(OtpErrorKind::InvalidEncoding, "Invalid base-32 secret"))?;
    Secret::from_bytes(bytes)
}

/// 5-bit value of an RFC 4648 base-32 symbol (already validated).
fn symbol_value(c: char) -> u8 {
    match c {
        'A'..='Z' => c as u8 - b'A',
        '2'..='7' => c as u8 - b'2' + 26,
        _ => 0,
    }
}
