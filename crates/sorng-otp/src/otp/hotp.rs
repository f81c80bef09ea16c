//! HMAC-based one-time passwords (RFC 4226).
//!
//! `HOTP(K, C) = Truncate(HMAC-SHA-1(K, C)) mod 10^6`, where `C` is the
//! 8-byte big-endian counter.

use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::otp::types::*;

type HmacSha1 = Hmac<Sha1>;

/// Length of an HMAC-SHA-1 digest.
pub const DIGEST_LEN: usize = 20;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Raw HMAC-OTP (RFC 4226 §5.3)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// HMAC-SHA-1 over the big-endian counter.
fn hmac_counter(key: &[u8], counter: Counter) -> Result<[u8; DIGEST_LEN], OtpError> {
    let mut mac = HmacSha1::new_from_slice(key).map_err(|e| {
        OtpError::new(OtpErrorKind::InvalidSecret, "HMAC rejected key").with_detail(e.to_string())
    })?;
    mac.update(&counter.to_be_bytes());
    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    Ok(digest)
}

/// Dynamic truncation per RFC 4226 §5.3: a 31-bit value picked from the
/// digest at the offset named by its last nibble.
pub fn dynamic_truncate(digest: &[u8; DIGEST_LEN]) -> u32 {
    let offset = (digest[DIGEST_LEN - 1] & 0x0f) as usize;
    ((digest[offset] as u32 & 0x7f) << 24)
        | ((digest[offset + 1] as u32) << 16)
        | ((digest[offset + 2] as u32) << 8)
        | (digest[offset + 3] as u32)
}

/// The 31-bit truncated value before reduction to digits.
pub fn hotp_truncated(secret: &Secret, counter: Counter) -> Result<u32, OtpError> {
    let digest = hmac_counter(secret.as_bytes(), counter)?;
    Ok(dynamic_truncate(&digest))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HOTP
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute the 6-digit HOTP code for `counter`.
pub fn compute_hotp(secret: &Secret, counter: Counter) -> Result<Code, OtpError> {
    Ok(Code::from_truncated(hotp_truncated(secret, counter)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── RFC 4226 test vectors (Appendix D) ───────────────────────
    // Secret: "12345678901234567890" (ASCII)

    fn rfc_secret() -> Secret {
        Secret::from_bytes(b"12345678901234567890".to_vec()).unwrap()
    }

    #[test]
    fn rfc4226_truncated_values() {
        let expected: [u32; 10] = [
            1284755224, 1094287082, 137359152, 1726969429, 1640338314,
            868254676, 1918287922, 82162583, 673399871, 645520489,
        ];
        let secret = rfc_secret();
        for (counter, exp) in expected.iter().enumerate() {
            let value = hotp_truncated(&secret, counter as u64).unwrap();
            assert_eq!(value, *exp, "truncation mismatch at counter {}", counter);
        }
    }

    #[test]
    fn rfc4226_hotp_vectors() {
        let expected = [
            "755224", "287082", "359152", "969429", "338314",
            "254676", "287922", "162583", "399871", "520489",
        ];
        let secret = rfc_secret();
        for (counter, exp) in expected.iter().enumerate() {
            let code = compute_hotp(&secret, counter as u64).unwrap();
            assert_eq!(&code.to_string(), exp, "HOTP mismatch at counter {}", counter);
        }
    }

    #[test]
    fn rfc4226_section_5_4_truncation_example() {
        let digest: [u8; DIGEST_LEN] = [
            0x1f, 0x86, 0x98, 0x69, 0x0e, 0x02, 0xca, 0x16, 0x61, 0x85,
            0x50, 0xef, 0x7f, 0x19, 0xda, 0x8e, 0x94, 0x5b, 0x55, 0x5a,
        ];
        assert_eq!(dynamic_truncate(&digest), 0x50ef7f19);
        assert_eq!(Code::from_truncated(dynamic_truncate(&digest)).to_string(), "872921");
    }

    #[test]
    fn truncation_masks_sign_bit() {
        let mut digest = [0xffu8; DIGEST_LEN];
        digest[DIGEST_LEN - 1] = 0xf0; // offset 0
        assert_eq!(dynamic_truncate(&digest), 0x7fff_ffff);
    }

    #[test]
    fn truncation_max_offset_stays_in_bounds() {
        let mut digest = [0u8; DIGEST_LEN];
        digest[DIGEST_LEN - 1] = 0x0f; // offset 15 reads bytes 15..=18
        digest[15] = 0x01;
        digest[18] = 0xab;
        assert_eq!(dynamic_truncate(&digest), 0x0100_00ab);
    }

    #[test]
    fn hotp_is_deterministic() {
        let secret = Secret::from_bytes(b"another shared key".to_vec()).unwrap();
        for counter in [0u64, 1, 42, u32::MAX as u64, u64::MAX] {
            let a = compute_hotp(&secret, counter).unwrap();
            let b = compute_hotp(&secret, counter).unwrap();
            assert_eq!(a, b);
            assert!(a.value() < 1_000_000);
        }
    }

    #[test]
    fn single_byte_key() {
        let secret = Secret::from_bytes(vec![0x00u8]).unwrap();
        let code = compute_hotp(&secret, 0).unwrap();
        assert!(code.value() < 1_000_000);
    }
}
