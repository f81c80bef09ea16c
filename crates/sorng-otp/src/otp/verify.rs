//! Code verification against a drift window of time steps.
//!
//! Stateless: nothing records which counters were already accepted, so a
//! code stays valid for every check inside its window.

use crate::otp::config::MAX_WINDOW;
use crate::otp::hotp::compute_hotp;
use crate::otp::totp::{counter_at, time_step_at, Clock, SystemClock};
use crate::otp::types::*;

/// Check `candidate` against the steps `-window..=window` around `now` and
/// report which step matched.
///
/// Offsets are tried in increasing order; the first match wins. Offsets
/// whose counter would fall outside `u64` are skipped. A negative `window`
/// yields an empty range and never matches.
pub fn verify_totp_detailed(
    candidate: Code,
    secret: &Secret,
    window: i32,
    step: u64,
    now: EpochSeconds,
) -> Result<VerifyResult, OtpError> {
    if window.unsigned_abs() > MAX_WINDOW.unsigned_abs() {
        return Err(OtpError::new(
            OtpErrorKind::WindowTooLarge,
            format!("Window size is too large (max ±{})", MAX_WINDOW),
        )
        .with_detail(format!("got {}", window)));
    }
    let base_counter = time_step_at(now, step)?;

    let window = window as i64;
    for offset in -window..=window {
        let counter = match counter_at(now, step, offset) {
            Ok(c) => c,
            Err(e) if e.kind == OtpErrorKind::InvalidCounter => {
                log::trace!("skipping offset {} from step {}", offset, base_counter);
                continue;
            }
            Err(e) => return Err(e),
        };
        let expected = compute_hotp(secret, counter)?;
        if constant_time_eq(&expected.value().to_be_bytes(), &candidate.value().to_be_bytes()) {
            log::debug!("TOTP accepted with drift {}", offset);
            return Ok(VerifyResult {
                valid: true,
                drift: offset,
                matched_counter: Some(counter),
            });
        }
    }

    log::debug!("TOTP rejected: no match within ±{} steps", window);
    Ok(VerifyResult::rejected())
}

/// Verify at an explicit unix timestamp.
///
/// Any error (an oversized window included) is logged and reported as `false`.
pub fn verify_totp_at(
    candidate: Code,
    secret: &Secret,
    window: i32,
    step: u64,
    now: EpochSeconds,
) -> bool {
    match verify_totp_detailed(candidate, secret, window, step, now) {
        Ok(result) => result.valid,
        Err(e) => {
            log::warn!("TOTP verification refused: {}", e);
            false
        }
    }
}

/// Verify using the supplied clock.
pub fn verify_totp_with<C: Clock + ?Sized>(
    candidate: Code,
    secret: &Secret,
    window: i32,
    step: u64,
    clock: &C,
) -> bool {
    verify_totp_at(candidate, secret, window, step, clock.now_seconds())
}

/// Verify at the current system time.
pub fn verify_totp(candidate: Code, secret: &Secret, window: i32, step: u64) -> bool {
    verify_totp_with(candidate, secret, window, step, &SystemClock)
}

/// Constant-time byte comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
