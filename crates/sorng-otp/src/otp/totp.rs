//! Time-based one-time passwords (RFC 6238).
//!
//! The counter is `floor(now / step) + offset`; everything else is HOTP.
//! Time is always an explicit input so callers (and tests) choose the clock.

use chrono::Utc;

use crate::otp::config::DEFAULT_STEP;
use crate::otp::hotp::compute_hotp;
use crate::otp::types::*;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Clock
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Wall-clock source in whole Unix seconds.
pub trait Clock {
    fn now_seconds(&self) -> EpochSeconds;
}

/// The host system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_seconds(&self) -> EpochSeconds {
        // Pre-epoch clocks clamp to 0.
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub EpochSeconds);

impl Clock for FixedClock {
    fn now_seconds(&self) -> EpochSeconds {
        self.0
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Time-step arithmetic
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn require_step(step: u64) -> Result<(), OtpError> {
    if step == 0 {
        return Err(OtpError::new(
            OtpErrorKind::InvalidStep,
            "Time step must be greater than zero",
        ));
    }
    Ok(())
}

/// Compute the time-step counter for a given unix timestamp.
pub fn time_step_at(unix_seconds: EpochSeconds, step: u64) -> Result<Counter, OtpError> {
    require_step(step)?;
    Ok(unix_seconds / step)
}

/// Seconds left before the step containing `unix_seconds` ends.
pub fn seconds_remaining_at(unix_seconds: EpochSeconds, step: u64) -> Result<u64, OtpError> {
    require_step(step)?;
    Ok(step - (unix_seconds % step))
}

/// Counter for the step `offset` steps away from the one containing
/// `unix_seconds`. Fails if that lands outside `0..=u64::MAX`.
pub fn counter_at(unix_seconds: EpochSeconds, step: u64, offset: i64) -> Result<Counter, OtpError> {
    let base = time_step_at(unix_seconds, step)?;
    base.checked_add_signed(offset).ok_or_else(|| {
        OtpError::new(OtpErrorKind::InvalidCounter, "Time-step offset out of range")
            .with_detail(format!("step {} offset {}", base, offset))
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TOTP
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Generate a TOTP code at an explicit unix timestamp.
pub fn compute_totp_at(
    secret: &Secret,
    offset: i64,
    step: u64,
    now: EpochSeconds,
) -> Result<Code, OtpError> {
    let counter = counter_at(now, step, offset)?;
    compute_hotp(secret, counter)
}

/// Generate a TOTP code using the supplied clock.
pub fn compute_totp_with<C: Clock + ?Sized>(
    secret: &Secret,
    offset: i64,
    step: u64,
    clock: &C,
) -> Result<Code, OtpError> {
    compute_totp_at(secret, offset, step, clock.now_seconds())
}

/// Generate a TOTP code at the current system time.
pub fn compute_totp(secret: &Secret, offset: i64, step: u64) -> Result<Code, OtpError> {
    compute_totp_with(secret, offset, step, &SystemClock)
}

/// Current code at the system time with offset 0 and the default step.
pub fn compute_totp_now(secret: &Secret) -> Result<Code, OtpError> {
    compute_totp(secret, 0, DEFAULT_STEP)
}
