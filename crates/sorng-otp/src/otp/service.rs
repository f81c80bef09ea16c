//! High-level orchestrator. Composes secret generation, provisioning and
//! verification around one set of settings, an injected clock and an
//! injected entropy source. Holds no per-user or per-code state.

use serde::{Deserialize, Serialize};

use crate::otp::config::OtpSettings;
use crate::otp::secret::{self, EntropySource, OsEntropy};
use crate::otp::totp::{self, Clock, SystemClock};
use crate::otp::types::*;
use crate::otp::uri::{self, ProvisioningLabel};
use crate::otp::verify;

/// What a new user needs to set up their authenticator app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Base-32 shared secret (no padding).
    pub secret_b32: String,
    /// `otpauth://` URI for QR rendering.
    pub uri: String,
}

/// TOTP service bound to a clock and an entropy source.
pub struct Authenticator<C = SystemClock, E = OsEntropy> {
    settings: OtpSettings,
    clock: C,
    entropy: E,
}

impl Authenticator<SystemClock, OsEntropy> {
    /// Service wired to the system clock and OS random source.
    pub fn new(settings: OtpSettings) -> Result<Self, OtpError> {
        Self::with_parts(settings, SystemClock, OsEntropy)
    }
}

impl<C: Clock, E: EntropySource> Authenticator<C, E> {
    /// Service with explicit collaborators. Settings are validated here.
    pub fn with_parts(settings: OtpSettings, clock: C, entropy: E) -> Result<Self, OtpError> {
        settings.validate()?;
        Ok(Self {
            settings,
            clock,
            entropy,
        })
    }

    pub fn settings(&self) -> &OtpSettings {
        &self.settings
    }

    /// Generate a fresh secret for `account` and its provisioning URI.
    pub fn enroll(&mut self, account: &str) -> Result<Enrollment, OtpError> {
        let secret = secret::generate_secret_with(&mut self.entropy, self.settings.secret_length)?;
        let mut label = ProvisioningLabel::new(account);
        if let Some(iss) = &self.settings.issuer {
            label = label.with_issuer(iss.clone());
        }
        let uri = uri::build_otpauth_uri(&label, &secret, self.settings.step)?;
        log::debug!("enrolled new TOTP credential ({} bytes)", secret.len());
        Ok(Enrollment {
            secret_b32: secret::encode_secret(&secret),
            uri,
        })
    }

    /// Current code for a base-32 secret.
    pub fn current_code(&self, secret_b32: &str) -> Result<Code, OtpError> {
        let secret = secret::decode_secret(secret_b32)?;
        totp::compute_totp_with(&secret, 0, self.settings.step, &self.clock)
    }

    /// Seconds until the current code rolls over.
    pub fn seconds_remaining(&self) -> Result<u64, OtpError> {
        totp::seconds_remaining_at(self.clock.now_seconds(), self.settings.step)
    }

    /// Check user-entered text against a base-32 secret.
    ///
    /// Malformed secrets or codes are errors; a well-formed code that does
    /// not match yields `Ok(false)`.
    pub fn verify(&self, code_text: &str, secret_b32: &str) -> Result<bool, OtpError> {
        let secret = secret::decode_secret(secret_b32)?;
        let code = Code::parse(code_text)?;
        Ok(verify::verify_totp_with(
            code,
            &secret,
            self.settings.window,
            self.settings.step,
            &self.clock,
        ))
    }
}
