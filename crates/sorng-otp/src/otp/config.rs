//! Engine settings and the fixed parameters of the code format.

use serde::{Deserialize, Serialize};

use crate::otp::types::*;

/// Default secret size in bytes (160 bits).
pub const DEFAULT_SECRET_LENGTH: usize = 20;
/// Default TOTP time step in seconds.
pub const DEFAULT_STEP: u64 = 30;
/// Default verification window (±1 step).
pub const DEFAULT_WINDOW: i32 = 1;
/// Hard cap on `|window|`.
pub const MAX_WINDOW: i32 = 10;
/// Digits in every generated code.
pub const CODE_DIGITS: usize = 6;
/// `10^CODE_DIGITS`.
pub const CODE_MODULUS: u32 = 1_000_000;

/// Tunables for secret generation, time steps and verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtpSettings {
    /// Bytes of entropy in newly generated secrets.
    pub secret_length: usize,
    /// Seconds per TOTP time step.
    pub step: u64,
    /// Time steps accepted on either side of "now".
    pub window: i32,
    /// Issuer shown by authenticator apps, used in provisioning URIs.
    pub issuer: Option<String>,
}

impl Default for OtpSettings {
    fn default() -> Self {
        Self {
            secret_length: DEFAULT_SECRET_LENGTH,
            step: DEFAULT_STEP,
            window: DEFAULT_WINDOW,
            issuer: None,
        }
    }
}

impl OtpSettings {
    /// Builder: set issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Builder: set window.
    pub fn with_window(mut self, window: i32) -> Self {
        self.window = window;
        self
    }

    /// Builder: set step.
    pub fn with_step(mut self, step: u64) -> Self {
        self.step = step;
        self
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), OtpError> {
        if self.secret_length == 0 {
            return Err(OtpError::new(
                OtpErrorKind::InvalidConfig,
                "secret_length must be greater than zero",
            ));
        }
        if self.step == 0 {
            return Err(OtpError::new(
                OtpErrorKind::InvalidConfig,
                "step must be greater than zero",
            ));
        }
        if self.window.unsigned_abs() > MAX_WINDOW.unsigned_abs() {
            return Err(OtpError::new(
                OtpErrorKind::InvalidConfig,
                format!("window must be within ±{}", MAX_WINDOW),
            )
            .with_detail(format!("got {}", self.window)));
        }
        Ok(())
    }

    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, OtpError> {
        let settings: Self = serde_json::from_str(json).map_err(|e| {
            OtpError::new(OtpErrorKind::InvalidConfig, "Malformed settings JSON")
                .with_detail(e.to_string())
        })?;
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = OtpSettings::default();
        assert_eq!(s.secret_length, 20);
        assert_eq!(s.step, 30);
        assert_eq!(s.window, 1);
        assert!(s.issuer.is_none());
        assert!(s.validate().is_ok());
    }

    #[test]
    fn from_json_fills_defaults() {
        let s = OtpSettings::from_json(r#"{"window": 3, "issuer": "Test App"}"#).unwrap();
        assert_eq!(s.window, 3);
        assert_eq!(s.step, 30);
        assert_eq!(s.secret_length, 20);
        assert_eq!(s.issuer.as_deref(), Some("Test App"));
    }

    #[test]
    fn from_json_empty_object() {
        assert_eq!(OtpSettings::from_json("{}").unwrap(), OtpSettings::default());
    }

    #[test]
    fn from_json_malformed() {
        let err = OtpSettings::from_json("{window:").unwrap_err();
        assert_eq!(err.kind, OtpErrorKind::InvalidConfig);
        assert!(err.detail.is_some());
    }

    #[test]
    fn validate_rejects_zero_step() {
        let err = OtpSettings::default().with_step(0).validate().unwrap_err();
        assert_eq!(err.kind, OtpErrorKind::InvalidConfig);
    }

    #[test]
    fn validate_rejects_zero_length() {
        let s = OtpSettings {
            secret_length: 0,
            ..Default::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn validate_window_cap() {
        assert!(OtpSettings::default().with_window(10).validate().is_ok());
        assert!(OtpSettings::default().with_window(-10).validate().is_ok());
        assert!(OtpSettings::default().with_window(11).validate().is_err());
        assert!(OtpSettings::default().with_window(-11).validate().is_err());
        assert!(OtpSettings::default().with_window(i32::MIN).validate().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let s = OtpSettings::default().with_issuer("Test App").with_window(2);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(OtpSettings::from_json(&json).unwrap(), s);
    }
}
