//! OTP crate: sub-modules.

pub mod types;
pub mod config;
pub mod secret;
pub mod hotp;
pub mod totp;
pub mod verify;
pub mod uri;
pub mod service;

// Re-export top-level items for convenience.
pub use types::*;
pub use config::OtpSettings;
pub use secret::{decode_secret, encode_secret, generate_default_secret, generate_secret, generate_secret_with, EntropySource, OsEntropy};
pub use hotp::compute_hotp;
pub use totp::{compute_totp, compute_totp_at, compute_totp_now, compute_totp_with, Clock, FixedClock, SystemClock};
pub use verify::{verify_totp, verify_totp_at, verify_totp_detailed, verify_totp_with};
pub use uri::{build_otpauth_uri, ProvisioningLabel};
pub use service::{Authenticator, Enrollment};
