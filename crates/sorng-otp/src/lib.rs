//! # SortOfRemote NG – One-Time Password Core
//!
//! Deterministic HOTP/TOTP code derivation and verification:
//!
//! - **RFC 4226** – HMAC-SHA-1 HOTP with dynamic truncation to 6 digits
//! - **RFC 6238** – Time-step counters with injectable clocks
//! - **Verification** – Drift window of up to ±10 steps, first match wins
//! - **Secrets** – CSPRNG generation and base-32 exchange encoding
//! - **Provisioning** – `otpauth://totp/...` URIs for authenticator apps

pub mod otp;
