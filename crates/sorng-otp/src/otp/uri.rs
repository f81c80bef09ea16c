//! `otpauth://` provisioning URIs per the Google Authenticator key-URI
//! format:
//! <https://github.com/google/google-authenticator/wiki/Key-Uri-Format>
//!
//! Format: `otpauth://totp/ISSUER:ACCOUNT?secret=BASE32&issuer=ISSUER&period=30`
//!
//! Rendering the URI as a QR image is left to the presentation layer.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::otp::config::DEFAULT_STEP;
use crate::otp::secret::encode_secret;
use crate::otp::types::*;

/// Who the credential belongs to, as shown in authenticator apps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningLabel {
    pub issuer: Option<String>,
    pub account: String,
}

impl ProvisioningLabel {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            issuer: None,
            account: account.into(),
        }
    }

    /// Builder: set issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// "Issuer:account" or just "account".
    pub fn path_label(&self) -> String {
        match &self.issuer {
            Some(iss) if !iss.is_empty() => format!("{}:{}", iss, self.account),
            _ => self.account.clone(),
        }
    }
}

/// Build a TOTP provisioning URI. `period` is only emitted when `step`
/// differs from the 30-second default.
pub fn build_otpauth_uri(
    label: &ProvisioningLabel,
    secret: &Secret,
    step: u64,
) -> Result<String, OtpError> {
    if label.account.is_empty() {
        return Err(OtpError::new(OtpErrorKind::InvalidUri, "Account name must not be empty"));
    }

    let mut url = Url::parse("otpauth://totp/").map_err(|e| {
        OtpError::new(OtpErrorKind::InvalidUri, "Invalid URI base").with_detail(e.to_string())
    })?;
    url.path_segments_mut()
        .map_err(|_| OtpError::new(OtpErrorKind::InvalidUri, "URI cannot carry a label"))?
        .pop_if_empty()
        .push(&label.path_label());

    let mut params = vec![format!("secret={}", encode_secret(secret))];
    if let Some(iss) = label.issuer.as_deref().filter(|i| !i.is_empty()) {
        params.push(format!("issuer={}", query_encode(iss)));
    }
    if step != DEFAULT_STEP {
        params.push(format!("period={}", step));
    }
    url.set_query(Some(&params.join("&")));

    Ok(url.into())
}

/// Percent-encode a query value, spaces as `%20` rather than `+`.
fn query_encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RFC4226_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    fn rfc_secret() -> Secret {
        Secret::from_bytes(b"12345678901234567890".to_vec()).unwrap()
    }

    #[test]
    fn build_with_issuer() {
        let label = ProvisioningLabel::new("yourusername").with_issuer("Test App");
        let uri = build_otpauth_uri(&label, &rfc_secret(), 30).unwrap();
        assert_eq!(
            uri,
            format!(
                "otpauth://totp/Test%20App:yourusername?secret={}&issuer=Test%20App",
                RFC4226_SECRET
            )
        );
    }

    #[test]
    fn build_without_issuer() {
        let label = ProvisioningLabel::new("alice@example.com");
        let uri = build_otpauth_uri(&label, &rfc_secret(), 30).unwrap();
        assert_eq!(
            uri,
            format!("otpauth://totp/alice@example.com?secret={}", RFC4226_SECRET)
        );
    }

    #[test]
    fn build_custom_period() {
        let label = ProvisioningLabel::new("bob");
        let uri = build_otpauth_uri(&label, &rfc_secret(), 60).unwrap();
        assert!(uri.ends_with("&period=60"));
    }

    #[test]
    fn build_escapes_reserved_characters() {
        let label = ProvisioningLabel::new("a/b").with_issuer("A&B");
        let uri = build_otpauth_uri(&label, &rfc_secret(), 30).unwrap();
        let parsed = Url::parse(&uri).unwrap();
        assert_eq!(parsed.scheme(), "otpauth");
        assert_eq!(parsed.host_str(), Some("totp"));
        assert_eq!(parsed.path(), "/A&B:a%2Fb");
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("secret".to_string(), RFC4226_SECRET.to_string()),
                ("issuer".to_string(), "A&B".to_string()),
            ]
        );
    }

    #[test]
    fn build_rejects_empty_account() {
        let err = build_otpauth_uri(&ProvisioningLabel::new(""), &rfc_secret(), 30).unwrap_err();
        assert_eq!(err.kind, OtpErrorKind::InvalidUri);
    }

    #[test]
    fn empty_issuer_is_dropped() {
        let label = ProvisioningLabel::new("carol").with_issuer("");
        assert_eq!(label.path_label(), "carol");
        let uri = build_otpauth_uri(&label, &rfc_secret(), 30).unwrap();
        assert!(!uri.contains("issuer="));
    }

    #[test]
    fn query_encode_spaces() {
        assert_eq!(query_encode("Test App"), "Test%20App");
        assert_eq!(query_encode("a+b"), "a%2Bb");
    }
}
