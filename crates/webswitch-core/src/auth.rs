// ── Authenticator stage ──
//
// This firmware family does no live login handshake: the web UI sets a
// cookie of the form `user=response` where `response` is a value already
// precomputed in the fleet config. Deriving the credential therefore
// cannot fail for a switch that has an auth block at all. The stage stays
// discrete so a firmware that needs a real login exchange can slot in
// without touching the compiler or executor contracts.

use indexmap::IndexMap;
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::model::{Config, Switch};

/// Session credential: the literal `Cookie` header value for one switch.
#[derive(Debug, Clone)]
pub struct Credential(String);

impl Credential {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Per-switch credentials, keyed by switch key in config order.
pub type CredentialMap = IndexMap<String, Credential>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("switch '{switch}' has no auth configuration")]
    MissingAuth { switch: String },
}

/// Derive the cookie credential for one switch.
pub fn derive_credential(key: &str, switch: &Switch) -> Result<Credential, AuthError> {
    let auth = switch.auth.as_ref().ok_or_else(|| AuthError::MissingAuth {
        switch: key.to_string(),
    })?;
    Ok(Credential(format!(
        "{}={}",
        auth.user,
        auth.response.expose_secret()
    )))
}

/// Derive credentials for every switch in the config, preserving order.
pub fn derive_all(config: &Config) -> Result<CredentialMap, AuthError> {
    config
        .switches
        .iter()
        .map(|(key, sw)| Ok((key.clone(), derive_credential(key, sw)?)))
        .collect()
}
