//! Secure credential handling for judge backends.
//!
//! Credentials are optional per judge: a missing credential disables
//! that judge without failing any request. Whatever is loaded is
//! wrapped so it cannot leak through `Debug` output or logs.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Where a credential was loaded from.
///
/// Useful for debugging configuration issues without exposing the
/// credential value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from a configuration file
    Config,
    /// Loaded from an environment variable
    Environment,
    /// Provided programmatically
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Config => write!(f, "config"),
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
///
/// - `Debug` shows `[REDACTED]`, never the value
/// - the value is zeroed on drop via the `secrecy` crate
/// - exposure is explicit through [`ApiCredential::expose`]
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    /// Wrap a credential value.
    pub fn new(
        value: impl Into<String>,
        source: CredentialSource,
        name: &'static str,
    ) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Load from an environment variable, if set and non-empty.
    ///
    /// Returns `None` when the variable is absent, which callers
    /// treat as "judge disabled", not as an error.
    pub fn from_env(env_var: &str, name: &'static str) -> Option<Self> {
        match std::env::var(env_var) {
            Ok(v) if !v.is_empty() => Some(Self::new(v, CredentialSource::Environment, name)),
            _ => None,
        }
    }

    /// Prefer an explicit config value, falling back to the
    /// environment variable.
    pub fn from_config_or_env(
        config_value: Option<&str>,
        env_var: &str,
        name: &'static str,
    ) -> Option<Self> {
        match config_value {
            Some(v) if !v.is_empty() => Some(Self::new(v, CredentialSource::Config, name)),
            _ => Self::from_env(env_var, name),
        }
    }

    /// Expose the credential value. Call only at the point of use,
    /// e.g. when building an HTTP header.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    /// Whether the stored value is empty.
    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }

    /// Where this credential came from.
    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_value() {
        let cred = ApiCredential::new("super-secret", CredentialSource::Programmatic, "test key");
        let debug = format!("{cred:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_expose_returns_value() {
        let cred = ApiCredential::new("super-secret", CredentialSource::Programmatic, "test key");
        assert_eq!(cred.expose(), "super-secret");
        assert!(!cred.is_empty());
    }

    #[test]
    fn test_missing_env_is_none() {
        assert!(ApiCredential::from_env("DOCGRADE_NO_SUCH_VAR", "test key").is_none());
    }

    #[test]
    fn test_config_value_preferred_over_env() {
        let cred =
            ApiCredential::from_config_or_env(Some("from-config"), "DOCGRADE_NO_SUCH_VAR", "key")
                .unwrap();
        assert_eq!(cred.expose(), "from-config");
        assert_eq!(cred.source(), CredentialSource::Config);
    }

    #[test]
    fn test_empty_config_value_falls_through() {
        let cred = ApiCredential::from_config_or_env(Some(""), "DOCGRADE_NO_SUCH_VAR", "key");
        assert!(cred.is_none());
    }
}
