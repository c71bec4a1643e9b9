//! Caller gating.
//!
//! Token issuance and verification live outside this crate. The engine only
//! receives an opaque credential and asks an [`AccessGate`] whether to serve
//! the request; report computations never look at the credential.

use crate::error::AppError;

/// Opaque caller credential (e.g. a bearer token forwarded by the host).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(Option<String>);

impl Credential {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn is_present(&self) -> bool {
        self.0.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl From<Option<String>> for Credential {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

// Never print the token itself.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = if self.is_present() { "<redacted>" } else { "<none>" };
        f.debug_tuple("Credential").field(&shown).finish()
    }
}

pub trait AccessGate: Send + Sync {
    fn authorize(&self, credential: &Credential) -> Result<(), AppError>;
}

/// Accepts any non-empty credential, or only one specific token when configured.
#[derive(Clone, Default)]
pub struct TokenGate {
    accepted: Option<String>,
}

impl TokenGate {
    pub fn any_token() -> Self {
        Self { accepted: None }
    }

    pub fn accepting(token: impl Into<String>) -> Self {
        Self {
            accepted: Some(token.into()),
        }
    }
}

impl AccessGate for TokenGate {
    fn authorize(&self, credential: &Credential) -> Result<(), AppError> {
        if !credential.is_present() {
            tracing::warn!("request rejected: missing credential");
            return Err(AppError::Unauthorized("missing credential".to_string()));
        }
        match (&self.accepted, credential.token()) {
            (Some(expected), Some(token)) if expected != token => {
                tracing::warn!("request rejected: credential not accepted");
                Err(AppError::Unauthorized("credential not accepted".to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for TokenGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGate")
            .field("restricted", &self.accepted.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_blank_credentials_are_rejected() {
        let gate = TokenGate::any_token();
        for cred in [Credential::anonymous(), Credential::bearer(""), Credential::bearer("   ")] {
            let err = gate.authorize(&cred).unwrap_err();
            assert_eq!(err.kind(), "Unauthorized");
        }
        assert!(gate.authorize(&Credential::bearer("abc")).is_ok());
    }

    #[test]
    fn restricted_gate_checks_token() {
        let gate = TokenGate::accepting("s3cret");
        assert!(gate.authorize(&Credential::bearer("s3cret")).is_ok());
        assert!(gate.authorize(&Credential::bearer("nope")).is_err());
        assert!(gate.authorize(&Credential::anonymous()).is_err());
    }

    #[test]
    fn debug_output_redacts_token() {
        let shown = format!("{:?}", Credential::bearer("s3cret"));
        assert!(!shown.contains("s3cret"));
        assert!(shown.contains("redacted"));
    }
}
