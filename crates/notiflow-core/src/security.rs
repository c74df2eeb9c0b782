//! Request credentials.
//!
//! The API accepts either an API key or a bearer token in the
//! `Authorization` header. Both may be configured on [`Security`], but only
//! one may be applied to a request.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the header carrying the credential.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    #[error("both an API key and a bearer token are configured; set only one")]
    Conflicting,

    #[error("the {scheme} credential is empty")]
    Empty { scheme: &'static str },
}

/// Credentials attached to outgoing requests.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,
}

impl fmt::Debug for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("Security")
            .field("api_key", &redact(&self.api_key))
            .field("bearer_token", &redact(&self.bearer_token))
            .finish()
    }
}

/// The single credential selected for a request.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Credential<'a> {
    ApiKey(&'a str),
    Bearer(&'a str),
}

impl Credential<'_> {
    pub const fn scheme(&self) -> &'static str {
        match self {
            Self::ApiKey(_) => "ApiKey",
            Self::Bearer(_) => "Bearer",
        }
    }

    /// Value of the `Authorization` header.
    pub fn header_value(&self) -> String {
        match self {
            Self::ApiKey(secret) | Self::Bearer(secret) => format!("{} {secret}", self.scheme()),
        }
    }
}

impl fmt::Debug for Credential<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({} <redacted>)", self.scheme())
    }
}

impl Security {
    pub fn api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(key.into()),
            bearer_token: None,
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            api_key: None,
            bearer_token: Some(token.into()),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.bearer_token.is_none()
    }

    /// Select the credential to apply. `Ok(None)` means the request is sent
    /// unauthenticated.
    pub fn credential(&self) -> Result<Option<Credential<'_>>, SecurityError> {
        match (self.api_key.as_deref(), self.bearer_token.as_deref()) {
            (Some(_), Some(_)) => Err(SecurityError::Conflicting),
            (Some(key), None) => non_empty("ApiKey", key).map(|k| Some(Credential::ApiKey(k))),
            (None, Some(token)) => non_empty("Bearer", token).map(|t| Some(Credential::Bearer(t))),
            (None, None) => Ok(None),
        }
    }

    /// The `(name, value)` header pair, if a credential is configured.
    pub fn authorization_header(&self) -> Result<Option<(&'static str, String)>, SecurityError> {
        Ok(self
            .credential()?
            .map(|credential| (AUTHORIZATION_HEADER, credential.header_value())))
    }
}

fn non_empty<'a>(scheme: &'static str, secret: &'a str) -> Result<&'a str, SecurityError> {
    if secret.trim().is_empty() {
        Err(SecurityError::Empty { scheme })
    } else {
        Ok(secret)
    }
}
