//! URLs and token handling for the hosted sign-in page. Tokens are issued by
//! the identity provider; the dashboard only carries them.

use chrono::{DateTime, Duration, Utc};
use url::{form_urlencoded, Url};

use crate::error::ApiError;

const SCOPE: &str = "openid profile email";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    pub domain: String,
    pub client_id: String,
    pub audience: Option<String>,
}

impl AuthSettings {
    fn base(&self) -> Result<Url, ApiError> {
        let domain = self.domain.trim_end_matches('/');
        let raw = if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_owned()
        } else {
            format!("https://{domain}")
        };
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Sign-in redirect; the provider returns the token in the URL fragment.
    pub fn authorize_url(&self, redirect_uri: &str, state: &str) -> Result<String, ApiError> {
        let mut url = self.base()?.join("authorize").map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "token")
                .append_pair("client_id", &self.client_id)
                .append_pair("redirect_uri", redirect_uri)
                .append_pair("scope", SCOPE)
                .append_pair("state", state);
            if let Some(audience) = self.audience.as_deref().filter(|a| !a.is_empty()) {
                query.append_pair("audience", audience);
            }
        }
        Ok(url.into())
    }

    pub fn logout_url(&self, return_to: &str) -> Result<String, ApiError> {
        let mut url = self.base()?.join("v2/logout").map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("returnTo", return_to);
        Ok(url.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Reads `#access_token=…&expires_in=…&state=…` after the sign-in redirect.
/// A token is only accepted when `state` matches the one sent.
pub fn parse_token_fragment(fragment: &str, expected_state: &str, now: DateTime<Utc>) -> Option<AccessToken> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let mut token = None;
    let mut expires_in = None;
    let mut state = None;

    for (key, value) in form_urlencoded::parse(fragment.as_bytes()) {
        match key.as_ref() {
            "access_token" => token = Some(value.into_owned()),
            "expires_in" => expires_in = value.parse::<i64>().ok(),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    if state.as_deref() != Some(expected_state) {
        log::warn!("ignoring sign-in response with unexpected state");
        return None;
    }
    Some(AccessToken {
        token: token.filter(|t| !t.is_empty())?,
        // an out-of-range lifetime is kept as no expiry
        expires_at: expires_in
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime)),
    })
}
