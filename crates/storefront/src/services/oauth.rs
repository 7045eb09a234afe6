//! Google OAuth2 helpers for the Gmail mailbox.
//!
//! Every send exchanges the long-lived refresh token for a fresh access token.
//! Nothing is cached between calls.

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::{MailConfig, expose};

/// Scope required to send mail over SMTP with XOAUTH2.
pub const GMAIL_SCOPE: &str = "https://mail.google.com/";

const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Errors from the token endpoint.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint rejected the refresh token.
    #[error("token refresh failed ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Access token returned by the token endpoint.
#[derive(Debug, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Exchange the configured refresh token for an access token.
///
/// # Errors
///
/// Returns `TokenError::Rejected` for non-2xx responses and
/// `TokenError::Http` for transport or decode failures.
#[tracing::instrument(skip_all, fields(token_url = %config.token_url))]
pub async fn refresh_access_token(
    client: &reqwest::Client,
    config: &MailConfig,
) -> Result<AccessToken, TokenError> {
    let params = [
        ("grant_type", "refresh_token"),
        ("client_id", config.client_id.as_str()),
        ("client_secret", expose(&config.client_secret)),
        ("refresh_token", expose(&config.refresh_token)),
    ];

    let response = client
        .post(config.token_url.clone())
        .form(&params)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TokenError::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    let token: AccessToken = response.json().await?;
    tracing::debug!(expires_in = ?token.expires_in, "Access token refreshed");
    Ok(token)
}

/// Consent URL for minting a new refresh token with offline access.
///
/// # Errors
///
/// Returns an error only if the authorization endpoint fails to parse.
pub fn authorization_url(client_id: &str, redirect_uri: &Url) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        AUTHORIZATION_ENDPOINT,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", GMAIL_SCOPE),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )
}
