//! Order email composition and delivery over Gmail SMTP.
//!
//! Uses lettre with XOAUTH2 and Askama HTML/plain-text templates.

use askama::Template;
use async_trait::async_trait;
use coffey_core::{CookieItem, OrderRequest, format_truncated_date};
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{
        Error as SmtpError,
        authentication::{Credentials, Mechanism},
    },
};
use thiserror::Error;

use crate::config::MailConfig;
use crate::services::oauth::{self, TokenError};

/// Display name on the sender mailbox.
pub const SENDER_NAME: &str = "My 🍪 Website";

/// Subject line of every order email.
pub const ORDER_SUBJECT: &str = "New Cookie Order 🍪🍪🍪";

/// HTML template for an order notification.
#[derive(Template)]
#[template(path = "email/order.html")]
struct OrderEmailHtml<'a> {
    name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    delivery_date: &'a str,
    items: &'a [CookieItem],
    message: &'a str,
}

/// Plain text template for an order notification.
#[derive(Template)]
#[template(path = "email/order.txt")]
struct OrderEmailText<'a> {
    name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    delivery_date: &'a str,
    items: &'a [CookieItem],
    message: &'a str,
}

/// Errors that can occur when sending an order email.
#[derive(Debug, Error)]
pub enum MailError {
    /// Access token could not be obtained.
    #[error("OAuth error: {0}")]
    Token(#[from] TokenError),

    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Rendered bodies of an order email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEmail {
    pub subject: &'static str,
    pub text: String,
    pub html: String,
}

/// Render the order into HTML and plain-text bodies.
///
/// The phone line is left out entirely when no phone was given.
///
/// # Errors
///
/// Returns `MailError::Template` if a template fails to render.
pub fn compose_order_email(order: &OrderRequest) -> Result<OrderEmail, MailError> {
    let delivery_date = format_truncated_date(&order.delivery_date);
    let phone = order.phone.as_deref().filter(|p| !p.is_empty());

    let html = OrderEmailHtml {
        name: &order.name,
        email: order.email.as_str(),
        phone,
        delivery_date: &delivery_date,
        items: &order.cookie_list,
        message: &order.message,
    }
    .render()?;

    let text = OrderEmailText {
        name: &order.name,
        email: order.email.as_str(),
        phone,
        delivery_date: &delivery_date,
        items: &order.cookie_list,
        message: &order.message,
    }
    .render()?;

    Ok(OrderEmail {
        subject: ORDER_SUBJECT,
        text,
        html,
    })
}

/// Delivers order notifications to the bakery mailbox.
#[async_trait]
pub trait OrderMailer: Send + Sync {
    /// Send one order email. No retry.
    async fn send_order(&self, order: &OrderRequest) -> Result<(), MailError>;
}

/// Gmail mailer authenticated with a fresh OAuth2 access token per send.
pub struct GmailMailer {
    config: MailConfig,
    http: reqwest::Client,
}

impl GmailMailer {
    #[must_use]
    pub fn new(config: MailConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn mailbox(&self) -> Result<Mailbox, MailError> {
        let account = self.config.account.as_str();
        let address = account
            .parse::<Address>()
            .map_err(|_| MailError::InvalidAddress(account.to_string()))?;
        Ok(Mailbox::new(Some(SENDER_NAME.to_string()), address))
    }

    fn build_message(&self, email: OrderEmail) -> Result<Message, MailError> {
        let from = self.mailbox()?;
        let to = Mailbox::new(None, from.email.clone());

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html),
                    ),
            )?;
        Ok(message)
    }
}

#[async_trait]
impl OrderMailer for GmailMailer {
    #[tracing::instrument(skip_all, fields(items = order.cookie_list.len()))]
    async fn send_order(&self, order: &OrderRequest) -> Result<(), MailError> {
        let message = self.build_message(compose_order_email(order)?)?;
        let token = oauth::refresh_access_token(&self.http, &self.config).await?;

        let credentials = Credentials::new(
            self.config.account.as_str().to_string(),
            token.access_token,
        );

        // Built per send and dropped on return, success or failure.
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)?
            .credentials(credentials)
            .authentication(vec![Mechanism::Xoauth2])
            .build();

        transport.send(message).await?;

        tracing::info!(
            to = %self.config.account,
            total_cookies = order.total_cookies(),
            "Order email sent"
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use coffey_core::Email;
    use secrecy::SecretString;
    use url::Url;

    use super::*;

    fn order(phone: Option<&str>) -> OrderRequest {
        OrderRequest {
            name: "Avery Coffey".to_string(),
            email: Email::parse("avery@example.com").unwrap(),
            phone: phone.map(str::to_string),
            delivery_date: Utc.with_ymd_and_hms(2024, 1, 5, 15, 30, 0).unwrap(),
            cookie_list: vec![
                CookieItem {
                    flavor: "Sugar".to_string(),
                    count: 12,
                },
                CookieItem {
                    flavor: "Snickerdoodle".to_string(),
                    count: 24,
                },
            ],
            message: "Birthday <party>".to_string(),
        }
    }

    #[test]
    fn test_compose_includes_every_field() {
        let email = compose_order_email(&order(Some("(555)123-4567"))).unwrap();

        assert_eq!(email.subject, ORDER_SUBJECT);
        for body in [&email.html, &email.text] {
            assert!(body.contains("Avery Coffey"));
            assert!(body.contains("avery@example.com"));
            assert!(body.contains("(555)123-4567"));
            assert!(body.contains("1/5/2024"));
            assert!(body.contains("Sugar"));
            assert!(body.contains("12"));
            assert!(body.contains("Snickerdoodle"));
            assert!(body.contains("24"));
        }
    }

    #[test]
    fn test_compose_omits_absent_phone() {
        let email = compose_order_email(&order(None)).unwrap();
        assert!(!email.html.contains("Phone"));
        assert!(!email.text.contains("Phone"));
    }

    #[test]
    fn test_compose_escapes_html_but_not_text() {
        let email = compose_order_email(&order(None)).unwrap();
        assert!(email.html.contains("Birthday"));
        assert!(!email.html.contains("<party>"));
        assert!(email.text.contains("Birthday <party>"));
    }

    #[test]
    fn test_build_message_addresses_bakery_mailbox() {
        let mailer = GmailMailer::new(MailConfig {
            account: Email::parse("orders@cookiesbycoffey.com").unwrap(),
            client_id: "client".to_string(),
            client_secret: SecretString::from("secret"),
            redirect_uri: Url::parse("https://developers.google.com/oauthplayground").unwrap(),
            refresh_token: SecretString::from("refresh"),
            smtp_host: "smtp.gmail.com".to_string(),
            token_url: Url::parse("https://oauth2.googleapis.com/token").unwrap(),
        });

        let message = mailer
            .build_message(compose_order_email(&order(None)).unwrap())
            .unwrap();
        let envelope = message.envelope();

        assert_eq!(
            envelope.from().map(ToString::to_string).as_deref(),
            Some("orders@cookiesbycoffey.com")
        );
        assert_eq!(envelope.to().len(), 1);
        assert_eq!(
            envelope.to().first().map(ToString::to_string).as_deref(),
            Some("orders@cookiesbycoffey.com")
        );
    }
}
