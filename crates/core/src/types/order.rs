//! Order request payload.
//!
//! This is the JSON body accepted by the order intake endpoint:
//!
//! ```json
//! {
//!   "name": "Ada",
//!   "email": "ada@example.com",
//!   "phone": "(555)123-4567",
//!   "deliveryDate": "2030-05-01T00:00:00Z",
//!   "cookieList": [{ "flavor": "Snickerdoodle", "count": 24 }],
//!   "message": "Birthday party, blue frosting please"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::date::deserialize_delivery_date;
use super::email::Email;

/// One line item of an order: a flavor and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieItem {
    pub flavor: String,
    pub count: u32,
}

/// A validated cookie order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub name: String,
    pub email: Email,
    /// Masked phone number, absent when the customer left it blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// RFC 3339 on the way out; RFC 3339 or `YYYY-MM-DD` on the way in.
    #[serde(deserialize_with = "deserialize_delivery_date")]
    pub delivery_date: DateTime<Utc>,
    pub cookie_list: Vec<CookieItem>,
    pub message: String,
}

impl OrderRequest {
    /// Total number of cookies across every line item.
    #[must_use]
    pub fn total_cookies(&self) -> u64 {
        self.cookie_list.iter().map(|item| u64::from(item.count)).sum()
    }
}
