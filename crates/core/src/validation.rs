//! Order validation rules.
//!
//! [`validate`] turns raw form input into an [`OrderRequest`] in one atomic
//! pass. Every field is checked even after an earlier one fails, so the form
//! can show all of its errors at once. Errors are addressed by [`FieldPath`],
//! which reaches into individual cookie line items.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::types::date::parse_delivery_date;
use crate::types::email::{Email, EmailError};
use crate::types::order::{CookieItem, OrderRequest};
use crate::types::phone::{PHONE_DIGITS, PhoneNumber, strip_mask};

pub const MAX_NAME_LEN: usize = 75;
pub const MAX_EMAIL_LEN: usize = 75;
pub const MAX_FLAVOR_LEN: usize = 75;
pub const MAX_MESSAGE_LEN: usize = 1000;
pub const MIN_COOKIE_COUNT: i64 = 1;
pub const MAX_COOKIE_COUNT: i64 = 500;

/// Messages shown next to invalid fields.
pub mod messages {
    pub const NAME_REQUIRED: &str = "Please enter your name.";
    pub const NAME_TOO_LONG: &str = "The name entered is too long.";
    pub const EMAIL_REQUIRED: &str = "Please enter your email.";
    pub const EMAIL_INVALID: &str = "Please enter a valid email.";
    pub const EMAIL_TOO_LONG: &str = "The email entered is too long.";
    pub const PHONE_INVALID: &str = "Please enter a valid phone number.";
    pub const DATE_REQUIRED: &str = "Please enter a delivery date.";
    pub const DATE_INVALID: &str = "Please enter a valid delivery date.";
    pub const DATE_NOT_FUTURE: &str = "Delivery date must be in the future.";
    pub const COOKIE_LIST_REQUIRED: &str = "Please add at least one cookie flavor.";
    pub const FLAVOR_REQUIRED: &str = "Please enter a flavor.";
    pub const FLAVOR_TOO_LONG: &str = "The flavor entered is too long.";
    pub const COUNT_REQUIRED: &str = "Please enter how many cookies you would like.";
    pub const COUNT_NOT_NUMBER: &str = "Please enter a whole number of cookies.";
    pub const COUNT_TOO_LOW: &str = "Please request at least one cookie.";
    pub const COUNT_TOO_HIGH: &str = "The number of cookies entered is too high.";
    pub const MESSAGE_REQUIRED: &str = "Please enter a brief message about your order.";
    pub const MESSAGE_TOO_LONG: &str = "The message entered is too long.";
}

/// Raw, unvalidated order as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub delivery_date: String,
    /// `None` when the customer never added a flavor.
    pub cookie_list: Option<Vec<CookieItemInput>>,
    pub message: String,
}

/// Raw line item; `count` stays text until validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieItemInput {
    pub flavor: String,
    pub count: String,
}

/// Address of a single form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldPath {
    Name,
    Email,
    Phone,
    DeliveryDate,
    CookieList,
    CookieFlavor(usize),
    CookieCount(usize),
    Message,
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Email => f.write_str("email"),
            Self::Phone => f.write_str("phone"),
            Self::DeliveryDate => f.write_str("deliveryDate"),
            Self::CookieList => f.write_str("cookieList"),
            Self::CookieFlavor(i) => write!(f, "cookieList[{i}].flavor"),
            Self::CookieCount(i) => write!(f, "cookieList[{i}].count"),
            Self::Message => f.write_str("message"),
        }
    }
}

/// Field errors from a failed validation, keyed by field path.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("order has {} invalid field(s)", .0.len())]
pub struct ValidationErrors(BTreeMap<FieldPath, &'static str>);

impl ValidationErrors {
    /// Message recorded for a field, if it failed.
    #[must_use]
    pub fn get(&self, path: FieldPath) -> Option<&'static str> {
        self.0.get(&path).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate errors in field order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldPath, &'static str)> + '_ {
        self.0.iter().map(|(path, msg)| (*path, *msg))
    }

    fn insert(&mut self, path: FieldPath, message: &'static str) {
        self.0.insert(path, message);
    }

    fn record<T>(&mut self, path: FieldPath, result: Result<T, &'static str>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.insert(path, message);
                None
            }
        }
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (path, message) in &self.0 {
            map.serialize_entry(&path.to_string(), message)?;
        }
        map.end()
    }
}

/// Validate a candidate order against the full rule set.
///
/// `now` is the moment of validation; the delivery date must be strictly
/// after it.
///
/// # Errors
///
/// Returns every failing field with its message.
pub fn validate(input: &OrderInput, now: DateTime<Utc>) -> Result<OrderRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = errors.record(FieldPath::Name, check_name(&input.name));
    let email = errors.record(FieldPath::Email, check_email(&input.email));
    let phone = errors.record(FieldPath::Phone, check_phone(&input.phone));
    let delivery_date = errors.record(
        FieldPath::DeliveryDate,
        check_delivery_date(&input.delivery_date, now),
    );
    let cookie_list = check_cookie_list(input.cookie_list.as_deref(), &mut errors);
    let message = errors.record(FieldPath::Message, check_message(&input.message));

    let (Some(name), Some(email), Some(phone), Some(delivery_date), Some(cookie_list), Some(message)) =
        (name, email, phone, delivery_date, cookie_list, message)
    else {
        return Err(errors);
    };

    Ok(OrderRequest {
        name,
        email,
        phone,
        delivery_date,
        cookie_list,
        message,
    })
}

fn required<'a>(value: &'a str, message: &'static str) -> Result<&'a str, &'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(message)
    } else {
        Ok(trimmed)
    }
}

fn max_len(value: &str, max: usize, message: &'static str) -> Result<(), &'static str> {
    if value.chars().count() > max {
        Err(message)
    } else {
        Ok(())
    }
}

fn check_name(raw: &str) -> Result<String, &'static str> {
    let name = required(raw, messages::NAME_REQUIRED)?;
    max_len(name, MAX_NAME_LEN, messages::NAME_TOO_LONG)?;
    Ok(name.to_owned())
}

fn check_email(raw: &str) -> Result<Email, &'static str> {
    let value = required(raw, messages::EMAIL_REQUIRED)?;
    let email = Email::parse(value).map_err(|err| match err {
        EmailError::Empty => messages::EMAIL_REQUIRED,
        EmailError::TooLong { .. } => messages::EMAIL_TOO_LONG,
        EmailError::Invalid => messages::EMAIL_INVALID,
    })?;
    max_len(email.as_str(), MAX_EMAIL_LEN, messages::EMAIL_TOO_LONG)?;
    Ok(email)
}

fn check_phone(raw: &str) -> Result<Option<String>, &'static str> {
    match strip_mask(raw).len() {
        0 => Ok(None),
        PHONE_DIGITS => PhoneNumber::parse(raw)
            .map(|phone| Some(phone.masked()))
            .map_err(|_| messages::PHONE_INVALID),
        _ => Err(messages::PHONE_INVALID),
    }
}

fn check_delivery_date(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, &'static str> {
    let value = required(raw, messages::DATE_REQUIRED)?;
    let at = parse_delivery_date(value).ok_or(messages::DATE_INVALID)?;
    if at <= now {
        return Err(messages::DATE_NOT_FUTURE);
    }
    Ok(at)
}

fn check_cookie_list(
    items: Option<&[CookieItemInput]>,
    errors: &mut ValidationErrors,
) -> Option<Vec<CookieItem>> {
    let Some(items) = items.filter(|items| !items.is_empty()) else {
        errors.insert(FieldPath::CookieList, messages::COOKIE_LIST_REQUIRED);
        return None;
    };

    let mut valid = Vec::with_capacity(items.len());
    let mut all_valid = true;
    for (index, item) in items.iter().enumerate() {
        let flavor = errors.record(FieldPath::CookieFlavor(index), check_flavor(&item.flavor));
        let count = errors.record(FieldPath::CookieCount(index), check_count(&item.count));
        match (flavor, count) {
            (Some(flavor), Some(count)) => valid.push(CookieItem { flavor, count }),
            _ => all_valid = false,
        }
    }

    all_valid.then_some(valid)
}

fn check_flavor(raw: &str) -> Result<String, &'static str> {
    let flavor = required(raw, messages::FLAVOR_REQUIRED)?;
    max_len(flavor, MAX_FLAVOR_LEN, messages::FLAVOR_TOO_LONG)?;
    Ok(flavor.to_owned())
}

fn check_count(raw: &str) -> Result<u32, &'static str> {
    let value = required(raw, messages::COUNT_REQUIRED)?;
    let count: i64 = value.parse().map_err(|_| messages::COUNT_NOT_NUMBER)?;
    if count < MIN_COOKIE_COUNT {
        return Err(messages::COUNT_TOO_LOW);
    }
    if count > MAX_COOKIE_COUNT {
        return Err(messages::COUNT_TOO_HIGH);
    }
    u32::try_from(count).map_err(|_| messages::COUNT_TOO_HIGH)
}

fn check_message(raw: &str) -> Result<String, &'static str> {
    let message = required(raw, messages::MESSAGE_REQUIRED)?;
    max_len(message, MAX_MESSAGE_LEN, messages::MESSAGE_TOO_LONG)?;
    Ok(message.to_owned())
}
