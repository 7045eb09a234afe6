//! Place an order against a running storefront.

use chrono::Utc;
use coffey_cli::{OrderClient, submit_form};
use coffey_core::{OrderForm, SubmissionState, SubmitRejected, ValidationErrors};
use thiserror::Error;
use tracing::{info, warn};

/// Why an order command did not end in success.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Invalid(ValidationErrors),
    #[error("order was not delivered after {attempts} attempt(s)")]
    Failed { attempts: u32 },
    #[error("form is not accepting submissions ({0:?})")]
    Disabled(SubmissionState),
}

/// Order details as given on the command line.
pub struct OrderArgs {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub delivery_date: String,
    pub items: Vec<(String, String)>,
    pub message: String,
}

/// Parse a `Flavor=Count` line item. The count is validated later with the
/// rest of the form.
///
/// # Errors
///
/// Returns a message when there is no `=`.
pub fn parse_item(raw: &str) -> Result<(String, String), String> {
    raw.rsplit_once('=')
        .map(|(flavor, count)| (flavor.trim().to_string(), count.trim().to_string()))
        .ok_or_else(|| format!("expected FLAVOR=COUNT, got '{raw}'"))
}

fn build_form(args: OrderArgs) -> OrderForm {
    let mut form = OrderForm::new();
    form.set_name(args.name);
    form.set_email(args.email);
    if let Some(phone) = args.phone {
        form.set_phone(&phone);
    }
    form.set_delivery_date(args.delivery_date);
    for (index, (flavor, count)) in args.items.into_iter().enumerate() {
        form.add_flavor();
        form.set_flavor(index, flavor);
        form.set_count(index, count);
    }
    form.set_message(args.message);
    form
}

/// Submit the order, resubmitting the same data after a failed delivery up
/// to `attempts` times in total.
///
/// # Errors
///
/// Returns `CliError::Invalid` with every field error when validation fails,
/// and `CliError::Failed` when no attempt was delivered.
pub async fn place(url: &str, args: OrderArgs, attempts: u32) -> Result<(), CliError> {
    let client = OrderClient::new(url);
    let mut form = build_form(args);
    let attempts = attempts.max(1);

    for attempt in 1..=attempts {
        info!(attempt, button = form.button().label, "Submitting order");
        match submit_form(&mut form, &client, Utc::now()).await {
            Ok(SubmissionState::Success { .. }) => {
                info!(attempt, button = form.button().label, "Order delivered");
                return Ok(());
            }
            Ok(state) => {
                warn!(attempt, ?state, button = form.button().label, "Order not delivered");
            }
            Err(SubmitRejected::Invalid(errors)) => return Err(CliError::Invalid(errors)),
            Err(SubmitRejected::Disabled(state)) => return Err(CliError::Disabled(state)),
        }
    }

    Err(CliError::Failed { attempts })
}

/// Print validation errors one per line.
#[allow(clippy::print_stderr)]
pub fn print_field_errors(errors: &ValidationErrors) {
    for (path, message) in errors.iter() {
        eprintln!("{path}: {message}");
    }
}
