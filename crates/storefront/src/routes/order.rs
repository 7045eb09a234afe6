//! Order page route handlers.
//!
//! The page is a server-rendered form. Every button posts the whole form back
//! with an `action`:
//!
//! - `add` appends an empty line item
//! - `remove-{i}` removes line item `i`
//! - `submit` validates and, if valid, sends the order email
//!
//! The add and remove buttons post to `/order/items`, which only edits line
//! items and is not rate limited. `/order` accepts every action.
//!
//! Field errors render inline next to the input they belong to.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::Form;
use chrono::Utc;
use coffey_core::form::SUCCESS_RESET_DELAY_MS;
use coffey_core::{
    CookieItemInput, FieldPath, OrderForm, OrderInput, SubmitButton, SubmitRejected,
};
use serde::Deserialize;
use tracing::instrument;

use crate::components::{FormInput, Icon, InputKind};
use crate::error::{add_breadcrumb, report};
use crate::filters;
use crate::state::AppState;

/// Fields posted by the order form.
///
/// `flavor` and `count` repeat once per line item, in order.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderFormFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub delivery_date: String,
    pub flavor: Vec<String>,
    pub count: Vec<String>,
    pub message: String,
    pub action: Option<String>,
}

impl OrderFormFields {
    fn into_form(self) -> OrderForm {
        let len = self.flavor.len().max(self.count.len());
        let mut flavors = self.flavor.into_iter();
        let mut counts = self.count.into_iter();
        let items: Vec<CookieItemInput> = (0..len)
            .map(|_| CookieItemInput {
                flavor: flavors.next().unwrap_or_default(),
                count: counts.next().unwrap_or_default(),
            })
            .collect();

        OrderForm::from_input(OrderInput {
            name: self.name,
            email: self.email,
            phone: self.phone,
            delivery_date: self.delivery_date,
            cookie_list: (!items.is_empty()).then_some(items),
            message: self.message,
        })
    }
}

/// Button pressed on the order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    AddFlavor,
    RemoveFlavor(usize),
    Submit,
}

impl FromStr for FormAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::AddFlavor),
            "submit" => Ok(Self::Submit),
            other => other
                .strip_prefix("remove-")
                .and_then(|index| index.parse().ok())
                .map(Self::RemoveFlavor)
                .ok_or(()),
        }
    }
}

/// One line item row on the order page.
#[derive(Debug, Clone)]
pub struct LineItemView {
    pub index: usize,
    pub flavor: FormInput,
    pub count: FormInput,
}

/// Order page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/order.html")]
pub struct OrderPageTemplate {
    pub name: FormInput,
    pub email: FormInput,
    pub phone: FormInput,
    pub delivery_date: FormInput,
    pub items: Vec<LineItemView>,
    pub list_error: Option<&'static str>,
    pub message: FormInput,
    pub button: SubmitButton,
    pub button_icon: Icon,
    pub add_icon: Icon,
    pub remove_icon: Icon,
    /// Seconds until the page reloads empty, set after a successful send.
    pub refresh_after: Option<i64>,
}

impl From<&OrderForm> for OrderPageTemplate {
    fn from(form: &OrderForm) -> Self {
        let input = form.input();
        let errors = form.errors();

        let items = form
            .cookie_list()
            .iter()
            .enumerate()
            .map(|(index, item)| LineItemView {
                index,
                flavor: FormInput::new("flavor", "Flavor", Icon::Cookie, InputKind::TEXT)
                    .with_id(format!("flavor-{index}"))
                    .with_value(item.flavor.as_str())
                    .with_error(errors.get(FieldPath::CookieFlavor(index)))
                    .required(),
                count: FormInput::new(
                    "count",
                    "Amount",
                    Icon::Tag,
                    InputKind::SingleLine {
                        input_type: "number",
                    },
                )
                .with_id(format!("count-{index}"))
                .with_value(item.count.as_str())
                .with_error(errors.get(FieldPath::CookieCount(index)))
                .required(),
            })
            .collect();

        let refresh_after = matches!(
            form.state(),
            coffey_core::SubmissionState::Success { .. }
        )
        .then_some(SUCCESS_RESET_DELAY_MS / 1000);

        Self {
            name: FormInput::new("name", "Name", Icon::Person, InputKind::TEXT)
                .with_value(input.name.as_str())
                .with_error(errors.get(FieldPath::Name))
                .required(),
            email: FormInput::new(
                "email",
                "Email",
                Icon::Email,
                InputKind::SingleLine {
                    input_type: "email",
                },
            )
            .with_value(input.email.as_str())
            .with_error(errors.get(FieldPath::Email))
            .required(),
            phone: FormInput::new(
                "phone",
                "Phone",
                Icon::Phone,
                InputKind::SingleLine { input_type: "tel" },
            )
            .with_value(input.phone.as_str())
            .with_error(errors.get(FieldPath::Phone)),
            delivery_date: FormInput::new(
                "deliveryDate",
                "Delivery Date",
                Icon::Calendar,
                InputKind::SingleLine { input_type: "date" },
            )
            .with_value(input.delivery_date.as_str())
            .with_error(errors.get(FieldPath::DeliveryDate))
            .required(),
            items,
            list_error: errors.get(FieldPath::CookieList),
            message: FormInput::new(
                "message",
                "Message",
                Icon::Chat,
                InputKind::MultiLine { rows: 3 },
            )
            .with_value(input.message.as_str())
            .with_error(errors.get(FieldPath::Message))
            .required(),
            button: form.button(),
            button_icon: Icon::for_submission(form.state()),
            add_icon: Icon::Add,
            remove_icon: Icon::Close,
            refresh_after,
        }
    }
}

/// Display an empty order form.
#[instrument]
pub async fn show() -> impl IntoResponse {
    OrderPageTemplate::from(&OrderForm::new())
}

/// Handle a post of the order form.
///
/// Returns 422 when a submit fails validation, 200 otherwise, including when
/// the email could not be sent (the page then shows "Please Try Again.").
#[instrument(skip(state, posted), fields(action = ?posted.action))]
pub async fn submit(
    State(state): State<AppState>,
    Form(posted): Form<OrderFormFields>,
) -> impl IntoResponse {
    let action = posted
        .action
        .as_deref()
        .map_or(Ok(FormAction::Submit), FormAction::from_str);
    let mut form = posted.into_form();

    let status = match action {
        Ok(FormAction::Submit) => submit_order(&state, &mut form).await,
        other => {
            apply_edit(other, &mut form);
            StatusCode::OK
        }
    };

    (status, OrderPageTemplate::from(&form))
}

/// Add or remove a line item and re-render. Never sends.
#[instrument(skip(posted), fields(action = ?posted.action))]
pub async fn edit(Form(posted): Form<OrderFormFields>) -> impl IntoResponse {
    let action = posted.action.as_deref().map_or(Err(()), FormAction::from_str);
    let mut form = posted.into_form();
    apply_edit(action, &mut form);
    OrderPageTemplate::from(&form)
}

fn apply_edit(action: Result<FormAction, ()>, form: &mut OrderForm) {
    match action {
        Ok(FormAction::AddFlavor) => {
            form.add_flavor();
            add_breadcrumb("order", "Line item added", None);
        }
        Ok(FormAction::RemoveFlavor(index)) => {
            form.remove_flavor(index);
            let index = index.to_string();
            add_breadcrumb("order", "Line item removed", Some(&[("index", index.as_str())]));
        }
        Ok(FormAction::Submit) | Err(()) => {
            tracing::debug!("No line item edit requested, re-rendering");
        }
    }
}

async fn submit_order(state: &AppState, form: &mut OrderForm) -> StatusCode {
    let order = match form.begin_submit(Utc::now()) {
        Ok(order) => order,
        Err(SubmitRejected::Invalid(errors)) => {
            tracing::debug!(invalid_fields = errors.len(), "Order form failed validation");
            return StatusCode::UNPROCESSABLE_ENTITY;
        }
        Err(SubmitRejected::Disabled(state)) => {
            tracing::debug!(?state, "Submit ignored");
            return StatusCode::OK;
        }
    };

    let delivered = match state.mailer().send_order(&order).await {
        Ok(()) => true,
        Err(err) => {
            report(&err);
            false
        }
    };
    form.finish_submit(delivered, Utc::now());
    StatusCode::OK
}
