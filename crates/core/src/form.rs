//! Order form working state and submission state machine.
//!
//! [`OrderForm`] holds what the customer has typed so far, edits it field by
//! field and line item by line item, and tracks the lifecycle of a
//! submission:
//!
//! ```text
//!            valid submit              2xx
//!   Idle ─────────────────► Submitting ─────► Success ──(3000 ms)──► Idle (cleared)
//!    ▲                        │   ▲
//!    │                        │   │ valid resubmit
//!    │                non-2xx │   │
//!    │             or network ▼   │
//!    └─────────────────────  Error
//! ```
//!
//! The form never performs I/O. Callers take the [`OrderRequest`] returned by
//! [`OrderForm::begin_submit`], deliver it however they like, and report the
//! outcome with [`OrderForm::finish_submit`].

use chrono::{DateTime, TimeDelta, Utc};

use crate::types::order::OrderRequest;
use crate::types::phone::apply_mask;
use crate::validation::{CookieItemInput, OrderInput, ValidationErrors, validate};

/// How long the success state is shown before the form clears itself.
pub const SUCCESS_RESET_DELAY_MS: i64 = 3000;

/// Count pre-filled into a freshly added line item.
const NEW_ITEM_COUNT: &str = "0";

/// Where a submission currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Success {
        at: DateTime<Utc>,
    },
    Error,
}

impl SubmissionState {
    /// Whether the submit control is enabled.
    #[must_use]
    pub const fn accepts_submit(&self) -> bool {
        matches!(self, Self::Idle | Self::Error)
    }
}

/// What the submit button shows for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitButton {
    pub label: &'static str,
    pub disabled: bool,
}

impl From<SubmissionState> for SubmitButton {
    fn from(state: SubmissionState) -> Self {
        let label = match state {
            SubmissionState::Idle => "Send Order",
            SubmissionState::Submitting => "Sending Order...",
            SubmissionState::Success { .. } => "Order Received!",
            SubmissionState::Error => "Please Try Again.",
        };
        Self {
            label,
            disabled: !state.accepts_submit(),
        }
    }
}

/// Why a submit attempt did not start.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    /// A submission is in flight or has just succeeded.
    #[error("submit is disabled while {0:?}")]
    Disabled(SubmissionState),
    /// The order failed validation; the errors are also kept on the form.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

/// The order form being filled in.
#[derive(Debug, Clone, Default)]
pub struct OrderForm {
    input: OrderInput,
    errors: ValidationErrors,
    state: SubmissionState,
}

impl OrderForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a form from previously entered values, e.g. a posted HTML form.
    ///
    /// The phone value is normalized through the mask.
    #[must_use]
    pub fn from_input(mut input: OrderInput) -> Self {
        input.phone = apply_mask(&input.phone, None);
        Self {
            input,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn input(&self) -> &OrderInput {
        &self.input
    }

    #[must_use]
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    #[must_use]
    pub const fn state(&self) -> SubmissionState {
        self.state
    }

    #[must_use]
    pub fn button(&self) -> SubmitButton {
        self.state.into()
    }

    #[must_use]
    pub const fn can_submit(&self) -> bool {
        self.state.accepts_submit()
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.input.name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.input.email = value.into();
    }

    pub fn set_delivery_date(&mut self, value: impl Into<String>) {
        self.input.delivery_date = value.into();
    }

    pub fn set_message(&mut self, value: impl Into<String>) {
        self.input.message = value.into();
    }

    /// Apply a phone keystroke through the live mask.
    pub fn set_phone(&mut self, raw: &str) {
        let masked = apply_mask(raw, Some(&self.input.phone));
        self.input.phone = masked;
    }

    /// Line items currently on the form.
    #[must_use]
    pub fn cookie_list(&self) -> &[CookieItemInput] {
        self.input.cookie_list.as_deref().unwrap_or_default()
    }

    /// Append an empty line item.
    pub fn add_flavor(&mut self) {
        self.input
            .cookie_list
            .get_or_insert_with(Vec::new)
            .push(CookieItemInput {
                flavor: String::new(),
                count: NEW_ITEM_COUNT.to_string(),
            });
    }

    /// Remove the line item at `index`. Out-of-range indices are ignored.
    pub fn remove_flavor(&mut self, index: usize) {
        if let Some(items) = self.input.cookie_list.as_mut()
            && index < items.len()
        {
            items.remove(index);
        }
    }

    pub fn set_flavor(&mut self, index: usize, value: impl Into<String>) {
        if let Some(item) = self.item_mut(index) {
            item.flavor = value.into();
        }
    }

    pub fn set_count(&mut self, index: usize, value: impl Into<String>) {
        if let Some(item) = self.item_mut(index) {
            item.count = value.into();
        }
    }

    fn item_mut(&mut self, index: usize) -> Option<&mut CookieItemInput> {
        self.input.cookie_list.as_mut()?.get_mut(index)
    }

    /// Validate and, if valid, move to `Submitting`.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitRejected::Disabled`] while submitting or after
    /// success, and [`SubmitRejected::Invalid`] when validation fails. A
    /// failed validation leaves the state unchanged.
    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> Result<OrderRequest, SubmitRejected> {
        if !self.can_submit() {
            return Err(SubmitRejected::Disabled(self.state));
        }

        match validate(&self.input, now) {
            Ok(order) => {
                self.errors = ValidationErrors::default();
                self.state = SubmissionState::Submitting;
                Ok(order)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(SubmitRejected::Invalid(errors))
            }
        }
    }

    /// Record whether the in-flight submission was delivered.
    ///
    /// Ignored unless a submission is in flight.
    pub fn finish_submit(&mut self, delivered: bool, now: DateTime<Utc>) {
        if self.state != SubmissionState::Submitting {
            return;
        }
        self.state = if delivered {
            SubmissionState::Success { at: now }
        } else {
            SubmissionState::Error
        };
    }

    /// Advance time. Clears the form once the success delay has elapsed.
    ///
    /// Returns `true` when the form was reset.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let SubmissionState::Success { at } = self.state else {
            return false;
        };
        if now.signed_duration_since(at) < TimeDelta::milliseconds(SUCCESS_RESET_DELAY_MS) {
            return false;
        }
        *self = Self::default();
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::validation::{FieldPath, messages};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 15, 30, 0).unwrap()
    }

    fn filled_form() -> OrderForm {
        let mut form = OrderForm::new();
        form.set_name("Ada");
        form.set_email("ada@example.com");
        form.set_delivery_date("2026-04-01");
        form.set_message("Party!");
        form.add_flavor();
        form.set_flavor(0, "Sugar");
        form.set_count(0, "12");
        form
    }

    #[test]
    fn test_add_flavor_starts_with_zero_count() {
        let mut form = OrderForm::new();
        assert!(form.cookie_list().is_empty());
        form.add_flavor();
        form.add_flavor();
        assert_eq!(form.cookie_list().len(), 2);
        assert_eq!(form.cookie_list()[0].flavor, "");
        assert_eq!(form.cookie_list()[0].count, "0");
    }

    #[test]
    fn test_remove_flavor_keeps_order() {
        let mut form = OrderForm::new();
        for flavor in ["a", "b", "c"] {
            form.add_flavor();
            let last = form.cookie_list().len() - 1;
            form.set_flavor(last, flavor);
        }
        form.remove_flavor(1);
        let flavors: Vec<_> = form.cookie_list().iter().map(|i| i.flavor.as_str()).collect();
        assert_eq!(flavors, ["a", "c"]);

        form.remove_flavor(10);
        assert_eq!(form.cookie_list().len(), 2);
    }

    #[test]
    fn test_set_phone_masks_live() {
        let mut form = OrderForm::new();
        form.set_phone("5");
        assert_eq!(form.input().phone, "(5");
        form.set_phone("(555");
        assert_eq!(form.input().phone, "(555)");
        form.set_phone("(555");
        assert_eq!(form.input().phone, "(55");
    }

    #[test]
    fn test_invalid_submit_keeps_state_and_records_errors() {
        let mut form = OrderForm::new();
        let err = form.begin_submit(now()).unwrap_err();
        assert!(matches!(err, SubmitRejected::Invalid(_)));
        assert_eq!(form.state(), SubmissionState::Idle);
        assert_eq!(
            form.errors().get(FieldPath::CookieList),
            Some(messages::COOKIE_LIST_REQUIRED)
        );
    }

    #[test]
    fn test_success_then_reset_after_delay() {
        let mut form = filled_form();
        let order = form.begin_submit(now()).unwrap();
        assert_eq!(order.cookie_list[0].count, 12);
        assert_eq!(form.state(), SubmissionState::Submitting);
        assert!(form.button().disabled);
        assert_eq!(form.button().label, "Sending Order...");

        form.finish_submit(true, now());
        assert!(matches!(form.state(), SubmissionState::Success { .. }));
        assert!(form.button().disabled);
        assert_eq!(form.button().label, "Order Received!");

        assert!(!form.tick(now() + TimeDelta::milliseconds(2999)));
        assert_eq!(form.input().name, "Ada");

        assert!(form.tick(now() + TimeDelta::milliseconds(3000)));
        assert_eq!(form.state(), SubmissionState::Idle);
        assert_eq!(form.input(), &OrderInput::default());
        assert!(!form.button().disabled);
    }

    #[test]
    fn test_submit_disabled_while_in_flight_or_succeeded() {
        let mut form = filled_form();
        form.begin_submit(now()).unwrap();
        assert_eq!(
            form.begin_submit(now()).unwrap_err(),
            SubmitRejected::Disabled(SubmissionState::Submitting)
        );

        form.finish_submit(true, now());
        assert!(matches!(
            form.begin_submit(now()).unwrap_err(),
            SubmitRejected::Disabled(SubmissionState::Success { .. })
        ));
    }

    #[test]
    fn test_failure_keeps_data_and_allows_resubmit() {
        let mut form = filled_form();
        form.begin_submit(now()).unwrap();
        form.finish_submit(false, now());
        assert_eq!(form.state(), SubmissionState::Error);
        assert_eq!(form.button().label, "Please Try Again.");
        assert!(!form.button().disabled);
        assert_eq!(form.input().name, "Ada");
        assert!(!form.tick(now() + TimeDelta::seconds(10)));

        let retry = form.begin_submit(now()).unwrap();
        assert_eq!(retry.name, "Ada");
        assert_eq!(form.state(), SubmissionState::Submitting);
    }

    #[test]
    fn test_finish_without_submit_is_ignored() {
        let mut form = filled_form();
        form.finish_submit(true, now());
        assert_eq!(form.state(), SubmissionState::Idle);
    }

    #[test]
    fn test_line_items_editable_in_any_state() {
        let mut form = filled_form();
        form.begin_submit(now()).unwrap();
        form.add_flavor();
        assert_eq!(form.cookie_list().len(), 2);
    }

    #[test]
    fn test_from_input_masks_phone() {
        let form = OrderForm::from_input(OrderInput {
            phone: "5551234567".to_string(),
            ..OrderInput::default()
        });
        assert_eq!(form.input().phone, "(555)123-4567");
        assert_eq!(form.state(), SubmissionState::Idle);
    }
}
