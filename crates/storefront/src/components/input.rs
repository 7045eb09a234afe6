//! Labelled form inputs with an icon and inline error.

use super::Icon;

/// Which control an input renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// `<input>` with the given `type` attribute.
    SingleLine { input_type: &'static str },
    /// `<textarea>` with a minimum number of rows.
    MultiLine { rows: u8 },
}

impl InputKind {
    pub const TEXT: Self = Self::SingleLine { input_type: "text" };

    #[must_use]
    pub const fn is_multi_line(self) -> bool {
        matches!(self, Self::MultiLine { .. })
    }

    /// `type` attribute for single-line inputs.
    #[must_use]
    pub const fn input_type(self) -> &'static str {
        match self {
            Self::SingleLine { input_type } => input_type,
            Self::MultiLine { .. } => "text",
        }
    }

    #[must_use]
    pub const fn rows(self) -> u8 {
        match self {
            Self::MultiLine { rows } => rows,
            Self::SingleLine { .. } => 1,
        }
    }
}

/// Everything a template needs to draw one input.
#[derive(Debug, Clone)]
pub struct FormInput {
    /// Form field name posted back to the server
    pub name: &'static str,
    pub id: String,
    pub label: &'static str,
    pub icon: Icon,
    pub kind: InputKind,
    pub value: String,
    pub error: Option<&'static str>,
    /// Only adds the asterisk; validation happens server-side.
    pub required: bool,
}

impl FormInput {
    #[must_use]
    pub fn new(name: &'static str, label: &'static str, icon: Icon, kind: InputKind) -> Self {
        Self {
            name,
            id: name.to_string(),
            label,
            icon,
            kind,
            value: String::new(),
            error: None,
            required: false,
        }
    }

    /// Distinguish repeated inputs, e.g. line items.
    #[must_use]
    pub fn with_id(mut self, id: String) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    #[must_use]
    pub const fn with_error(mut self, error: Option<&'static str>) -> Self {
        self.error = error;
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}
