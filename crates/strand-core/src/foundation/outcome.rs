//! Middleware outcomes.
//!
//! A middleware either handled the event (with or without data) or it
//! ignored it. [`Outcome::Ignore`] is the only value meaning "this did not
//! handle the event"; everything else counts as success.

use serde_json::Value;

/// The result of running a middleware.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Outcome {
    /// The event was handled and no data was produced.
    #[default]
    Handled,
    /// The event was not handled by this middleware.
    Ignore,
    /// The event was handled and produced data.
    Data(Value),
}

impl Outcome {
    /// Returns `false` only for [`Outcome::Ignore`].
    pub fn is_successful(&self) -> bool {
        !matches!(self, Outcome::Ignore)
    }

    /// Returns `true` for [`Outcome::Ignore`].
    pub fn is_ignored(&self) -> bool {
        matches!(self, Outcome::Ignore)
    }

    /// Returns the produced data, if any.
    pub fn data(&self) -> Option<&Value> {
        match self {
            Outcome::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Consumes the outcome and returns the produced data, if any.
    pub fn into_data(self) -> Option<Value> {
        match self {
            Outcome::Data(value) => Some(value),
            _ => None,
        }
    }
}

/// Returns `true` if `value` is a successful middleware result.
///
/// This is the single success predicate used by every collection strategy.
pub fn is_successful_result(value: &Outcome) -> bool {
    value.is_successful()
}

impl From<()> for Outcome {
    fn from(_: ()) -> Self {
        Outcome::Handled
    }
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        Outcome::Data(value)
    }
}

/// `None` is still a success; it carries no data.
impl From<Option<Value>> for Outcome {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Outcome::Handled, Outcome::Data)
    }
}
