//! Bodies shared by many registrations.

use crate::value::Value;

use super::{Args, Outcome};

pub fn just_return(_: Args<'_>) -> Outcome {
    Outcome::void()
}

/// Static initialisers with nothing to set up.
pub fn clinit_generic(_: Args<'_>) -> Outcome {
    Outcome::void()
}

pub fn return_null(_: Args<'_>) -> Outcome {
    Outcome::value(Value::Null)
}

pub fn return_true(_: Args<'_>) -> Outcome {
    Outcome::value(Value::bool(true))
}

pub fn return_false(_: Args<'_>) -> Outcome {
    Outcome::value(Value::bool(false))
}
