//! Errors produced by the LCOE engine.
use crate::units::Energy;
use itertools::Itertools;
use std::fmt;
use thiserror::Error;

/// A single input field which failed validation, together with the reason why.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    /// The name of the offending field
    pub field: &'static str,
    /// A human-readable explanation of the constraint that was broken
    pub reason: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// One or more input fields violate their invariants.
///
/// All violations are collected, rather than just the first, so that the user can fix their
/// input in one go.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid project parameters: {}", .violations.iter().join("; "))]
pub struct ValidationError {
    /// Every violated field, in declaration order
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// The names of the fields which failed validation
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.violations.iter().map(|violation| violation.field)
    }

    /// Whether the given field is among the violations
    pub fn has_field(&self, field: &str) -> bool {
        self.fields().any(|f| f == field)
    }
}

/// An error returned when calculating the LCOE
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LcoeError {
    /// The input parameters failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The inputs are valid, but the plant generates (effectively) no discounted energy
    #[error(
        "Total discounted generation ({generation}) is too small to calculate a levelised cost"
    )]
    Division {
        /// The total discounted generation which was calculated
        generation: Energy,
    },
    /// The inputs are valid, but a discounted total is too large to be represented
    #[error("{quantity} is not a finite number, so a levelised cost cannot be calculated")]
    Overflow {
        /// Description of the total which overflowed
        quantity: String,
    },
}
