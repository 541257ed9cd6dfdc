//! Error taxonomy for planner operations.
//!
//! - `ValidationError`: user input that cannot be accepted; nothing is persisted
//! - `ParseError`: plan text that does not contain a usable plan object
//! - `PlanError`: everything that can end a plan request
//!
//! None of these are retried. Every failure ends the action that caused it.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please enter at least an item name and a valid price.")]
    EmptyItemName,
    #[error("Please enter at least an item name and a valid price.")]
    InvalidPrice,
    #[error("Add at least one dream item before asking AI.")]
    NoItems,
    #[error("Expense row not found: {0}")]
    UnknownExpenseRow(String),
}

/// Plan text could not be turned into a plan. Keeps the untouched provider
/// output so the failure can be diagnosed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Could not parse plan: {reason}")]
pub struct ParseError {
    pub reason: String,
    pub raw: String,
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The plan endpoint could not be reached or answered with a non-2xx status
    #[error("{0}")]
    Network(String),
    #[error("Plan provider failed: {0}")]
    Provider(String),
    #[error("A plan request is already in progress")]
    InFlight,
}

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to save planner state: {0}")]
    Storage(String),
}
