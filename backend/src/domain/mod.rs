//! # Domain Module
//!
//! Business rules of the dream purchase planner, independent of HTTP and of
//! how state is stored.
//!
//! ## Module Organization
//!
//! - **finance**: average expense, monthly savings and their display labels
//! - **affordability**: months-to-afford and target month for wishlist items
//! - **plan_normalizer**: cleanup, parsing and rendering of provider plans
//! - **plan_prompt**: prompts sent to the plan provider
//! - **plan_service**: one-at-a-time plan generation through a provider
//! - **planner_state**: the application state and its validated mutations
//! - **planner_service**: live state, persistence after changes, subscriptions
//! - **errors**: validation, parse and plan error types
//!
//! ## Business Rules
//!
//! - Only positive, finite expense amounts count towards the average
//! - Monthly savings are income minus average expense and may be negative
//! - Items need a non-empty name and a positive price
//! - Zero or negative savings means nothing is affordable, which is reported
//!   separately from an unknown estimate

pub mod affordability;
pub mod errors;
pub mod finance;
pub mod in_flight;
pub mod plan_normalizer;
pub mod plan_prompt;
pub mod plan_service;
pub mod planner_service;
pub mod planner_state;

pub use affordability::*;
pub use errors::*;
pub use finance::*;
pub use in_flight::*;
pub use plan_normalizer::*;
pub use plan_service::*;
pub use planner_service::*;
pub use planner_state::*;
