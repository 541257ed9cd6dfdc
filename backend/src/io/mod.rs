//! # IO Module
//!
//! Adapters between the outside world and the domain services:
//!
//! - **rest**: the axum HTTP API served to front ends
//! - **llm**: plan providers that call hosted language models
//! - **plan_client**: typed client for the plan endpoint of a running server

pub mod llm;
pub mod plan_client;
pub mod rest;

pub use llm::OpenRouterProvider;
pub use plan_client::PlanClient;
