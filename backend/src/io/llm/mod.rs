//! Plan providers backed by hosted language models.

pub mod openrouter;

pub use openrouter::OpenRouterProvider;
