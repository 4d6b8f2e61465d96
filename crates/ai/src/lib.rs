//! `orderflow-ai`
//!
//! **Responsibility:** the explanation service boundary.
//!
//! This crate is intentionally **not** part of the decision path:
//! - It must not depend on stores or the workflow.
//! - It must not mutate domain state.
//! - It turns an already-made decision, or a day of them, into one sentence
//!   of prose.
//!
//! Callers treat every failure here as recoverable.

pub mod chat;
pub mod explainer;
pub mod request;
pub mod result;

pub use chat::{ChatCompletionsConfig, ChatCompletionsExplainer};
pub use explainer::{DisabledExplainer, Explainer, RetryPolicy};
pub use request::{ExplanationRequest, InsightRequest};
pub use result::{AiError, Explanation};
