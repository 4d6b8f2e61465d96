//! `orderflow-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod decision;
pub mod entity;
pub mod error;
pub mod value_object;

pub use decision::Decision;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use value_object::{ItemKey, ValueObject};
