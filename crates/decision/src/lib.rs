//! `orderflow-decision`
//!
//! **Responsibility:** the decision engine.
//!
//! Everything here is a pure function over snapshots:
//! - It never reads or writes storage.
//! - It never calls the explanation service.
//! - Callers own the snapshots and apply the resulting mutations.

pub mod bottleneck;
pub mod engine;

pub use bottleneck::{Bottleneck, detect_bottlenecks};
pub use engine::{Evaluation, assign_staff, evaluate, reasons};
