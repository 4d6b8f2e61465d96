//! Order intake domain module.
//!
//! Incoming customer orders (validated from the wire schema) and the
//! append-only decision record written for each of them. Pure domain logic
//! (no IO, no HTTP, no storage).

pub mod order;
pub mod record;

pub use order::{Order, OrderRequest};
pub use record::{DecisionRecord, TIMESTAMP_FORMAT, format_timestamp, parse_timestamp};
