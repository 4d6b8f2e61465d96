//! Staff domain module.
//!
//! Staff members, their skill and whether they can take a new order. Pure
//! domain logic (no IO, no HTTP, no storage).

pub mod member;

pub use member::{Availability, StaffMember};
