//! Infrastructure layer: persistence, configuration, clock and the order
//! workflow that composes them with the decision engine and the explanation
//! service.

pub mod clock;
pub mod config;
pub mod error;
pub mod store;
pub mod workflow;

pub use clock::{Clock, FixedClock, LocalClock};
pub use config::{AppConfig, ConfigError, ExplainConfig, StoreBackend};
pub use error::StoreError;
pub use store::{InMemoryIntakeStore, IntakeStore, SeedData, SqliteIntakeStore, seed_if_empty};
pub use workflow::{DailyInsight, DecisionOutcome, OrderWorkflow, WorkflowError, WorkflowOutput, WorkflowState};
