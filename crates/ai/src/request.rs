use serde::{Deserialize, Serialize};

use orderflow_core::Decision;

/// Everything the explanation service gets to see about a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationRequest {
    pub decision: Decision,
    pub item_name: String,
    pub quantity: u32,
    pub staff_name: Option<String>,
}

impl ExplanationRequest {
    pub fn new(decision: Decision, item_name: impl Into<String>, quantity: u32) -> Self {
        Self {
            decision,
            item_name: item_name.into(),
            quantity,
            staff_name: None,
        }
    }

    pub fn with_staff(mut self, staff_name: impl Into<String>) -> Self {
        self.staff_name = Some(staff_name.into());
        self
    }

    /// Prompt sent as the single user message.
    pub fn prompt(&self) -> String {
        let staff = self.staff_name.as_deref().unwrap_or("unassigned");
        format!(
            "You are an MSME operations assistant.\n\n\
             Decision: {}\n\
             Item: {}\n\
             Quantity: {}\n\
             Assigned Staff: {}\n\n\
             Explain this decision in one short, clear sentence for a business owner.",
            self.decision, self.item_name, self.quantity, staff
        )
    }
}

/// Aggregate view of one day of operations, for the daily insight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightRequest {
    /// Day covered, `YYYY-MM-DD`.
    pub day: String,
    pub accepted: u32,
    pub held: u32,
    pub rejected: u32,
    /// Current bottleneck strings, in detection order.
    pub bottlenecks: Vec<String>,
}

impl InsightRequest {
    pub fn new(day: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            ..Self::default()
        }
    }

    pub fn record(&mut self, decision: Decision) {
        match decision {
            Decision::Accept => self.accepted += 1,
            Decision::Hold => self.held += 1,
            Decision::Reject => self.rejected += 1,
        }
    }

    pub fn with_bottlenecks(mut self, bottlenecks: Vec<String>) -> Self {
        self.bottlenecks = bottlenecks;
        self
    }

    pub fn total(&self) -> u32 {
        self.accepted + self.held + self.rejected
    }

    /// Plain-text summary used when no model text is available.
    pub fn summary(&self) -> String {
        let bottlenecks = if self.bottlenecks.is_empty() {
            "none".to_string()
        } else {
            self.bottlenecks.join("; ")
        };
        format!(
            "{}: {} orders processed ({} accepted, {} held, {} rejected). Bottlenecks: {}.",
            self.day,
            self.total(),
            self.accepted,
            self.held,
            self.rejected,
            bottlenecks
        )
    }

    pub fn prompt(&self) -> String {
        format!(
            "You are an MSME operations assistant.\n\n\
             Today's operations: {}\n\n\
             Give the business owner one short, practical insight for today.",
            self.summary()
        )
    }
}
