//! Order workflow: evaluate, assign, commit, explain.
//!
//! ```text
//! Start -> Evaluated -> Rejected | Held | StaffUnavailable | Accepted
//! ```
//!
//! Store writes for one order happen under a single workflow-wide lock. The
//! explanation call happens after the lock is released and can never undo
//! or block a committed decision.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use orderflow_ai::{Explainer, ExplanationRequest, InsightRequest};
use orderflow_core::{Decision, DomainError};
use orderflow_decision::{Bottleneck, Evaluation, assign_staff, detect_bottlenecks, evaluate, reasons};
use orderflow_sales::{DecisionRecord, Order, OrderRequest};

use crate::clock::{Clock, LocalClock};
use crate::error::StoreError;
use crate::store::IntakeStore;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Start,
    Evaluated,
    Rejected,
    Held,
    StaffUnavailable,
    Accepted,
}

/// What the caller gets back for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionOutcome {
    pub decision: Decision,
    pub reason: String,
    pub customer_name: String,
    pub customer_email: String,
    pub assigned_staff: Option<String>,
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip)]
    pub state: WorkflowState,
}

/// Short operational summary for the current day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyInsight {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WorkflowOutput {
    Decision(DecisionOutcome),
    Bottlenecks(Vec<Bottleneck>),
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("validation error: {0}")]
    Validation(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct OrderWorkflow {
    store: Arc<dyn IntakeStore>,
    explainer: Arc<dyn Explainer>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

/// Terminal result of the locked section, before explanation.
struct Committed {
    decision: Decision,
    reason: &'static str,
    assigned_staff: Option<String>,
    state: WorkflowState,
}

impl OrderWorkflow {
    pub fn new(store: Arc<dyn IntakeStore>, explainer: Arc<dyn Explainer>) -> Self {
        Self::with_clock(store, explainer, Arc::new(LocalClock))
    }

    pub fn with_clock(
        store: Arc<dyn IntakeStore>,
        explainer: Arc<dyn Explainer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            explainer,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn IntakeStore> {
        &self.store
    }

    /// Single entry point: an order yields a decision, no order yields the
    /// current bottlenecks.
    pub async fn run(&self, order: Option<OrderRequest>) -> Result<WorkflowOutput, WorkflowError> {
        match order {
            Some(req) => Ok(WorkflowOutput::Decision(self.submit(req).await?)),
            None => Ok(WorkflowOutput::Bottlenecks(self.inspect_bottlenecks().await?)),
        }
    }

    /// Validate raw input, then process it. Invalid input touches nothing.
    pub async fn submit(&self, req: OrderRequest) -> Result<DecisionOutcome, WorkflowError> {
        let order = Order::parse(req)?;
        self.process(&order).await
    }

    pub async fn process(&self, order: &Order) -> Result<DecisionOutcome, WorkflowError> {
        let request_id = Uuid::now_v7();
        let span = tracing::info_span!(
            "process_order",
            %request_id,
            item = %order.item_key(),
            quantity = order.quantity()
        );

        async move {
            tracing::debug!(state = ?WorkflowState::Start, "order received");
            let committed = self.decide_and_commit(order).await?;
            tracing::info!(
                decision = %committed.decision,
                state = ?committed.state,
                staff = committed.assigned_staff.as_deref().unwrap_or(""),
                "order decided"
            );

            let (explanation, warning) = self.explain(order, &committed).await;

            Ok(DecisionOutcome {
                decision: committed.decision,
                reason: committed.reason.to_string(),
                customer_name: order.customer_name().to_string(),
                customer_email: order.customer_email().to_string(),
                assigned_staff: committed.assigned_staff,
                explanation,
                warning,
                state: committed.state,
            })
        }
        .instrument(span)
        .await
    }

    /// Bottlenecks for the current tables. Read-only.
    pub async fn inspect_bottlenecks(&self) -> Result<Vec<Bottleneck>, WorkflowError> {
        let (inventory, staff) = {
            let _guard = self.write_lock.lock().await;
            (self.store.inventory().await?, self.store.staff().await?)
        };
        let found = detect_bottlenecks(&inventory, &staff);
        tracing::debug!(count = found.len(), "bottlenecks inspected");
        Ok(found)
    }

    pub async fn order_log(&self) -> Result<Vec<DecisionRecord>, WorkflowError> {
        Ok(self.store.orders().await?)
    }

    /// Insight over today's Order Log rows and the current bottlenecks.
    ///
    /// When the explainer fails the plain summary is returned with a warning.
    pub async fn daily_insight(&self) -> Result<DailyInsight, WorkflowError> {
        let today = self.clock.now().date();
        let bottlenecks = self.inspect_bottlenecks().await?;
        let orders = self.store.orders().await?;

        let mut req = InsightRequest::new(today.format("%Y-%m-%d").to_string());
        for record in orders.iter().filter(|r| r.timestamp.date() == today) {
            req.record(record.decision);
        }
        let req = req.with_bottlenecks(bottlenecks.iter().map(ToString::to_string).collect());

        match self.explainer.insight(&req).await {
            Ok(insight) => Ok(DailyInsight {
                text: insight.text,
                warning: None,
            }),
            Err(err) => {
                tracing::warn!(error = %err, "daily insight unavailable; returning summary");
                Ok(DailyInsight {
                    text: req.summary(),
                    warning: Some(format!("insight unavailable: {err}")),
                })
            }
        }
    }

    async fn decide_and_commit(&self, order: &Order) -> Result<Committed, WorkflowError> {
        let _guard = self.write_lock.lock().await;

        let inventory = self.store.inventory().await?;
        let evaluation = evaluate(order, &inventory);
        tracing::debug!(state = ?WorkflowState::Evaluated, reason = evaluation.reason());

        let (decision, reason) = match evaluation {
            Evaluation::Decided { decision, reason } => (decision, reason),
            Evaluation::Pass => {
                let staff = self.store.staff().await?;
                let Some(name) = assign_staff(order.item_key().as_str(), &staff) else {
                    self.log(order, Decision::Hold, None).await?;
                    return Ok(Committed {
                        decision: Decision::Hold,
                        reason: reasons::NO_STAFF,
                        assigned_staff: None,
                        state: WorkflowState::StaffUnavailable,
                    });
                };

                let name = name.to_string();
                let record = DecisionRecord::new(self.clock.now(), order, Decision::Accept, Some(&name));
                let remaining = self
                    .store
                    .commit_acceptance(order.item_key(), order.quantity(), &name, &record)
                    .await?;
                tracing::debug!(remaining, staff = %name, "acceptance committed");

                return Ok(Committed {
                    decision: Decision::Accept,
                    reason: reasons::ACCEPTED,
                    assigned_staff: Some(name),
                    state: WorkflowState::Accepted,
                });
            }
        };

        self.log(order, decision, None).await?;
        let state = match decision {
            Decision::Reject => WorkflowState::Rejected,
            _ => WorkflowState::Held,
        };
        Ok(Committed {
            decision,
            reason,
            assigned_staff: None,
            state,
        })
    }

    async fn log(&self, order: &Order, decision: Decision, staff: Option<&str>) -> Result<(), StoreError> {
        let record = DecisionRecord::new(self.clock.now(), order, decision, staff);
        self.store.append_order(&record).await
    }

    async fn explain(&self, order: &Order, committed: &Committed) -> (Option<String>, Option<String>) {
        let mut req = ExplanationRequest::new(committed.decision, order.item_name(), order.quantity());
        if let Some(staff) = &committed.assigned_staff {
            req = req.with_staff(staff.clone());
        }

        match self.explainer.explain(&req).await {
            Ok(explanation) => {
                tracing::debug!(attempts = explanation.attempts, "explanation received");
                (Some(explanation.text), None)
            }
            Err(err) => {
                tracing::warn!(error = %err, "explanation unavailable; returning decision without it");
                (None, Some(format!("explanation unavailable: {err}")))
            }
        }
    }
}
