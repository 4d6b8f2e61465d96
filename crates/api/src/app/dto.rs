use serde::Serialize;

use orderflow_decision::Bottleneck;
use orderflow_sales::DecisionRecord;

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct BottlenecksResponse {
    pub bottlenecks: Vec<String>,
}

impl From<Vec<Bottleneck>> for BottlenecksResponse {
    fn from(found: Vec<Bottleneck>) -> Self {
        Self {
            bottlenecks: found.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderLogResponse {
    pub count: usize,
    pub orders: Vec<DecisionRecord>,
}

impl From<Vec<DecisionRecord>> for OrderLogResponse {
    fn from(orders: Vec<DecisionRecord>) -> Self {
        Self {
            count: orders.len(),
            orders,
        }
    }
}
