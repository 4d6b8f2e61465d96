use serde::{Deserialize, Serialize};

use orderflow_core::{DomainError, DomainResult, ItemKey};

/// Incoming order, exactly as it arrives on the wire.
///
/// `quantity` is signed so that zero/negative values surface as validation
/// errors instead of deserialization failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub item_name: String,
    pub quantity: i64,
}

/// A validated customer order. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    customer_name: String,
    customer_email: String,
    customer_phone: Option<String>,
    item_name: String,
    item_key: ItemKey,
    quantity: u32,
}

impl Order {
    /// Validate a wire request into an order.
    pub fn parse(req: OrderRequest) -> DomainResult<Self> {
        let customer_name = req.customer_name.trim();
        if customer_name.is_empty() {
            return Err(DomainError::validation("customer_name cannot be empty"));
        }

        let customer_email = req.customer_email.trim();
        if customer_email.is_empty() {
            return Err(DomainError::validation("customer_email cannot be empty"));
        }
        if !customer_email.contains('@') {
            return Err(DomainError::validation("customer_email must contain '@'"));
        }

        let item_key = ItemKey::new(&req.item_name);
        if item_key.is_empty() {
            return Err(DomainError::validation("item_name cannot be empty"));
        }

        if req.quantity <= 0 {
            return Err(DomainError::validation("quantity must be a positive integer"));
        }
        let quantity = u32::try_from(req.quantity)
            .map_err(|_| DomainError::validation("quantity is too large"))?;

        let customer_phone = req
            .customer_phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Ok(Self {
            customer_name: customer_name.to_string(),
            customer_email: customer_email.to_string(),
            customer_phone,
            item_name: req.item_name,
            item_key,
            quantity,
        })
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn customer_email(&self) -> &str {
        &self.customer_email
    }

    pub fn customer_phone(&self) -> Option<&str> {
        self.customer_phone.as_deref()
    }

    /// Item name as submitted (not normalized).
    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    pub fn item_key(&self) -> &ItemKey {
        &self.item_key
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

impl TryFrom<OrderRequest> for Order {
    type Error = DomainError;

    fn try_from(value: OrderRequest) -> Result<Self, Self::Error> {
        Order::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OrderRequest {
        OrderRequest {
            customer_name: "Dana".to_string(),
            customer_email: "dana@example.com".to_string(),
            customer_phone: Some("555-0101".to_string()),
            item_name: " Bolt ".to_string(),
            quantity: 3,
        }
    }

    #[test]
    fn valid_request_parses() {
        let order = Order::parse(request()).unwrap();
        assert_eq!(order.customer_name(), "Dana");
        assert_eq!(order.item_name(), " Bolt ");
        assert_eq!(order.item_key().as_str(), "bolt");
        assert_eq!(order.quantity(), 3);
        assert_eq!(order.customer_phone(), Some("555-0101"));
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        for q in [0, -4] {
            let mut req = request();
            req.quantity = q;
            assert!(matches!(Order::parse(req), Err(DomainError::Validation(_))));
        }
    }

    #[test]
    fn oversized_quantity_is_rejected() {
        let mut req = request();
        req.quantity = i64::from(u32::MAX) + 1;
        assert!(Order::parse(req).is_err());
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut req = request();
        req.customer_name = "  ".to_string();
        assert!(Order::parse(req).is_err());

        let mut req = request();
        req.item_name = "".to_string();
        assert!(Order::parse(req).is_err());

        let mut req = request();
        req.customer_email = "not-an-email".to_string();
        assert!(Order::parse(req).is_err());
    }

    #[test]
    fn blank_phone_reads_as_absent() {
        let mut req = request();
        req.customer_phone = Some("   ".to_string());
        assert_eq!(Order::parse(req).unwrap().customer_phone(), None);
    }

    #[test]
    fn phone_is_optional_on_the_wire() {
        let req: OrderRequest = serde_json::from_str(
            r#"{"customer_name":"Dana","customer_email":"d@x.io","item_name":"bolt","quantity":1}"#,
        )
        .unwrap();
        assert_eq!(req.customer_phone, None);
    }
}
