use orderflow_core::{Decision, ItemKey};
use orderflow_inventory::InventoryItem;
use orderflow_sales::Order;
use orderflow_staff::StaffMember;

/// Fixed reason strings returned to callers.
pub mod reasons {
    pub const ITEM_NOT_FOUND: &str = "Item not found in inventory";
    pub const INSUFFICIENT_STOCK: &str = "Insufficient stock";
    pub const INVENTORY_AVAILABLE: &str = "Inventory available";
    pub const NO_STAFF: &str = "No available staff with required skill";
    pub const ACCEPTED: &str = "Inventory and staff available";
}

/// Result of the inventory check.
///
/// `Pass` means "inventory is sufficient, go on to staff assignment". It never
/// leaves the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    Pass,
    Decided {
        decision: Decision,
        reason: &'static str,
    },
}

impl Evaluation {
    pub fn reason(&self) -> &'static str {
        match self {
            Evaluation::Pass => reasons::INVENTORY_AVAILABLE,
            Evaluation::Decided { reason, .. } => reason,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Evaluation::Pass)
    }
}

/// Check an order against an inventory snapshot.
pub fn evaluate(order: &Order, inventory: &[InventoryItem]) -> Evaluation {
    let Some(item) = inventory.iter().find(|i| i.key() == order.item_key()) else {
        return Evaluation::Decided {
            decision: Decision::Reject,
            reason: reasons::ITEM_NOT_FOUND,
        };
    };

    if !item.has_stock_for(order.quantity()) {
        return Evaluation::Decided {
            decision: Decision::Hold,
            reason: reasons::INSUFFICIENT_STOCK,
        };
    }

    Evaluation::Pass
}

/// First available member (in store order) whose skill matches `item_name`.
///
/// First match wins; there is no ranking among qualified members.
pub fn assign_staff<'a>(item_name: &str, staff: &'a [StaffMember]) -> Option<&'a str> {
    let item = ItemKey::new(item_name);
    staff
        .iter()
        .find(|m| m.can_handle(&item))
        .map(StaffMember::name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderflow_sales::OrderRequest;
    use proptest::prelude::*;

    fn order(item: &str, quantity: i64) -> Order {
        Order::parse(OrderRequest {
            customer_name: "Dana".to_string(),
            customer_email: "dana@example.com".to_string(),
            customer_phone: None,
            item_name: item.to_string(),
            quantity,
        })
        .unwrap()
    }

    fn bolts(quantity: u32) -> Vec<InventoryItem> {
        vec![InventoryItem::new("bolt", quantity, 2).unwrap()]
    }

    #[test]
    fn unknown_item_is_rejected() {
        let eval = evaluate(&order("widget", 1), &bolts(5));
        assert_eq!(
            eval,
            Evaluation::Decided {
                decision: Decision::Reject,
                reason: reasons::ITEM_NOT_FOUND
            }
        );
    }

    #[test]
    fn short_stock_is_held() {
        let eval = evaluate(&order("bolt", 10), &bolts(5));
        assert_eq!(
            eval,
            Evaluation::Decided {
                decision: Decision::Hold,
                reason: reasons::INSUFFICIENT_STOCK
            }
        );
    }

    #[test]
    fn exact_stock_passes() {
        let eval = evaluate(&order("bolt", 5), &bolts(5));
        assert!(eval.is_pass());
        assert_eq!(eval.reason(), reasons::INVENTORY_AVAILABLE);
    }

    #[test]
    fn item_lookup_is_normalized() {
        assert!(evaluate(&order("  BOLT ", 1), &bolts(5)).is_pass());
    }

    #[test]
    fn first_available_match_wins() {
        let staff = vec![
            StaffMember::new("Alice", "bolt", false).unwrap(),
            StaffMember::new("Bob", "nut", true).unwrap(),
            StaffMember::new("Cara", "Bolt", true).unwrap(),
            StaffMember::new("Dev", "bolt", true).unwrap(),
        ];
        assert_eq!(assign_staff(" bolt", &staff), Some("Cara"));
    }

    #[test]
    fn no_match_yields_none() {
        let staff = vec![StaffMember::new("Alice", "bolt", false).unwrap()];
        assert_eq!(assign_staff("bolt", &staff), None);
        assert_eq!(assign_staff("bolt", &[]), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: items missing from the snapshot are always rejected.
        #[test]
        fn absent_items_always_reject(
            item in "[a-z]{1,8}",
            qty in 1i64..1_000,
            stock in 0u32..1_000,
        ) {
            let inventory = vec![InventoryItem::new(format!("{item}-stocked"), stock, 0).unwrap()];
            let eval = evaluate(&order(&item, qty), &inventory);
            prop_assert_eq!(
                eval,
                Evaluation::Decided { decision: Decision::Reject, reason: reasons::ITEM_NOT_FOUND }
            );
        }

        /// Property: for a known item, HOLD iff requested > stock, otherwise PASS.
        #[test]
        fn stock_threshold_decides(qty in 1i64..2_000, stock in 0u32..1_000) {
            let eval = evaluate(&order("bolt", qty), &bolts(stock));
            if qty > i64::from(stock) {
                prop_assert_eq!(
                    eval,
                    Evaluation::Decided { decision: Decision::Hold, reason: reasons::INSUFFICIENT_STOCK }
                );
            } else {
                prop_assert!(eval.is_pass());
            }
        }

        /// Property: the assigned member is the first qualified one in store order.
        #[test]
        fn assignment_is_first_qualified(flags in prop::collection::vec(any::<bool>(), 0..12)) {
            let staff: Vec<StaffMember> = flags
                .iter()
                .enumerate()
                .map(|(i, available)| StaffMember::new(&format!("m{i}"), "bolt", *available).unwrap())
                .collect();
            let expected = flags.iter().position(|a| *a).map(|i| format!("m{i}"));
            prop_assert_eq!(assign_staff("bolt", &staff).map(str::to_string), expected);
        }
    }
}
