use serde::{Serialize, Serializer};

use orderflow_core::ItemKey;
use orderflow_inventory::InventoryItem;
use orderflow_staff::StaffMember;

/// Derived operational signal. Never persisted; recomputed on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bottleneck {
    /// Stock fell below the item's minimum.
    InventoryShortage(ItemKey),
    /// Nobody available has the skill for this item.
    StaffUnavailable(ItemKey),
}

impl Bottleneck {
    pub fn item(&self) -> &ItemKey {
        match self {
            Bottleneck::InventoryShortage(k) | Bottleneck::StaffUnavailable(k) => k,
        }
    }
}

impl core::fmt::Display for Bottleneck {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Bottleneck::InventoryShortage(item) => write!(f, "Inventory shortage: {item}"),
            Bottleneck::StaffUnavailable(item) => write!(f, "Staff unavailable for: {item}"),
        }
    }
}

impl Serialize for Bottleneck {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Scan inventory (in table order) for shortages and skill-coverage gaps.
///
/// Per item: shortage first, then staff coverage. No deduplication.
pub fn detect_bottlenecks(inventory: &[InventoryItem], staff: &[StaffMember]) -> Vec<Bottleneck> {
    let mut out = Vec::new();

    for item in inventory {
        if item.is_short() {
            out.push(Bottleneck::InventoryShortage(item.key().clone()));
        }

        if !staff.iter().any(|m| m.can_handle(item.key())) {
            out.push(Bottleneck::StaffUnavailable(item.key().clone()));
        }
    }

    out
}
