use serde::{Deserialize, Serialize};

use orderflow_core::{DomainError, DomainResult, Entity, ItemKey};

/// Table encoding of a staff member's availability.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Yes,
    No,
}

impl Availability {
    /// Lenient parse of a table cell: only a trimmed, case-insensitive `yes`
    /// means available; anything else reads as `No`.
    pub fn parse_cell(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("yes") {
            Availability::Yes
        } else {
            Availability::No
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Yes => "yes",
            Availability::No => "no",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Yes)
    }
}

impl From<bool> for Availability {
    fn from(value: bool) -> Self {
        if value { Availability::Yes } else { Availability::No }
    }
}

/// One row of the staff table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    name: String,
    skill: ItemKey,
    available: bool,
}

impl StaffMember {
    pub fn new(name: &str, skill: &str, available: bool) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("staff_name cannot be empty"));
        }
        Ok(Self {
            name: name.to_string(),
            skill: ItemKey::new(skill),
            available,
        })
    }

    /// Build a member from raw table cells (`available` as `"yes"`/`"no"`).
    pub fn from_row(name: &str, skill: &str, available: &str) -> DomainResult<Self> {
        Self::new(name, skill, Availability::parse_cell(available).is_available())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn skill(&self) -> &ItemKey {
        &self.skill
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn availability(&self) -> Availability {
        Availability::from(self.available)
    }

    /// Available and skilled for `item`.
    pub fn can_handle(&self, item: &ItemKey) -> bool {
        self.available && &self.skill == item
    }

    /// Case-insensitive, trimmed name comparison.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }

    pub fn mark_unavailable(&mut self) {
        self.available = false;
    }
}

impl Entity for StaffMember {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yes_means_available() {
        assert_eq!(Availability::parse_cell(" YES "), Availability::Yes);
        assert_eq!(Availability::parse_cell("no"), Availability::No);
        assert_eq!(Availability::parse_cell("true"), Availability::No);
        assert_eq!(Availability::parse_cell(""), Availability::No);
    }

    #[test]
    fn row_is_normalized() {
        let m = StaffMember::from_row("  Alice ", " Bolt", "yes").unwrap();
        assert_eq!(m.name(), "Alice");
        assert_eq!(m.skill().as_str(), "bolt");
        assert!(m.is_available());
        assert_eq!(m.availability().as_str(), "yes");
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(StaffMember::new("   ", "bolt", true).is_err());
    }

    #[test]
    fn can_handle_requires_skill_and_availability() {
        let bolt = ItemKey::new("bolt");
        let mut m = StaffMember::new("Alice", "bolt", true).unwrap();
        assert!(m.can_handle(&bolt));
        assert!(!m.can_handle(&ItemKey::new("nut")));

        m.mark_unavailable();
        assert!(!m.can_handle(&bolt));
    }

    #[test]
    fn name_match_ignores_case_and_padding() {
        let m = StaffMember::new("Alice", "bolt", true).unwrap();
        assert!(m.has_name(" alice "));
        assert!(!m.has_name("alicia"));
    }

    #[test]
    fn availability_serializes_as_table_cell() {
        assert_eq!(serde_json::to_string(&Availability::No).unwrap(), "\"no\"");
    }
}
