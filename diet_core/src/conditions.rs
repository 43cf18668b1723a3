//! Canonical names for health conditions and intolerances.
//!
//! Stored profiles mix English and Italian spellings and arbitrary casing.
//! Every lookup goes through [`canonical`] so that "Reflusso", "reflux" and
//! " REFLUX " all match the same rule.

use crate::UserProfile;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const REFLUX: &str = "reflux";
pub const IBS: &str = "ibs";
pub const ENDOMETRIOSIS: &str = "endometriosis";
pub const ARTHRITIS: &str = "arthritis";
pub const MULTIPLE_SCLEROSIS: &str = "multiple_sclerosis";

pub const LACTOSE: &str = "lactose";
pub const GLUTEN: &str = "gluten";

static ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("reflusso", REFLUX),
        ("endometriosi", ENDOMETRIOSIS),
        ("artrite", ARTHRITIS),
        ("sclerosi multipla", MULTIPLE_SCLEROSIS),
        ("multiple sclerosis", MULTIPLE_SCLEROSIS),
        ("lattosio", LACTOSE),
        ("glutine", GLUTEN),
    ])
});

/// Lowercased, trimmed and alias-resolved form of a condition or intolerance
pub fn canonical(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    match ALIASES.get(lowered.as_str()) {
        Some(name) => (*name).to_string(),
        None => lowered,
    }
}

impl UserProfile {
    /// Whether the profile lists a health condition (canonical name)
    pub fn has_condition(&self, condition: &str) -> bool {
        self.health_conditions
            .iter()
            .any(|c| canonical(c) == condition)
    }

    /// Canonical intolerance names, in stored order, without blanks
    pub fn canonical_intolerances(&self) -> Vec<String> {
        self.intolerances
            .iter()
            .map(|i| canonical(i))
            .filter(|i| !i.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_resolves_aliases() {
        assert_eq!(canonical("Reflusso"), REFLUX);
        assert_eq!(canonical(" Sclerosi Multipla "), MULTIPLE_SCLEROSIS);
        assert_eq!(canonical("LATTOSIO"), LACTOSE);
        assert_eq!(canonical("IBS"), IBS);
        assert_eq!(canonical("nickel"), "nickel");
    }
}
