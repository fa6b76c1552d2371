//! Deterministic formula classification
//!
//! Maps an invariant vector to a named family through a fixed rule table and
//! returns that family's canonical formula. Classification is total.

/// Families and canonical formula strings
pub mod family;
/// Priority-ordered decision table
pub mod rules;

pub use family::FormulaFamily;

use crate::measure::InvariantVector;
use tracing::debug;

/// Family and formula text chosen for one invariant vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Selected family
    pub family: FormulaFamily,
    /// Canonical or fallback formula text
    pub formula: String,
}

/// Classify invariants into a family and formula
pub fn classify_family(invariants: &InvariantVector) -> Classification {
    let family = rules::select_family(invariants);
    debug!(?family, matching = ?rules::matching_priorities(invariants), "classified");
    Classification {
        family,
        formula: family.formula(invariants),
    }
}

/// Formula text for the given invariants
pub fn classify(invariants: &InvariantVector) -> String {
    classify_family(invariants).formula
}
