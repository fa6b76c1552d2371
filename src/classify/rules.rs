//! Priority-ordered rule table mapping invariants to a family
//!
//! Conditions overlap (e.g. rules 1 and 9 both accept dimension 1.60), so the
//! first matching rule wins and the order is part of the contract.

use super::family::FormulaFamily;
use crate::measure::{InvariantVector, SymmetryClass};

/// One row of the decision table
#[derive(Clone, Copy)]
pub struct Rule {
    /// 1-based priority, lower wins
    pub priority: u8,
    /// Family selected when the condition holds
    pub family: FormulaFamily,
    /// Condition over the invariants
    pub condition: fn(&InvariantVector) -> bool,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("priority", &self.priority)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

fn within(value: f64, low: f64, high: f64) -> bool {
    (low..=high).contains(&value)
}

fn is_single_right_angle(angles: &[f64]) -> bool {
    matches!(angles, [angle] if (angle - 90.0).abs() < f64::EPSILON)
}

/// The decision table in priority order
pub const RULES: [Rule; 10] = [
    Rule {
        priority: 1,
        family: FormulaFamily::Sierpinski,
        condition: |inv| {
            within(inv.dimensionality, 1.55, 1.60) && inv.symmetry_approx == SymmetryClass::C3
        },
    },
    Rule {
        priority: 2,
        family: FormulaFamily::Koch,
        condition: |inv| {
            within(inv.dimensionality, 1.24, 1.28)
                && (inv.symmetry_approx.is_dihedral()
                    || matches!(inv.symmetry_approx, SymmetryClass::C6 | SymmetryClass::C12))
        },
    },
    Rule {
        priority: 3,
        family: FormulaFamily::Julia,
        condition: |inv| within(inv.dimensionality, 1.95, 2.05) && inv.repetition_score > 0.85,
    },
    Rule {
        priority: 4,
        family: FormulaFamily::Dragon,
        condition: |inv| {
            within(inv.dimensionality, 1.95, 2.05) && is_single_right_angle(&inv.branching.angles)
        },
    },
    Rule {
        priority: 5,
        family: FormulaFamily::Tree,
        condition: |inv| {
            within(inv.dimensionality, 1.80, 1.90)
                && matches!(
                    inv.symmetry_approx,
                    SymmetryClass::C5 | SymmetryClass::CInfinity
                )
        },
    },
    Rule {
        priority: 6,
        family: FormulaFamily::Menger,
        condition: |inv| {
            within(inv.dimensionality, 2.70, 2.75) && inv.symmetry_approx == SymmetryClass::Oh
        },
    },
    Rule {
        priority: 7,
        family: FormulaFamily::Automaton,
        condition: |inv| within(inv.dimensionality, 1.4, 2.0) && inv.repetition_score < 0.7,
    },
    Rule {
        priority: 8,
        family: FormulaFamily::Spiral,
        condition: |inv| {
            within(inv.dimensionality, 1.0, 1.2) && inv.symmetry_approx == SymmetryClass::CInfinity
        },
    },
    Rule {
        priority: 9,
        family: FormulaFamily::Algebraic,
        condition: |inv| within(inv.dimensionality, 1.6, 2.0) && inv.connectivity == 1,
    },
    Rule {
        priority: 10,
        family: FormulaFamily::Cantor,
        condition: |inv| inv.dimensionality < 1.0,
    },
];

/// First family whose rule matches, or [`FormulaFamily::Unknown`]
pub fn select_family(invariants: &InvariantVector) -> FormulaFamily {
    RULES
        .iter()
        .find(|rule| (rule.condition)(invariants))
        .map_or(FormulaFamily::Unknown, |rule| rule.family)
}

/// Priorities of every rule whose condition holds, ascending
pub fn matching_priorities(invariants: &InvariantVector) -> Vec<u8> {
    RULES
        .iter()
        .filter(|rule| (rule.condition)(invariants))
        .map(|rule| rule.priority)
        .collect()
}
