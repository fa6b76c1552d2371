//! Invariant vector produced by the measurer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rotational/point symmetry class, serialized as its short token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SymmetryClass {
    /// No symmetry detected
    #[default]
    C1,
    /// Two-fold rotation (180°)
    C2,
    /// Three-fold rotation (120°)
    C3,
    /// Four-fold rotation (90°)
    C4,
    /// Five-fold rotation (72°)
    C5,
    /// Six-fold rotation (60°)
    C6,
    /// Eight-fold rotation (45°)
    C8,
    /// Twelve-fold rotation (30°)
    C12,
    /// Single mirror axis
    D1,
    /// Dihedral of order 2
    D2,
    /// Dihedral of order 3
    D3,
    /// Dihedral of order 4
    D4,
    /// Dihedral of order 6
    D6,
    /// Continuous rotation
    #[serde(rename = "C∞")]
    CInfinity,
    /// Full octahedral
    Oh,
    /// Full icosahedral
    Ih,
    /// Full tetrahedral
    Td,
}

impl SymmetryClass {
    /// Every token in the vocabulary
    pub const ALL: [Self; 17] = [
        Self::C1,
        Self::C2,
        Self::C3,
        Self::C4,
        Self::C5,
        Self::C6,
        Self::C8,
        Self::C12,
        Self::D1,
        Self::D2,
        Self::D3,
        Self::D4,
        Self::D6,
        Self::CInfinity,
        Self::Oh,
        Self::Ih,
        Self::Td,
    ];

    /// Short textual token, e.g. `"C4"` or `"C∞"`
    pub const fn token(self) -> &'static str {
        match self {
            Self::C1 => "C1",
            Self::C2 => "C2",
            Self::C3 => "C3",
            Self::C4 => "C4",
            Self::C5 => "C5",
            Self::C6 => "C6",
            Self::C8 => "C8",
            Self::C12 => "C12",
            Self::D1 => "D1",
            Self::D2 => "D2",
            Self::D3 => "D3",
            Self::D4 => "D4",
            Self::D6 => "D6",
            Self::CInfinity => "C∞",
            Self::Oh => "Oh",
            Self::Ih => "Ih",
            Self::Td => "Td",
        }
    }

    /// Parse a token back into a class
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.token() == token)
    }

    /// Rotational class whose generator is the given angle in degrees
    pub const fn from_rotation_angle(degrees: u32) -> Option<Self> {
        match degrees {
            180 => Some(Self::C2),
            120 => Some(Self::C3),
            90 => Some(Self::C4),
            72 => Some(Self::C5),
            60 => Some(Self::C6),
            45 => Some(Self::C8),
            30 => Some(Self::C12),
            _ => None,
        }
    }

    /// Whether the token names a dihedral group
    pub fn is_dihedral(self) -> bool {
        self.token().contains('D')
    }
}

impl fmt::Display for SymmetryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Branch angle and length-ratio estimates for tree-like images
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branching {
    /// Branch angles in degrees
    pub angles: Vec<f64>,
    /// Child/parent branch length ratios
    pub ratios: Vec<f64>,
}

impl Branching {
    /// Whether any branch structure was found
    pub fn is_tree_like(&self) -> bool {
        !self.angles.is_empty()
    }
}

/// Numeric and categorical description of the pattern in one image
///
/// Created once per measured raster and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvariantVector {
    /// Box-counting dimension in `[0, 3]`
    pub dimensionality: f64,
    /// Occupied foreground area at successive box sizes
    #[serde(default)]
    pub scales: Vec<f64>,
    /// Number of 8-connected foreground components
    pub connectivity: usize,
    /// Mean normalized autocorrelation in `[0, 1]`
    pub repetition_score: f64,
    /// Best-matching symmetry class
    pub symmetry_approx: SymmetryClass,
    /// Branching estimates, empty when not tree-like
    pub branching: Branching,
}
