//! Closed set of formula families and their canonical formula strings

use crate::measure::InvariantVector;
use std::fmt;

/// Generative rule families the classifier can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormulaFamily {
    /// Sierpinski triangle as a three-map IFS
    Sierpinski,
    /// Koch curve as an L-system
    Koch,
    /// Julia/Mandelbrot escape-time set
    Julia,
    /// Heighway dragon curve
    Dragon,
    /// Branching tree/leaf L-system
    Tree,
    /// Menger sponge IFS
    Menger,
    /// Elementary one-dimensional cellular automaton
    Automaton,
    /// Logarithmic spiral
    Spiral,
    /// Newton-basin algebraic fractal
    Algebraic,
    /// Middle-thirds Cantor set
    Cantor,
    /// No rule matched
    Unknown,
}

impl FormulaFamily {
    /// Every family, in rule priority order with the fallback last
    pub const ALL: [Self; 11] = [
        Self::Sierpinski,
        Self::Koch,
        Self::Julia,
        Self::Dragon,
        Self::Tree,
        Self::Menger,
        Self::Automaton,
        Self::Spiral,
        Self::Algebraic,
        Self::Cantor,
        Self::Unknown,
    ];

    /// Fixed formula text; `None` for [`FormulaFamily::Unknown`], whose text depends on the invariants
    pub const fn canonical_formula(self) -> Option<&'static str> {
        match self {
            Self::Sierpinski => Some(
                "IFS_Sierpinski: f1(x,y)=(x/2, y/2), f2(x,y)=(x/2+1/2, y/2), \
                 f3(x,y)=(x/2+1/4, y/2+sqrt(3)/4)",
            ),
            Self::Koch => Some("LSystem_Koch: axiom=F, F -> F+F--F+F, angle=60"),
            Self::Julia => Some("Julia_Set: z(n+1) = z(n)^2 + c, c = -0.8+0.156i, |z| <= 2"),
            Self::Dragon => Some("Dragon_Curve: axiom=FX, X -> X+YF+, Y -> -FX-Y, angle=90"),
            Self::Tree => Some(
                "LSystem_Tree: axiom=X, X -> F+[[X]-X]-F[-FX]+X, F -> FF, angle=25",
            ),
            Self::Menger => Some(
                "Menger_Sponge: f_i(p) = p/3 + t_i, t_i in {0,1/3,2/3}^3, \
                 at most one coordinate of t_i equal to 1/3 (20 maps)",
            ),
            Self::Automaton => Some(
                "Cellular_Automaton_1D: x(t+1,i) = x(t,i-1) XOR x(t,i+1), rule=90",
            ),
            Self::Spiral => Some("Logarithmic_Spiral: r(theta) = a*exp(b*theta), b = 0.1759"),
            Self::Algebraic => Some("Newton_Fractal: z(n+1) = z(n) - (z(n)^3 - 1)/(3*z(n)^2)"),
            Self::Cantor => Some("Cantor_Set: C(n+1) = C(n)/3 U (2/3 + C(n)/3), C(0) = [0,1]"),
            Self::Unknown => None,
        }
    }

    /// Identifier used for visualization scripts and logs
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sierpinski => "sierpinski",
            Self::Koch => "koch",
            Self::Julia => "julia",
            Self::Dragon => "dragon",
            Self::Tree => "tree",
            Self::Menger => "menger",
            Self::Automaton => "automaton",
            Self::Spiral => "spiral",
            Self::Algebraic => "algebraic",
            Self::Cantor => "cantor",
            Self::Unknown => "unknown",
        }
    }

    /// Formula text for this family given the invariants that selected it
    pub fn formula(self, invariants: &InvariantVector) -> String {
        self.canonical_formula()
            .map_or_else(|| unknown_formula(invariants), str::to_string)
    }
}

impl fmt::Display for FormulaFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Descriptive fallback embedding the measured values
pub fn unknown_formula(invariants: &InvariantVector) -> String {
    format!(
        "Unknown_fractal: dimensionality={:.3}, symmetry={}, repetition={:.3}",
        invariants.dimensionality, invariants.symmetry_approx, invariants.repetition_score
    )
}
