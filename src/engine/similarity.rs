//! Formula similarity used as the convergence criterion

/// Collapse runs of whitespace to single spaces and trim the ends
pub fn normalize(formula: &str) -> String {
    formula.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 1.0 when the formulas are identical after normalization, otherwise 0.0
pub fn similarity(previous: &str, current: &str) -> f64 {
    if normalize(previous) == normalize(current) {
        1.0
    } else {
        0.0
    }
}
