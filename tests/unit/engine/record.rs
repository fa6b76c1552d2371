//! Tests for run records and the report's JSON shape

#[cfg(test)]
mod tests {
    use fractal_observer::ObserverError;
    use fractal_observer::engine::{FormulaRecord, RunResult, RunStatus};
    use fractal_observer::measure::{Branching, InvariantVector, SymmetryClass};
    use serde_json::Value;
    use std::path::PathBuf;

    fn vector() -> InvariantVector {
        InvariantVector {
            dimensionality: 0.0,
            scales: vec![0.0, 0.0, 0.0],
            connectivity: 0,
            repetition_score: 0.0,
            symmetry_approx: SymmetryClass::C12,
            branching: Branching::default(),
        }
    }

    fn to_json(result: &RunResult) -> Value {
        serde_json::to_value(result).unwrap_or_default()
    }

    // Tests a fresh result is an empty failure
    // Verified by defaulting to success
    #[test]
    fn test_new_result() {
        let result = RunResult::new();
        assert_eq!(result.status, RunStatus::Failure);
        assert!(result.formula.is_none());
        assert_eq!(result.attempts, 0);
        assert!(result.history.is_empty());
        assert_eq!(RunResult::default(), result);
    }

    // Tests success records formula and attempt count
    // Verified by leaving attempts untouched
    #[test]
    fn test_succeed() {
        let mut result = RunResult::new();
        result.push(FormulaRecord::discovery("F".to_owned(), vector()));
        result.succeed("F".to_owned(), 1);

        assert!(result.is_success());
        assert_eq!(result.formula.as_deref(), Some("F"));
        assert_eq!(result.attempts, 1);
        assert_eq!(result.last().map(|r| r.attempt), Some(1));
    }

    // Tests exhaustion reports the budget and clears the formula
    // Verified by reporting history length
    #[test]
    fn test_exhaust() {
        let mut result = RunResult::new();
        result.push(FormulaRecord::discovery("F".to_owned(), vector()));
        result.exhaust(3);
        assert_eq!(result.status, RunStatus::Failure);
        assert_eq!(result.attempts, 3);
        assert!(result.formula.is_none());
    }

    // Tests aborting records the message and attempts so far
    // Verified by dropping the error text
    #[test]
    fn test_abort() {
        let mut result = RunResult::new();
        result.push(FormulaRecord::discovery("F".to_owned(), vector()));
        result.succeed("F".to_owned(), 1);
        result.abort(&ObserverError::InvalidImage {
            reason: "broken".to_owned(),
        });

        assert!(!result.is_success());
        assert!(result.formula.is_none());
        assert_eq!(result.attempts, 1);
        assert!(result.error.as_deref().is_some_and(|e| e.contains("broken")));
    }

    // Tests status is lowercase and formula is null on failure
    // Verified by skipping a missing formula
    #[test]
    fn test_failure_json_shape() {
        let mut result = RunResult::new();
        result.exhaust(2);
        let json = to_json(&result);

        assert_eq!(json.get("status"), Some(&Value::from("failure")));
        assert_eq!(json.get("formula"), Some(&Value::Null));
        assert_eq!(json.get("attempts"), Some(&Value::from(2)));
        assert!(json.get("error").is_none());
        assert!(json.get("mmss_explanation").is_none());
    }

    // Tests optional fields appear under their report names
    // Verified by removing the explanation rename
    #[test]
    fn test_optional_fields_json_shape() {
        let mut result = RunResult::new();
        result.push(FormulaRecord {
            attempt: 2,
            formula: "F".to_owned(),
            invariants: vector(),
            visualization: Some(PathBuf::from("out/attempt_2.html")),
            similarity_score: Some(1.0),
        });
        result.succeed("F".to_owned(), 2);
        result.explanation = Some("because".to_owned());
        let json = to_json(&result);

        assert_eq!(json.get("status"), Some(&Value::from("success")));
        assert_eq!(json.get("mmss_explanation"), Some(&Value::from("because")));
        let record = json.get("history").and_then(|h| h.get(0));
        assert_eq!(
            record.and_then(|r| r.get("visualization")),
            Some(&Value::from("out/attempt_2.html"))
        );
        assert_eq!(record.and_then(|r| r.get("similarity_score")), Some(&Value::from(1.0)));
    }

    // Tests discovery records omit comparison fields
    // Verified by serializing null similarity
    #[test]
    fn test_discovery_record_json_shape() {
        let record = FormulaRecord::discovery("F".to_owned(), vector());
        let json = serde_json::to_value(&record).unwrap_or_default();
        assert_eq!(json.get("attempt"), Some(&Value::from(1)));
        assert!(json.get("similarity_score").is_none());
        assert!(json.get("visualization").is_none());
        assert!(json.get("invariants").is_some());
    }

    // Tests a written report parses back unchanged
    // Verified by omitting the serde default on error
    #[test]
    fn test_report_round_trip() {
        let mut result = RunResult::new();
        result.push(FormulaRecord::discovery("F".to_owned(), vector()));
        result.succeed("F".to_owned(), 1);

        let text = serde_json::to_string_pretty(&result).unwrap_or_default();
        let parsed: Result<RunResult, _> = serde_json::from_str(&text);
        let Ok(parsed) = parsed else {
            panic!("report should parse");
        };
        assert_eq!(parsed, result);
        assert_eq!(parsed.history.len(), parsed.attempts);
    }
}
