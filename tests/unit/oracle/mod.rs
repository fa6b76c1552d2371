//! Tests for the explanation policy and the degrading explain step

pub mod mistral;

#[cfg(test)]
mod tests {
    use fractal_observer::ObserverError;
    use fractal_observer::io::error::Result;
    use fractal_observer::measure::{Branching, InvariantVector, SymmetryClass};
    use fractal_observer::oracle::{
        DEFAULT_PROMPT_TEMPLATE, ERROR_PREFIX, ExplanationOracle, ExplanationPolicy, explain,
        strip_code_fences,
    };
    use std::cell::RefCell;

    struct Scripted {
        reply: Option<String>,
        prompts: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn answering(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_owned()),
                prompts: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl ExplanationOracle for Scripted {
        fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.borrow_mut().push(prompt.to_owned());
            self.reply.clone().ok_or_else(|| ObserverError::Oracle {
                reason: "service unavailable".to_owned(),
            })
        }
    }

    fn invariants() -> InvariantVector {
        InvariantVector {
            dimensionality: 1.585,
            scales: vec![0.2, 0.1, 0.05],
            connectivity: 1,
            repetition_score: 0.9,
            symmetry_approx: SymmetryClass::C3,
            branching: Branching::default(),
        }
    }

    fn enabled() -> ExplanationPolicy {
        ExplanationPolicy {
            generate_explanation: true,
            ..ExplanationPolicy::default()
        }
    }

    // Tests the default template carries both placeholders
    // Verified by removing the formula placeholder
    #[test]
    fn test_default_template() {
        assert!(DEFAULT_PROMPT_TEMPLATE.contains("{invariants}"));
        assert!(DEFAULT_PROMPT_TEMPLATE.contains("{formula}"));
        assert!(!ExplanationPolicy::default().generate_explanation);
    }

    // Tests prompt rendering substitutes formula and invariants
    // Verified by substituting only the first placeholder
    #[test]
    fn test_render_prompt() {
        let policy = ExplanationPolicy {
            prompt_template: "F={formula} I={invariants}".to_owned(),
            ..enabled()
        };
        let prompt = policy.render_prompt(&invariants(), "Sierpinski");
        assert!(prompt.starts_with("F=Sierpinski I="));
        assert!(prompt.contains("\"dimensionality\""));
        assert!(prompt.contains("1.585"));
        assert!(!prompt.contains("{formula}"));
    }

    // Tests the oracle answer is trimmed and returned
    // Verified by returning the raw answer
    #[test]
    fn test_explain_success() {
        let oracle = Scripted::answering("  Self-similar in three copies.\n");
        let text = explain(Some(&oracle), &invariants(), "Sierpinski", &enabled());
        assert_eq!(text, "Self-similar in three copies.");
        assert_eq!(oracle.prompts.borrow().len(), 1);
    }

    // Tests failures become prefixed error text
    // Verified by propagating the oracle error
    #[test]
    fn test_explain_failure() {
        let oracle = Scripted::failing();
        let text = explain(Some(&oracle), &invariants(), "Sierpinski", &enabled());
        assert!(text.starts_with(ERROR_PREFIX));
        assert!(text.contains("service unavailable"));
    }

    // Tests nothing is requested when disabled or unavailable
    // Verified by ignoring the policy switch
    #[test]
    fn test_explain_disabled() {
        let oracle = Scripted::answering("unused");
        let text = explain(
            Some(&oracle),
            &invariants(),
            "Sierpinski",
            &ExplanationPolicy::default(),
        );
        assert!(text.is_empty());
        assert!(oracle.prompts.borrow().is_empty());

        assert!(explain(None, &invariants(), "Sierpinski", &enabled()).is_empty());
    }

    // Tests fenced answers are unwrapped
    // Verified by keeping the info string
    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("plain answer"), "plain answer");
        assert_eq!(strip_code_fences("```\nbody\n```"), "body");
        assert_eq!(strip_code_fences("  ```markdown\nline one\nline two\n```  "), "line one\nline two");
        assert_eq!(strip_code_fences("```"), "");
        assert_eq!(strip_code_fences("```text\nunterminated"), "unterminated");
    }
}
