//! Tests for the convergence controller's stages and listeners

pub mod record;

#[cfg(test)]
mod tests {
    use fractal_observer::engine::{CycleListener, RunResult, SilentListener, Stage};

    // Tests stage names as shown on the progress bar
    // Verified by using the Debug representation
    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Discovery.to_string(), "discovery");
        assert_eq!(Stage::Embodiment.to_string(), "embodiment");
        assert_eq!(Stage::Validation.to_string(), "validation");
    }

    // Tests the silent listener accepts every event
    // Verified by panicking in the default methods
    #[test]
    fn test_silent_listener() {
        let mut listener = SilentListener;
        listener.stage_started(1, 3, Stage::Discovery);
        listener.run_finished(&RunResult::new());
    }
}
