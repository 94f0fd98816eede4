use display_json::DebugAsJson;

/// Indicates how an engine execution finished.
#[derive(DebugAsJson, strum::Display, Clone, PartialEq, Eq, fake::Dummy, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionResult {
    /// Finished normally (RETURN opcode).
    #[strum(to_string = "success")]
    Success,

    /// Execution finished with a reversion (REVERT opcode).
    #[strum(to_string = "reverted")]
    Reverted,

    /// Execution did not finish.
    #[strum(to_string = "halted")]
    Halted { reason: String },
}

impl ExecutionResult {
    /// Checks if the execution was completed normally.
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success)
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gen_test_serde;

    gen_test_serde!(ExecutionResult);

    #[test]
    fn execution_result_success_check() {
        assert!(ExecutionResult::Success.is_success());
        assert!(!ExecutionResult::Reverted.is_success());
        assert!(!ExecutionResult::Halted { reason: "out of gas".to_owned() }.is_success());
    }
}
