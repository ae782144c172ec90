//! Pipeline stage state machine

use std::fmt;

/// Stages of one pipeline invocation.
///
/// Control flow is strictly linear; `Failed` is absorbing and reachable
/// from every non-terminal state. `Done` and `Failed` have no outgoing
/// transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PipelineStage {
    #[default]
    Idle,
    Retrieving,
    Composing,
    Generating,
    Summarizing,
    Synthesizing,
    Done,
    Failed,
}

impl PipelineStage {
    /// Next stage in the linear flow, if any.
    pub fn next(&self) -> Option<PipelineStage> {
        use PipelineStage::*;
        match self {
            Idle => Some(Retrieving),
            Retrieving => Some(Composing),
            Composing => Some(Generating),
            Generating => Some(Summarizing),
            Summarizing => Some(Synthesizing),
            Synthesizing => Some(Done),
            Done | Failed => None,
        }
    }

    /// Whether the stage has no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Done | PipelineStage::Failed)
    }

    /// Check if a transition to `target` is allowed.
    pub fn can_transition_to(&self, target: PipelineStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        if target == PipelineStage::Failed {
            return true;
        }
        self.next() == Some(target)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Retrieving => "retrieving",
            PipelineStage::Composing => "composing",
            PipelineStage::Generating => "generating",
            PipelineStage::Summarizing => "summarizing",
            PipelineStage::Synthesizing => "synthesizing",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PipelineStage::*;

    #[test]
    fn test_linear_flow() {
        let mut stage = Idle;
        let expected = [Retrieving, Composing, Generating, Summarizing, Synthesizing, Done];
        for target in expected {
            assert!(stage.can_transition_to(target));
            stage = target;
        }
        assert!(stage.is_terminal());
    }

    #[test]
    fn test_failed_reachable_from_any_non_terminal() {
        for stage in [Idle, Retrieving, Composing, Generating, Summarizing, Synthesizing] {
            assert!(stage.can_transition_to(Failed));
        }
    }

    #[test]
    fn test_terminal_states_are_absorbing() {
        assert!(!Done.can_transition_to(Retrieving));
        assert!(!Failed.can_transition_to(Retrieving));
        assert!(!Failed.can_transition_to(Failed));
        assert!(Done.next().is_none());
    }

    #[test]
    fn test_no_stage_skipping() {
        assert!(!Retrieving.can_transition_to(Generating));
        assert!(!Idle.can_transition_to(Done));
    }
}
