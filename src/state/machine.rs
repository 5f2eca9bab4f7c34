use super::error::{StateError, StateResult};
use super::{ExportEvent, ExportPhase, StateTransition};

#[derive(Debug, Default)]
pub struct ExportStateMachine {
    phase: ExportPhase,
    transition_history: Vec<StateTransition>,
}

impl ExportStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ExportPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    pub fn can_transition(&self, event: ExportEvent) -> bool {
        self.next_phase(event).is_some()
    }

    pub fn next_phase(&self, event: ExportEvent) -> Option<ExportPhase> {
        use ExportEvent::*;
        match (self.phase, event) {
            (ExportPhase::Idle, Request) => Some(ExportPhase::Settling),
            (ExportPhase::Settling, Settled) => Some(ExportPhase::Rasterizing),
            (ExportPhase::Settling, Finished) => Some(ExportPhase::Idle),
            (ExportPhase::Rasterizing, Finished) => Some(ExportPhase::Idle),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: ExportEvent) -> StateResult<ExportPhase> {
        tracing::debug!(from = ?self.phase, event = ?event, "request export transition");
        let next = self.next_phase(event).ok_or_else(|| {
            let from = self.phase;
            tracing::warn!(from = ?from, event = ?event, "invalid export transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        self.transition_history
            .push(StateTransition::new(self.phase, event, next));
        self.phase = next;
        Ok(self.phase)
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.transition_history
    }
}

impl std::fmt::Display for ExportStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExportPhase::{:?}", self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_transition_tracks_valid_and_invalid_events() {
        let mut machine = ExportStateMachine::new();
        assert!(machine.can_transition(ExportEvent::Request));
        assert!(!machine.can_transition(ExportEvent::Settled));
        assert!(!machine.can_transition(ExportEvent::Finished));

        machine
            .transition(ExportEvent::Request)
            .expect("idle -> settling should transition");

        assert!(machine.is_busy());
        assert!(machine.can_transition(ExportEvent::Settled));
        assert!(machine.can_transition(ExportEvent::Finished));
        assert!(!machine.can_transition(ExportEvent::Request));
    }

    #[test]
    fn full_export_cycle_records_ordered_history() {
        let mut machine = ExportStateMachine::new();
        machine
            .transition(ExportEvent::Request)
            .expect("request should work");
        machine
            .transition(ExportEvent::Settled)
            .expect("settled should work");
        machine
            .transition(ExportEvent::Finished)
            .expect("finished should work");

        assert_eq!(machine.phase(), ExportPhase::Idle);
        assert_eq!(
            machine.history(),
            &[
                StateTransition::new(
                    ExportPhase::Idle,
                    ExportEvent::Request,
                    ExportPhase::Settling
                ),
                StateTransition::new(
                    ExportPhase::Settling,
                    ExportEvent::Settled,
                    ExportPhase::Rasterizing
                ),
                StateTransition::new(
                    ExportPhase::Rasterizing,
                    ExportEvent::Finished,
                    ExportPhase::Idle
                ),
            ]
        );
    }

    #[test]
    fn second_request_while_busy_is_rejected_without_mutating_history() {
        let mut machine = ExportStateMachine::new();
        machine
            .transition(ExportEvent::Request)
            .expect("first request should work");

        let err = machine
            .transition(ExportEvent::Request)
            .expect_err("request while settling should fail");
        assert!(matches!(
            err,
            StateError::InvalidStateTransition {
                from: ExportPhase::Settling,
                event: ExportEvent::Request
            }
        ));
        assert_eq!(machine.phase(), ExportPhase::Settling);
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn finishing_before_rasterization_returns_to_idle() {
        let mut machine = ExportStateMachine::new();
        machine
            .transition(ExportEvent::Request)
            .expect("request should work");
        machine
            .transition(ExportEvent::Finished)
            .expect("finish from settling should work");
        assert!(!machine.is_busy());
    }
}
