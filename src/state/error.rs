use super::event::ExportEvent;
use super::model::ExportPhase;
use thiserror::Error;

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid export transition: from {from:?} using event {event:?}")]
    InvalidStateTransition {
        from: ExportPhase,
        event: ExportEvent,
    },
}
