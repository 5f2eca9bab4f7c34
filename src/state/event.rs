use super::model::ExportPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportEvent {
    Request,
    Settled,
    /// Rasterization settled, successfully or not.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: ExportPhase,
    pub event: ExportEvent,
    pub to: ExportPhase,
}

impl StateTransition {
    pub const fn new(from: ExportPhase, event: ExportEvent, to: ExportPhase) -> Self {
        Self { from, event, to }
    }
}
