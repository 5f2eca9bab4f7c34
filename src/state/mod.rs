pub mod error;
pub mod event;
pub mod machine;
pub mod model;

pub use error::{StateError, StateResult};
pub use event::{ExportEvent, StateTransition};
pub use machine::ExportStateMachine;
pub use model::ExportPhase;
