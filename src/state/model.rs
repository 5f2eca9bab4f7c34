/// Where the single in-flight export currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportPhase {
    #[default]
    Idle,
    /// Waiting out the layout settle delay.
    Settling,
    Rasterizing,
}

impl ExportPhase {
    pub const fn is_busy(self) -> bool {
        !matches!(self, Self::Idle)
    }
}
