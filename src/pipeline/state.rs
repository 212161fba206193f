//! Pipeline run states.

/// Stage of the current (or last) pipeline run.
///
/// `Idle → Resolving → Merging? → Trimming? → EffectApplying? → Completed`,
/// or `Failed` from any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PipelineState {
    Idle = 0,
    /// Validating the graph and decoding sources
    Resolving = 1,
    Merging = 2,
    Trimming = 3,
    EffectApplying = 4,
    Completed = 5,
    Failed = 6,
}

impl PipelineState {
    /// Whether a run is between `Resolving` and its terminal state.
    pub fn is_running(&self) -> bool {
        !matches!(
            self,
            PipelineState::Idle | PipelineState::Completed | PipelineState::Failed
        )
    }
}

impl From<u8> for PipelineState {
    fn from(value: u8) -> Self {
        match value {
            0 => PipelineState::Idle,
            1 => PipelineState::Resolving,
            2 => PipelineState::Merging,
            3 => PipelineState::Trimming,
            4 => PipelineState::EffectApplying,
            5 => PipelineState::Completed,
            _ => PipelineState::Failed,
        }
    }
}
