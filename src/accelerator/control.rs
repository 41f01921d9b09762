//! the control surface of a stage: a shared synchronous clear and two enable lines
//!

use serde::Serialize;

/// # Description
/// - the 2-bit enable tuple broadcast to every lane of a stage
/// - `compute`: recompute the lane's held value X
/// - `output`: commit the held value X to the visible output Y
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct EnablePhase {
    pub compute: bool,
    pub output: bool,
}

impl EnablePhase {
    pub const IDLE: EnablePhase = EnablePhase::new(false, false);
    pub const COMPUTE: EnablePhase = EnablePhase::new(true, false);
    pub const OUTPUT: EnablePhase = EnablePhase::new(false, true);
    pub const BOTH: EnablePhase = EnablePhase::new(true, true);

    pub const fn new(compute: bool, output: bool) -> Self {
        EnablePhase { compute, output }
    }

    /// all four combinations, in `{compute, output}` bit order
    pub fn all() -> [EnablePhase; 4] {
        [Self::IDLE, Self::OUTPUT, Self::COMPUTE, Self::BOTH]
    }
}

/// what one stage sees on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct StageControl {
    pub clear: bool,
    pub phase: EnablePhase,
}

impl StageControl {
    pub const fn new(clear: bool, phase: EnablePhase) -> Self {
        StageControl { clear, phase }
    }
    pub const fn clear() -> Self {
        StageControl::new(true, EnablePhase::IDLE)
    }
    pub const fn run(phase: EnablePhase) -> Self {
        StageControl::new(false, phase)
    }
}

/// # Description
/// - the control of the whole pipeline for one tick
/// - clear is shared by all stages, each stage has its own enables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct PipelineControl {
    pub clear: bool,
    pub conv: EnablePhase,
    pub activation: EnablePhase,
    pub pool: EnablePhase,
}

impl PipelineControl {
    pub fn clear() -> Self {
        PipelineControl {
            clear: true,
            ..Default::default()
        }
    }
    pub fn conv(&self) -> StageControl {
        StageControl::new(self.clear, self.conv)
    }
    pub fn activation(&self) -> StageControl {
        StageControl::new(self.clear, self.activation)
    }
    pub fn pool(&self) -> StageControl {
        StageControl::new(self.clear, self.pool)
    }
}
