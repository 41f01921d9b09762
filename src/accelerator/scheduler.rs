//! # Description
//! - a minimal pipeline controller that flushes one input through all three stages per pass
//! - a pass is seven ticks: clear, then compute and output for conv, activation and pool
//! - the pooled result is visible right after the pool output tick
//!

use enum_as_inner::EnumAsInner;

use super::control::{EnablePhase, PipelineControl};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    Conv,
    Activation,
    Pool,
}

impl StageId {
    fn next(&self) -> Option<StageId> {
        match self {
            StageId::Conv => Some(StageId::Activation),
            StageId::Activation => Some(StageId::Pool),
            StageId::Pool => None,
        }
    }
}

/// # Description
/// the state for the scheduler
/// * `Clear` the first tick of a pass, zero every register
/// * `Compute` the stage latches its combinational result into X
/// * `Output` the stage commits X to Y
/// * `Done` every pass is finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumAsInner)]
pub enum PassPhase {
    Clear,
    Compute(StageId),
    Output(StageId),
    Done,
}

#[derive(Debug)]
pub struct PassScheduler {
    phase: PassPhase,
    remaining_passes: usize,
}

impl PassScheduler {
    pub fn new(passes: usize) -> Self {
        PassScheduler {
            phase: if passes == 0 {
                PassPhase::Done
            } else {
                PassPhase::Clear
            },
            remaining_passes: passes,
        }
    }

    pub fn phase(&self) -> PassPhase {
        self.phase
    }

    pub fn finished(&self) -> bool {
        self.phase == PassPhase::Done
    }

    /// the control lines for the current tick
    pub fn control(&self) -> PipelineControl {
        let mut control = PipelineControl::default();
        let (stage, phase) = match self.phase {
            PassPhase::Clear => return PipelineControl::clear(),
            PassPhase::Done => return control,
            PassPhase::Compute(stage) => (stage, EnablePhase::COMPUTE),
            PassPhase::Output(stage) => (stage, EnablePhase::OUTPUT),
        };
        match stage {
            StageId::Conv => control.conv = phase,
            StageId::Activation => control.activation = phase,
            StageId::Pool => control.pool = phase,
        }
        control
    }

    /// # Description
    /// - move to the next tick
    /// - returns true when the tick that just ran finished a pass
    pub fn advance(&mut self) -> bool {
        let (next, pass_done) = match self.phase {
            PassPhase::Clear => (PassPhase::Compute(StageId::Conv), false),
            PassPhase::Compute(stage) => (PassPhase::Output(stage), false),
            PassPhase::Output(stage) => match stage.next() {
                Some(next_stage) => (PassPhase::Compute(next_stage), false),
                None => {
                    self.remaining_passes -= 1;
                    if self.remaining_passes == 0 {
                        (PassPhase::Done, true)
                    } else {
                        (PassPhase::Clear, true)
                    }
                }
            },
            PassPhase::Done => (PassPhase::Done, false),
        };
        self.phase = next;
        pass_done
    }
}
