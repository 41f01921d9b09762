use super::control::StageControl;
use crate::error::Result;

/// # Description
/// - a clocked block of the accelerator
/// - `cycle` advances the block by exactly one tick. the input is the upstream output as it was
///   before this tick, so calling order between components never leaks same-tick values
pub trait Component {
    type Input: ?Sized;
    type Output: ?Sized;

    fn cycle(&mut self, control: StageControl, input: &Self::Input) -> Result<()>;

    /// the externally visible registers
    fn output(&self) -> &Self::Output;
}
