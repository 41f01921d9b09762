//! # Description
//! - the compute-and-hold cell every stage replicates, one per output element
//! - X holds the value computed by the lane, Y is the value the lane shows downstream
//! - the next (X, Y) is a pure function of the current (X, Y), the stage control and the lane's
//!   own input, the new registers only replace the old ones when the caller commits them
//!
//! | clear | compute | output | next X     | next Y |
//! |-------|---------|--------|------------|--------|
//! | 1     | -       | -      | 0          | 0      |
//! | 0     | 0       | 0      | X          | Y      |
//! | 0     | 0       | 1      | X          | X      |
//! | 0     | 1       | 0      | computed   | Y      |
//! | 0     | 1       | 1      | computed   | X      |
//!
//! in the last row Y gets the X from *before* the tick, not the value just computed.

use serde::Serialize;

use super::{
    control::StageControl,
    element::{relu, Element},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct FunctionalUnit {
    pub x: Element,
    pub y: Element,
}

impl FunctionalUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Description
    /// - the register transition for an arbitrary `computed` value
    /// - the convolution and pooling lanes use this directly
    pub fn latch(&self, control: StageControl, computed: Element) -> FunctionalUnit {
        if control.clear {
            return FunctionalUnit { x: 0, y: 0 };
        }
        let x = if control.phase.compute { computed } else { self.x };
        // read before write: Y sees the X held at the start of this tick
        let y = if control.phase.output { self.x } else { self.y };
        FunctionalUnit { x, y }
    }

    /// # Description
    /// - the ReLU lane: X <- max(input, 0) when compute is enabled
    ///
    /// # Example
    /// ```
    /// use cnn_accel::accelerator::{EnablePhase, FunctionalUnit, StageControl};
    /// let unit = FunctionalUnit::new();
    /// let unit = unit.next(StageControl::run(EnablePhase::COMPUTE), -5);
    /// assert_eq!((unit.x, unit.y), (0, 0));
    /// let unit = unit.next(StageControl::run(EnablePhase::BOTH), 7);
    /// assert_eq!((unit.x, unit.y), (7, 0));
    /// let unit = unit.next(StageControl::run(EnablePhase::OUTPUT), 0);
    /// assert_eq!((unit.x, unit.y), (7, 7));
    /// ```
    pub fn next(&self, control: StageControl, input: Element) -> FunctionalUnit {
        self.latch(control, relu(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accelerator::{control::EnablePhase, element::ElementWidth};
    use crate::error::Result;
    use itertools::iproduct;

    fn representative_inputs(width: &ElementWidth) -> Vec<Element> {
        vec![0, width.min(), width.max(), -1, 1, width.wrap(-3), width.wrap(5)]
    }

    #[test]
    fn test_enable_table() -> Result<()> {
        for bits in [1u32, 2, 4, 8, 16, 32, 64] {
            let width = ElementWidth::new(bits)?;
            let values = representative_inputs(&width);
            for (&x, &y, &input, phase) in
                iproduct!(values.iter(), values.iter(), values.iter(), EnablePhase::all())
            {
                let unit = FunctionalUnit { x, y };
                let next = unit.next(StageControl::run(phase), input);
                let computed = if input < 0 { 0 } else { input };
                let expected = match (phase.compute, phase.output) {
                    (false, false) => (x, y),
                    (false, true) => (x, x),
                    (true, false) => (computed, y),
                    (true, true) => (computed, x),
                };
                assert_eq!((next.x, next.y), expected, "w={} phase={:?}", bits, phase);
            }
        }
        Ok(())
    }

    #[test]
    fn test_clear_dominates() {
        let states = [
            FunctionalUnit { x: 0, y: 0 },
            FunctionalUnit { x: 9, y: -3 },
            FunctionalUnit { x: i64::MAX, y: i64::MIN },
        ];
        for (unit, phase, input) in iproduct!(states, EnablePhase::all(), [-7i64, 0, 7]) {
            let next = unit.next(StageControl::new(true, phase), input);
            assert_eq!(next, FunctionalUnit { x: 0, y: 0 });
        }
    }

    #[test]
    fn test_negative_clamp() -> Result<()> {
        let width = ElementWidth::new(8)?;
        for input in width.min()..=width.max() {
            let next = FunctionalUnit::new().next(StageControl::run(EnablePhase::COMPUTE), input);
            if input < 0 {
                assert_eq!(next.x, 0);
            } else {
                assert_eq!(next.x, input);
            }
            assert_eq!(next.y, 0);
        }
        Ok(())
    }

    #[test]
    fn test_hold_for_many_cycles() {
        let mut unit = FunctionalUnit::new().next(StageControl::run(EnablePhase::COMPUTE), 42);
        for _ in 0..10 {
            unit = unit.next(StageControl::run(EnablePhase::IDLE), -1);
        }
        assert_eq!((unit.x, unit.y), (42, 0));
        unit = unit.next(StageControl::run(EnablePhase::OUTPUT), -1);
        assert_eq!((unit.x, unit.y), (42, 42));
    }

    #[test]
    fn test_latch_arbitrary_value() {
        let unit = FunctionalUnit::new().latch(StageControl::run(EnablePhase::COMPUTE), -12);
        assert_eq!(unit.x, -12);
    }
}
