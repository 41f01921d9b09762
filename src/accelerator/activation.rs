//! # Description
//! - the activation layer: one ReLU functional unit per feature map element
//! - every lane gets the same control on every tick and only ever reads its own element
//!
//! # Example
//! ```
//! use cnn_accel::accelerator::{
//!     pack_elements, unpack, ActivationLayer, Component, EnablePhase, MapShape, StageControl,
//! };
//! let mut layer = ActivationLayer::new(4, 2, 2).unwrap();
//! let shape = MapShape::new(4, 2, 2).unwrap();
//! let input = pack_elements(&[1, -2, 3, -4], &shape).unwrap();
//! layer.cycle(StageControl::run(EnablePhase::BOTH), &input).unwrap();
//! assert_eq!(unpack(layer.output(), &shape).unwrap().elements(), &[0, 0, 0, 0]);
//! layer.cycle(StageControl::run(EnablePhase::OUTPUT), &input).unwrap();
//! assert_eq!(unpack(layer.output(), &shape).unwrap().elements(), &[1, 0, 3, 0]);
//! ```

use log::debug;

use super::{
    bit_vector::BitVector,
    component::Component,
    control::StageControl,
    feature_map::{FeatureMap, MapShape},
    functional_unit::FunctionalUnit,
    marshal::{pack, unpack},
};
use crate::error::Result;

#[derive(Debug)]
pub struct ActivationLayer {
    shape: MapShape,
    lanes: Vec<FunctionalUnit>,
    output: BitVector,
}

impl ActivationLayer {
    pub fn new(width: u32, rows: usize, cols: usize) -> Result<Self> {
        Ok(Self::with_shape(MapShape::new(width, rows, cols)?))
    }

    pub fn with_shape(shape: MapShape) -> Self {
        ActivationLayer {
            shape,
            lanes: vec![FunctionalUnit::new(); shape.num_elements()],
            output: BitVector::zeros(shape.bit_len()),
        }
    }

    pub fn shape(&self) -> &MapShape {
        &self.shape
    }

    pub fn lanes(&self) -> &[FunctionalUnit] {
        &self.lanes
    }

    /// the Y registers as a grid
    pub fn output_map(&self) -> Result<FeatureMap> {
        FeatureMap::from_elements(self.shape, self.lanes.iter().map(|l| l.y).collect())
    }
}

impl Component for ActivationLayer {
    type Input = BitVector;
    type Output = BitVector;

    /// # Description
    /// - unpack the input, compute every lane's next registers, then commit them all
    /// - the input is checked against the layer shape before any lane changes
    fn cycle(&mut self, control: StageControl, input: &BitVector) -> Result<()> {
        let input = unpack(input, &self.shape)?;
        debug!(
            "activation: clear:{} compute:{} output:{}",
            control.clear, control.phase.compute, control.phase.output
        );
        let next: Vec<FunctionalUnit> = self
            .lanes
            .iter()
            .zip(input.elements())
            .map(|(lane, &value)| lane.next(control, value))
            .collect();
        self.lanes = next;
        self.output = pack(&self.output_map()?);
        Ok(())
    }

    fn output(&self) -> &BitVector {
        &self.output
    }
}
