//! # Description
//! - behavioural model of the convolution stage
//! - single channel, zero padding, one multiply-accumulate result per output element
//! - the exact MAC sum is truncated to the output width, then latched through the same
//!   compute-and-hold cell as the activation lanes
//! - only the boundary matters here: input (R, C) at W bits in, (ConvOutRows, ConvOutCols) at
//!   2W+2 bits out
//!

use itertools::Itertools;
use log::debug;

use super::{
    bit_vector::BitVector,
    component::Component,
    control::StageControl,
    element::Element,
    feature_map::{FeatureMap, MapShape},
    functional_unit::FunctionalUnit,
    geometry::AcceleratorGeometry,
    marshal::{pack, unpack},
};
use crate::error::{AccelError, Result};

#[derive(Debug)]
pub struct ConvolutionStage {
    input_shape: MapShape,
    output_shape: MapShape,
    filter_rows: usize,
    filter_cols: usize,
    pad: usize,
    stride: usize,
    weights: Vec<Element>,
    lanes: Vec<FunctionalUnit>,
    output: BitVector,
}

impl ConvolutionStage {
    /// # Description
    /// - weights are row-major and must fit in the input element width
    pub fn new(geometry: &AcceleratorGeometry, weights: &[Element]) -> Result<Self> {
        let input_shape = geometry.input_shape()?;
        let output_shape = geometry.conv_out_shape()?;
        if weights.len() != geometry.filter_rows * geometry.filter_cols {
            return Err(AccelError::ShapeMismatch {
                expected: geometry.filter_rows * geometry.filter_cols,
                found: weights.len(),
            });
        }
        if let Some((index, &value)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !input_shape.width.contains(**w))
        {
            return Err(AccelError::ElementOutOfRange {
                index,
                value,
                width: input_shape.width.bits(),
            });
        }
        Ok(ConvolutionStage {
            input_shape,
            output_shape,
            filter_rows: geometry.filter_rows,
            filter_cols: geometry.filter_cols,
            pad: geometry.conv_pad,
            stride: geometry.conv_stride,
            weights: weights.to_vec(),
            lanes: vec![FunctionalUnit::new(); output_shape.num_elements()],
            output: BitVector::zeros(output_shape.bit_len()),
        })
    }

    pub fn output_shape(&self) -> &MapShape {
        &self.output_shape
    }

    /// # Description
    /// - the combinational result for every output element, not latched
    /// - padded positions contribute zero
    pub fn convolve(&self, input: &FeatureMap) -> Vec<Element> {
        (0..self.output_shape.rows)
            .cartesian_product(0..self.output_shape.cols)
            .map(|(out_row, out_col)| {
                let sum: i128 = (0..self.filter_rows)
                    .cartesian_product(0..self.filter_cols)
                    .filter_map(|(fr, fc)| {
                        let row = (out_row * self.stride + fr).checked_sub(self.pad)?;
                        let col = (out_col * self.stride + fc).checked_sub(self.pad)?;
                        if row >= self.input_shape.rows || col >= self.input_shape.cols {
                            return None;
                        }
                        let weight = self.weights[fr * self.filter_cols + fc];
                        Some(input.get(row, col) as i128 * weight as i128)
                    })
                    .sum();
                self.output_shape.width.wrap(sum)
            })
            .collect()
    }
}

impl Component for ConvolutionStage {
    type Input = BitVector;
    type Output = BitVector;

    fn cycle(&mut self, control: StageControl, input: &BitVector) -> Result<()> {
        let input = unpack(input, &self.input_shape)?;
        debug!(
            "convolution: clear:{} compute:{} output:{}",
            control.clear, control.phase.compute, control.phase.output
        );
        let computed = self.convolve(&input);
        self.lanes = self
            .lanes
            .iter()
            .zip(computed)
            .map(|(lane, value)| lane.latch(control, value))
            .collect();
        let visible = self.lanes.iter().map(|l| l.y).collect();
        self.output = pack(&FeatureMap::from_elements(self.output_shape, visible)?);
        Ok(())
    }

    fn output(&self) -> &BitVector {
        &self.output
    }
}
