//! # Description
//! - behavioural model of the max-pooling stage
//! - padded positions are skipped, so they never win a window
//! - a window made only of padding yields zero
//! - element width is unchanged, each pooled value is latched through a functional unit
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
use crate::error::Result;

#[derive(Debug)]
pub struct MaxPoolStage {
    input_shape: MapShape,
    output_shape: MapShape,
    win_rows: usize,
    win_cols: usize,
    pad: usize,
    stride: usize,
    lanes: Vec<FunctionalUnit>,
    output: BitVector,
}

impl MaxPoolStage {
    pub fn new(geometry: &AcceleratorGeometry) -> Result<Self> {
        let output_shape = geometry.pool_out_shape()?;
        Ok(MaxPoolStage {
            input_shape: geometry.conv_out_shape()?,
            output_shape,
            win_rows: geometry.pool_win_rows,
            win_cols: geometry.pool_win_cols,
            pad: geometry.pool_pad,
            stride: geometry.pool_stride,
            lanes: vec![FunctionalUnit::new(); output_shape.num_elements()],
            output: BitVector::zeros(output_shape.bit_len()),
        })
    }

    pub fn output_shape(&self) -> &MapShape {
        &self.output_shape
    }

    pub fn pool(&self, input: &FeatureMap) -> Vec<Element> {
        (0..self.output_shape.rows)
            .cartesian_product(0..self.output_shape.cols)
            .map(|(out_row, out_col)| {
                (0..self.win_rows)
                    .cartesian_product(0..self.win_cols)
                    .filter_map(|(wr, wc)| {
                        let row = (out_row * self.stride + wr).checked_sub(self.pad)?;
                        let col = (out_col * self.stride + wc).checked_sub(self.pad)?;
                        if row >= self.input_shape.rows || col >= self.input_shape.cols {
                            return None;
                        }
                        Some(input.get(row, col))
                    })
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

impl Component for MaxPoolStage {
    type Input = BitVector;
    type Output = BitVector;

    fn cycle(&mut self, control: StageControl, input: &BitVector) -> Result<()> {
        let input = unpack(input, &self.input_shape)?;
        debug!(
            "pooling: clear:{} compute:{} output:{}",
            control.clear, control.phase.compute, control.phase.output
        );
        let computed = self.pool(&input);
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
