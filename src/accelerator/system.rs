use log::{debug, info};

use super::{
    activation::ActivationLayer,
    bit_vector::BitVector,
    component::Component,
    control::PipelineControl,
    convolution::ConvolutionStage,
    feature_map::FeatureMap,
    geometry::AcceleratorGeometry,
    marshal::{pack, unpack},
    pooling::MaxPoolStage,
    scheduler::PassScheduler,
};
use crate::error::{AccelError, Result};
use crate::settings::{AcceleratorSettings, SimulationSettings};
use crate::sim_result::{PassResult, SimStatistics};

/// # Description
/// - the accelerator top level: convolution -> activation -> pooling
/// - the stages are connected through flattened feature map buffers, each buffer is the
///   upstream stage's visible output register
/// - every stage sees the same clock and clear, each has its own pair of enables
#[derive(Debug)]
pub struct System {
    geometry: AcceleratorGeometry,
    conv: ConvolutionStage,
    activation: ActivationLayer,
    pool: MaxPoolStage,
    total_cycle: u64,
    max_cycles: u64,
}

impl System {
    pub fn new(
        accelerator_settings: &AcceleratorSettings,
        simulation_settings: &SimulationSettings,
    ) -> Result<System> {
        let geometry = AcceleratorGeometry::new(accelerator_settings)?;
        info!(
            "conv out: {}x{}@{}, pool out: {}x{}@{}, final width: {}",
            geometry.conv_out_rows,
            geometry.conv_out_cols,
            geometry.conv_out_width,
            geometry.pool_out_rows,
            geometry.pool_out_cols,
            geometry.conv_out_width,
            geometry.final_out_width
        );
        let conv = ConvolutionStage::new(&geometry, &accelerator_settings.weights)?;
        let activation = ActivationLayer::with_shape(geometry.conv_out_shape()?);
        let pool = MaxPoolStage::new(&geometry)?;
        Ok(System {
            geometry,
            conv,
            activation,
            pool,
            total_cycle: 0,
            max_cycles: simulation_settings.max_cycles,
        })
    }

    pub fn geometry(&self) -> &AcceleratorGeometry {
        &self.geometry
    }

    pub fn total_cycle(&self) -> u64 {
        self.total_cycle
    }

    pub fn conv_output(&self) -> &BitVector {
        self.conv.output()
    }

    pub fn activation_output(&self) -> &BitVector {
        self.activation.output()
    }

    pub fn pool_output(&self) -> &BitVector {
        self.pool.output()
    }

    /// # Description
    /// * advance every stage by one tick
    /// * stages run back to front, so each one reads its upstream buffer before that
    ///   upstream stage commits this tick's value
    /// * the external input is the only buffer that can have the wrong size, it is checked
    ///   before any stage commits, so a rejected tick changes nothing
    pub fn cycle(&mut self, control: &PipelineControl, input: &BitVector) -> Result<()> {
        let expected = self.geometry.input_shape()?.bit_len();
        if input.len() != expected {
            return Err(AccelError::ShapeMismatch {
                expected,
                found: input.len(),
            });
        }
        debug!("cycle {}: {:?}", self.total_cycle, control);
        self.pool.cycle(control.pool(), self.activation.output())?;
        self.activation.cycle(control.activation(), self.conv.output())?;
        self.conv.cycle(control.conv(), input)?;
        self.total_cycle += 1;
        Ok(())
    }

    /// # Description
    /// keep running until every pass is finished
    /// * each input map gets one pass of the `PassScheduler`
    /// * the pooled output is captured at the end of each pass
    pub fn run(&mut self, inputs: &[FeatureMap]) -> Result<SimStatistics> {
        let input_shape = self.geometry.input_shape()?;
        let flat_inputs: Vec<BitVector> = inputs
            .iter()
            .map(|map| {
                if map.shape() != &input_shape {
                    return Err(AccelError::ShapeMismatch {
                        expected: input_shape.bit_len(),
                        found: map.shape().bit_len(),
                    });
                }
                Ok(pack(map))
            })
            .collect::<Result<_>>()?;

        debug!("start running");
        let mut scheduler = PassScheduler::new(flat_inputs.len());
        let mut statistics = SimStatistics::new();
        let mut pass = 0;
        while !scheduler.finished() {
            if self.total_cycle >= self.max_cycles {
                return Err(AccelError::CycleBudgetExceeded {
                    max_cycles: self.max_cycles,
                    finished_passes: pass,
                    passes: flat_inputs.len(),
                });
            }
            let control = scheduler.control();
            self.cycle(&control, &flat_inputs[pass])?;
            if scheduler.advance() {
                let output = unpack(self.pool.output(), self.pool.output_shape())?;
                info!(
                    "pass {} finished at cycle {}: {}",
                    pass,
                    self.total_cycle,
                    self.pool.output()
                );
                statistics.passes.push(PassResult {
                    pass,
                    finished_cycle: self.total_cycle,
                    output_bits: self.pool.output().clone(),
                    output: output.to_rows(),
                });
                pass += 1;
            }
        }
        statistics.cycle = self.total_cycle;
        self.print_stats();
        Ok(statistics)
    }

    fn print_stats(&self) {
        info!("Total cycles: {}", self.total_cycle);
    }
}
