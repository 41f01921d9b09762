use crate::accelerator::{AcceleratorGeometry, BitVector};
use crate::settings::Settings;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SimResult {
    pub settings: Option<Settings>,
    pub geometry: Option<AcceleratorGeometry>,
    pub stats: Option<SimStatistics>,
}

impl SimResult {
    pub fn new() -> Self {
        SimResult {
            settings: None,
            geometry: None,
            stats: None,
        }
    }
}

impl Default for SimResult {
    fn default() -> Self {
        Self::new()
    }
}

/// the pooled output of one inference pass
#[derive(Debug, Serialize)]
pub struct PassResult {
    pub pass: usize,
    pub finished_cycle: u64,
    /// hex, most significant element first
    pub output_bits: BitVector,
    pub output: Vec<Vec<i64>>,
}

#[derive(Debug, Serialize)]
pub struct SimStatistics {
    pub cycle: u64,
    pub passes: Vec<PassResult>,
    pub simulation_time: String,
}

impl SimStatistics {
    pub fn new() -> Self {
        SimStatistics {
            cycle: 0,
            passes: vec![],
            simulation_time: String::new(),
        }
    }
}

impl Default for SimStatistics {
    fn default() -> Self {
        Self::new()
    }
}
