use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::string::String;

use crate::error::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// one input feature map per inference pass
    pub input_paths: Vec<String>,
    pub accelerator_settings: AcceleratorSettings,
    pub simulation_settings: SimulationSettings,
}

/// the geometry of the accelerator, validated by `AcceleratorGeometry::new`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AcceleratorSettings {
    pub in_rows: usize,
    pub in_cols: usize,
    pub in_elem_width: u32,
    pub filter_rows: usize,
    pub filter_cols: usize,
    pub conv_pad: usize,
    pub conv_stride: usize,
    pub pool_win_rows: usize,
    pub pool_win_cols: usize,
    pub pool_pad: usize,
    pub pool_stride: usize,
    /// the convolution kernel, row-major
    pub weights: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SimulationSettings {
    pub max_cycles: u64,
    pub output_dir: String,
}

impl Settings {
    /// # Description
    /// - merge the config files in order, later files override earlier ones
    pub fn new(config_path: Vec<String>) -> Result<Self> {
        let mut builder = Config::builder();
        for i in config_path {
            builder = builder.add_source(File::with_name(&i));
        }
        Ok(builder.build()?.try_deserialize()?)
    }
}
