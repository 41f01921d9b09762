//! the crate cnn_accel is a cycle-level simulator of a CNN inference accelerator datapath.
//! there are 6 parts in the crate:
//!
//! - accelerator: the convolution, activation and pooling stages and the system wiring them.
//! - settings: the layered configuration of a run.
//! - input_map: reading input feature maps from text files.
//! - sim_result: the report written after a run.
//! - error: the error type of the crate.
//! - cmd_args: the command line of the simulator binary.
//!
//!

pub mod accelerator;
pub mod cmd_args;
pub mod error;
pub mod input_map;
pub mod settings;
pub mod sim_result;

pub use accelerator::System;
pub use error::{AccelError, Result};
pub use sim_result::SimResult;
