//! # Description
//! - this module is the accelerator module
//! - the top level is system, all the stages are in system
//! - read system.rs for more details
//!
//! # Components
//! - system: convolution -> activation -> pooling, driven by one clock
//! - activation: the ReLU lane array, one functional unit per element
//! - functional_unit: the compute-and-hold cell every stage replicates
//! - marshal, bit_vector, feature_map: the flattened wire format between stages
//! - convolution and pooling: behavioural models of the neighbouring stages
//! - scheduler: drives the enables of every stage through an inference pass
//!

pub mod activation;
pub mod bit_vector;
pub mod component;
pub mod control;
pub mod convolution;
pub mod element;
pub mod feature_map;
pub mod functional_unit;
pub mod geometry;
pub mod marshal;
pub mod pooling;
pub mod scheduler;
pub mod system;

pub use activation::ActivationLayer;
pub use bit_vector::BitVector;
pub use component::Component;
pub use control::{EnablePhase, PipelineControl, StageControl};
pub use convolution::ConvolutionStage;
pub use element::{relu, Element, ElementWidth};
pub use feature_map::{FeatureMap, MapShape};
pub use functional_unit::FunctionalUnit;
pub use geometry::{output_size, AcceleratorGeometry};
pub use marshal::{pack, pack_elements, unpack};
pub use pooling::MaxPoolStage;
pub use scheduler::{PassPhase, PassScheduler, StageId};
pub use system::System;
