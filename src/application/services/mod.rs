//! Application services
//!
//! Services orchestrate the core pipeline and depend on I/O boundary traits.

pub mod conversion;

pub use conversion::{ConversionOutcome, ConversionService};
