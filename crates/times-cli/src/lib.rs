//! CLI library components for the TIMES reader.

pub mod logging;
pub mod pipeline;
pub mod types;
