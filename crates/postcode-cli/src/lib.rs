//! CLI library components for the postcode validator.

pub mod logging;
pub mod pipeline;
