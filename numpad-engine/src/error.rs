//! Engine error types

use thiserror::Error;

/// Errors from building a [`DeviceGeometry`](crate::DeviceGeometry)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// An axis whose max is not strictly greater than its min
    #[error("Degenerate {axis} range: min {min}, max {max}")]
    Degenerate {
        axis: &'static str,
        min: i32,
        max: i32,
    },
}

/// Errors from the event pipeline
#[derive(Error, Debug)]
pub enum EngineError {
    /// The virtual keyboard rejected a write
    #[error("Failed to write key event: {0}")]
    Output(#[from] std::io::Error),
}

/// A key label outside the numpad alphabet
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown key symbol: \"{0}\"")]
pub struct ParseSymbolError(pub String);
