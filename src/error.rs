//! Error types for the fog-analysis crate.
use chrono::NaiveDate;
use std::{error::Error, fmt::Display};

/// Error type for the crate.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AnalysisError {
    /// There were no samples or frames in the requested region and time window.
    EmptyInput,
    /// A day in the analysis window had no samples at all, so there is no way to tell a day with
    /// no fog from a day with no data.
    MissingData(NaiveDate),
    /// A frame or layer does not have the same number of pixels as the grid it belongs to.
    ShapeMismatch,
    /// Bad or invalid input.
    InvalidInput,
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use crate::AnalysisError::*;

        match self {
            EmptyInput => write!(f, "no data available in the requested region and time window"),
            MissingData(day) => write!(f, "no samples available for {}", day),
            ShapeMismatch => write!(f, "data does not match the shape of the grid"),
            InvalidInput => write!(f, "invalid input"),
        }
    }
}

impl Error for AnalysisError {}

/// Shorthand for results.
pub type Result<T> = std::result::Result<T, AnalysisError>;
