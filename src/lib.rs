#![warn(missing_docs)]
//! Functions and data types for detecting fog in hourly surface fields from a reanalysis, such
//! as ERA5-Land, and summarizing how often it occurred over a day or a longer period.
//!
//! The analysis has three stages:
//!
//!  1. Derive relative humidity, temperature-dew point spread, wind speed, and net radiation from
//!     the raw fields of a [`TimestepSample`] ([`derive_fields`]).
//!  2. Apply the fog rule to the derived fields ([`FogThresholds::is_fog`]).
//!  3. Reduce the hourly flags over time, either collapsing them into daily events
//!     ([`daily_fog_events`]) or keeping each hour ([`hourly_fog_events`]).
//!
//! The summaries convert into a [`RasterStack`] of named floating point layers ready to hand to a
//! [`RasterSink`].
//!
//! # Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fog_analysis::{fog_flag, Location, TimestepSample};
//! use metfor::{Celsius, Kelvin, MetersPSec, WindUV};
//!
//! let valid_time = NaiveDate::from_ymd_opt(2023, 10, 23)
//!     .and_then(|d| d.and_hms_opt(6, 0, 0))
//!     .unwrap();
//!
//! let sample = TimestepSample::new(valid_time, Location::Grid { row: 0, col: 0 })
//!     .with_temperature(Kelvin::from(Celsius(15.0)))
//!     .with_dew_point(Kelvin::from(Celsius(14.5)))
//!     .with_wind(WindUV { u: MetersPSec(2.0), v: MetersPSec(0.0) })
//!     .with_net_radiation(-10.0, 0.0)
//!     .with_latent_heat_flux(5.0);
//!
//! assert!(fog_flag(&sample));
//! ```

//
// API
//
pub use crate::{
    aggregate::{
        daily_fog_events, hourly_fog_events, AnalysisWindow, DailyEvents, DailySummary,
        HourlySummary,
    },
    analysis::FogAnalysis,
    derived::{derive_fields, relative_humidity, vapor_pressure, DerivedFields},
    error::{AnalysisError, Result},
    fog::{fog_flag, is_fog, FogCondition, FogThresholds},
    grid::{FogFrame, GridShape, Region},
    raster::{ExportRequest, Layer, MemorySink, RasterSink, RasterStack},
    sample::{Location, SampleFrame, TimestepSample},
};

/// Constants used by the derivation and the fog rule.
pub mod constants {
    pub use crate::aggregate::{TOTAL_FOG_EVENTS, TOTAL_FOG_HOURS};
    pub use crate::derived::{MAGNUS_A, MAGNUS_B, MAGNUS_E0};
    pub use crate::fog::{
        LATENT_HEAT_THRESHOLD, NET_RADIATION_THRESHOLD, RH_THRESHOLD, SPREAD_THRESHOLD,
        WIND_THRESHOLD,
    };
}

//
// Internal use only
//

// Modules
mod aggregate;
mod analysis;
mod derived;
mod error;
mod fog;
mod grid;
mod raster;
mod sample;

#[cfg(test)]
mod test_data;
