//! Data used in tests.

use crate::{
    grid::{FogFrame, GridShape},
    sample::{Location, TimestepSample},
};
use chrono::{NaiveDate, NaiveDateTime};
use metfor::{Celsius, Kelvin, MetersPSec, WindUV};

pub fn approx_equal(val1: f64, val2: f64, eps: f64) -> bool {
    assert!(eps > 0.0);

    (val1 - val2).abs() < eps
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("invalid test date")
}

pub fn hour(year: i32, month: u32, d: u32, hour: u32) -> NaiveDateTime {
    day(year, month, d)
        .and_hms_opt(hour, 0, 0)
        .expect("invalid test hour")
}

/// Saturated, calm, and cooling. Fog with any sensible thresholds.
pub fn foggy_sample(valid_time: NaiveDateTime, row: usize, col: usize) -> TimestepSample {
    TimestepSample::new(valid_time, Location::Grid { row, col })
        .with_temperature(Kelvin::from(Celsius(15.0)))
        .with_dew_point(Kelvin::from(Celsius(14.5)))
        .with_wind(WindUV {
            u: MetersPSec(2.0),
            v: MetersPSec(0.0),
        })
        .with_net_radiation(0.0, -10.0)
        .with_latent_heat_flux(5.0)
}

/// Warm, dry, and windy afternoon.
pub fn clear_sample(valid_time: NaiveDateTime, row: usize, col: usize) -> TimestepSample {
    TimestepSample::new(valid_time, Location::Grid { row, col })
        .with_temperature(Kelvin::from(Celsius(25.0)))
        .with_dew_point(Kelvin::from(Celsius(10.0)))
        .with_wind(WindUV {
            u: MetersPSec(6.0),
            v: MetersPSec(3.0),
        })
        .with_net_radiation(400.0, -80.0)
        .with_latent_heat_flux(-50.0)
}

pub fn fog_frame(valid_time: NaiveDateTime, flags: &[bool]) -> FogFrame {
    FogFrame::new(valid_time, GridShape::new(1, flags.len()), flags.to_vec())
        .expect("bad test frame")
}
