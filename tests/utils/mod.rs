#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use fog_analysis::{FogFrame, GridShape, Location, SampleFrame, TimestepSample};
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

/// Build a sample from values in the units forecasters think in.
pub fn sample(
    valid_time: NaiveDateTime,
    t_c: f64,
    dp_c: f64,
    wind_ms: f64,
    net_radiation: f64,
    latent_heat_flux: f64,
) -> TimestepSample {
    TimestepSample::new(valid_time, Location::Grid { row: 0, col: 0 })
        .with_temperature(Kelvin::from(Celsius(t_c)))
        .with_dew_point(Kelvin::from(Celsius(dp_c)))
        .with_wind(WindUV {
            u: MetersPSec(wind_ms),
            v: MetersPSec(0.0),
        })
        .with_net_radiation(net_radiation, 0.0)
        .with_latent_heat_flux(latent_heat_flux)
}

/// A pseudo random, but repeatable, set of samples covering foggy and clear conditions.
pub fn sample_grid(valid_time: NaiveDateTime, shape: GridShape, seed: u64) -> SampleFrame {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };

    let samples = (0..shape.len())
        .map(|idx| {
            let t_c = 5.0 + 20.0 * next();
            let spread = 4.0 * next();
            let s = sample(
                valid_time,
                t_c,
                t_c - spread,
                8.0 * next(),
                -100.0 + 200.0 * next(),
                -40.0 + 80.0 * next(),
            );
            TimestepSample {
                location: Location::Grid {
                    row: idx / shape.cols,
                    col: idx % shape.cols,
                },
                ..s
            }
        })
        .collect();

    SampleFrame::new(valid_time, shape, samples).expect("bad test frame")
}

pub fn fog_frame(valid_time: NaiveDateTime, flags: &[bool]) -> FogFrame {
    FogFrame::new(valid_time, GridShape::new(1, flags.len()), flags.to_vec())
        .expect("bad test frame")
}

#[allow(unused_macros)] // False alarm - lint is done before macro expansion.
macro_rules! fog_scenario {
    ($test_name:ident, $t:expr, $dp:expr, $wind:expr, $net_rad:expr, $lhf:expr => $expected:expr) => {
        #[test]
        fn $test_name() {
            let s = utils::sample(utils::hour(2023, 10, 23, 6), $t, $dp, $wind, $net_rad, $lhf);
            assert_eq!(fog_analysis::fog_flag(&s), $expected);
        }
    };
}
