use chrono::{NaiveDate, NaiveDateTime};
use fog_analysis::{GridShape, Location, SampleFrame, TimestepSample};
use metfor::{Celsius, Kelvin, MetersPSec, WindUV};

pub fn valid_times(start: NaiveDate, num_days: u32) -> Vec<NaiveDateTime> {
    (0..num_days)
        .flat_map(|d| {
            let date = start + chrono::Duration::days(i64::from(d));
            (0..24).map(move |h| date.and_hms_opt(h, 0, 0).expect("bad hour"))
        })
        .collect()
}

/// A frame where the moisture and wind vary smoothly across the grid so roughly half the pixels
/// are foggy.
pub fn load_frame(valid_time: NaiveDateTime, shape: GridShape) -> SampleFrame {
    let samples = (0..shape.len())
        .map(|idx| {
            let (row, col) = shape.row_col(idx);
            let x = col as f64 / shape.cols as f64;
            let y = row as f64 / shape.rows as f64;

            TimestepSample::new(valid_time, Location::Grid { row, col })
                .with_temperature(Kelvin::from(Celsius(10.0 + 10.0 * y)))
                .with_dew_point(Kelvin::from(Celsius(10.0 + 10.0 * y - 3.0 * x)))
                .with_wind(WindUV {
                    u: MetersPSec(6.0 * y),
                    v: MetersPSec(1.0),
                })
                .with_net_radiation(50.0 - 100.0 * x, -20.0)
                .with_latent_heat_flux(10.0 - 20.0 * y)
        })
        .collect();

    SampleFrame::new(valid_time, shape, samples).expect("bad frame")
}
