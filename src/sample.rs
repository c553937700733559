//! Data types for the raw hourly surface fields fed into the analysis.

use crate::{
    error::{AnalysisError, Result},
    grid::{GridShape, Region},
};
use chrono::NaiveDateTime;
use itertools::Itertools;
use log::debug;
use metfor::{Kelvin, MetersPSec, WindUV};

/// Where a sample was taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Location {
    /// Row and column in a grid, row 0 is the northern most row.
    Grid {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
    },
    /// Latitude and longitude in degrees.
    LatLon {
        /// Latitude
        lat: f64,
        /// Longitude
        lon: f64,
    },
}

/// One pixel's measurements at one hourly time step.
///
/// Values that are not set are NaN. Missing values propagate through the derived fields and are
/// never classified as fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimestepSample {
    /// Valid time, UTC.
    pub valid_time: NaiveDateTime,
    /// Location of the sample.
    pub location: Location,
    /// Temperature at 2 meters.
    pub temperature: Kelvin,
    /// Dew point at 2 meters.
    pub dew_point: Kelvin,
    /// The u component of the 10 meter wind.
    pub wind_u: MetersPSec,
    /// The v component of the 10 meter wind.
    pub wind_v: MetersPSec,
    /// Surface net solar radiation, W/m^2.
    pub net_solar_radiation: f64,
    /// Surface net thermal radiation, W/m^2.
    pub net_thermal_radiation: f64,
    /// Surface latent heat flux, W/m^2.
    pub latent_heat_flux: f64,
}

impl TimestepSample {
    /// Create a new sample with all the measurements missing.
    #[inline]
    pub fn new(valid_time: NaiveDateTime, location: Location) -> Self {
        TimestepSample {
            valid_time,
            location,
            temperature: Kelvin(std::f64::NAN),
            dew_point: Kelvin(std::f64::NAN),
            wind_u: MetersPSec(std::f64::NAN),
            wind_v: MetersPSec(std::f64::NAN),
            net_solar_radiation: std::f64::NAN,
            net_thermal_radiation: std::f64::NAN,
            latent_heat_flux: std::f64::NAN,
        }
    }

    /// Builder method for the 2 meter temperature.
    #[inline]
    pub fn with_temperature<T: Into<Kelvin>>(self, temperature: T) -> Self {
        TimestepSample {
            temperature: temperature.into(),
            ..self
        }
    }

    /// Builder method for the 2 meter dew point.
    #[inline]
    pub fn with_dew_point<T: Into<Kelvin>>(self, dew_point: T) -> Self {
        TimestepSample {
            dew_point: dew_point.into(),
            ..self
        }
    }

    /// Builder method for the 10 meter wind.
    #[inline]
    pub fn with_wind(self, wind: WindUV<MetersPSec>) -> Self {
        let WindUV { u, v } = wind;
        TimestepSample {
            wind_u: u,
            wind_v: v,
            ..self
        }
    }

    /// Builder method for the net solar and net thermal radiation, both in W/m^2.
    #[inline]
    pub fn with_net_radiation(self, net_solar: f64, net_thermal: f64) -> Self {
        TimestepSample {
            net_solar_radiation: net_solar,
            net_thermal_radiation: net_thermal,
            ..self
        }
    }

    /// Builder method for the surface latent heat flux in W/m^2.
    #[inline]
    pub fn with_latent_heat_flux(self, latent_heat_flux: f64) -> Self {
        TimestepSample {
            latent_heat_flux,
            ..self
        }
    }
}

/// All the samples in a grid valid at a single time, stored row major.
///
/// A pixel without a sample is `None`. This is different from a sample whose values are all
/// missing.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleFrame {
    valid_time: NaiveDateTime,
    shape: GridShape,
    samples: Vec<Option<TimestepSample>>,
}

impl SampleFrame {
    /// Create a frame from row major samples.
    ///
    /// Fails with `ShapeMismatch` if the number of samples does not fill the grid. Fails with
    /// `InvalidInput` if any sample is valid at a different time than the frame, or if a sample
    /// located by row and column is not at that position in the row major order.
    pub fn new(
        valid_time: NaiveDateTime,
        shape: GridShape,
        samples: Vec<TimestepSample>,
    ) -> Result<Self> {
        if samples.len() != shape.len() {
            return Err(AnalysisError::ShapeMismatch);
        }

        if samples.iter().any(|s| s.valid_time != valid_time) {
            return Err(AnalysisError::InvalidInput);
        }

        let misplaced = samples
            .iter()
            .enumerate()
            .any(|(idx, s)| match s.location {
                Location::Grid { row, col } => shape.index(row, col) != Some(idx),
                Location::LatLon { .. } => false,
            });
        if misplaced {
            return Err(AnalysisError::InvalidInput);
        }

        Ok(SampleFrame {
            valid_time,
            shape,
            samples: samples.into_iter().map(Some).collect(),
        })
    }

    /// Gather an unordered list of samples into frames, one frame per valid time, sorted in time.
    ///
    /// Samples located by latitude and longitude are placed with `region`, which is required if
    /// there are any. Cells without a sample are left empty and classify as missing rather than as
    /// "no fog".
    pub fn gather<I>(samples: I, shape: GridShape, region: Option<&Region>) -> Result<Vec<Self>>
    where
        I: IntoIterator<Item = TimestepSample>,
    {
        let by_time = samples
            .into_iter()
            .sorted_by_key(|s| s.valid_time)
            .group_by(|s| s.valid_time);

        let mut frames = vec![];
        for (valid_time, group) in &by_time {
            let mut cells: Vec<Option<TimestepSample>> = vec![None; shape.len()];

            for sample in group {
                let idx = cell_index(&sample.location, shape, region)?;
                if cells[idx].is_some() {
                    return Err(AnalysisError::InvalidInput);
                }
                cells[idx] = Some(sample);
            }

            let filled = cells.iter().filter(|c| c.is_some()).count();
            if filled < shape.len() {
                debug!(
                    "{} of {} cells have no sample at {}.",
                    shape.len() - filled,
                    shape.len(),
                    valid_time
                );
            }

            frames.push(SampleFrame {
                valid_time,
                shape,
                samples: cells,
            });
        }

        if frames.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        Ok(frames)
    }

    /// Valid time of every sample in the frame.
    #[inline]
    pub fn valid_time(&self) -> NaiveDateTime {
        self.valid_time
    }

    /// Shape of the grid.
    #[inline]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// The samples in row major order, `None` where a pixel has no sample.
    #[inline]
    pub fn samples(&self) -> &[Option<TimestepSample>] {
        &self.samples
    }
}

fn cell_index(location: &Location, shape: GridShape, region: Option<&Region>) -> Result<usize> {
    let idx = match *location {
        Location::Grid { row, col } => shape.index(row, col),
        Location::LatLon { lat, lon } => region
            .and_then(|region| region.cell_of(lat, lon))
            .and_then(|(row, col)| shape.index(row, col)),
    };

    idx.ok_or(AnalysisError::InvalidInput)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data::{foggy_sample, hour};

    #[test]
    fn test_new_sample_is_all_missing() {
        let s = TimestepSample::new(hour(2023, 10, 23, 0), Location::Grid { row: 0, col: 0 });
        assert!(s.temperature.0.is_nan());
        assert!(s.dew_point.0.is_nan());
        assert!(s.wind_u.0.is_nan() && s.wind_v.0.is_nan());
        assert!(s.net_solar_radiation.is_nan());
        assert!(s.latent_heat_flux.is_nan());
    }

    #[test]
    fn test_frame_checks_shape_and_time() {
        let t = hour(2023, 10, 23, 0);
        let shape = GridShape::new(1, 2);

        let one = vec![foggy_sample(t, 0, 0)];
        assert_eq!(
            SampleFrame::new(t, shape, one),
            Err(AnalysisError::ShapeMismatch)
        );

        let wrong_time = vec![foggy_sample(t, 0, 0), foggy_sample(hour(2023, 10, 23, 1), 0, 1)];
        assert_eq!(
            SampleFrame::new(t, shape, wrong_time),
            Err(AnalysisError::InvalidInput)
        );

        let good = vec![foggy_sample(t, 0, 0), foggy_sample(t, 0, 1)];
        let frame = SampleFrame::new(t, shape, good).unwrap();
        assert!(frame.samples().iter().all(Option::is_some));
    }

    #[test]
    fn test_frame_checks_grid_positions() {
        let t = hour(2023, 10, 23, 0);
        let shape = GridShape::new(2, 1);

        let swapped = vec![foggy_sample(t, 1, 0), foggy_sample(t, 0, 0)];
        assert_eq!(
            SampleFrame::new(t, shape, swapped),
            Err(AnalysisError::InvalidInput)
        );

        let outside = vec![foggy_sample(t, 0, 0), foggy_sample(t, 1, 1)];
        assert_eq!(
            SampleFrame::new(t, shape, outside),
            Err(AnalysisError::InvalidInput)
        );

        // Samples located by latitude and longitude are taken in the order given.
        let latlon = TimestepSample {
            location: Location::LatLon {
                lat: 30.0,
                lon: -90.0,
            },
            ..foggy_sample(t, 0, 0)
        };
        assert!(SampleFrame::new(t, shape, vec![foggy_sample(t, 0, 0), latlon]).is_ok());
    }

    #[test]
    fn test_gather_groups_and_sorts() {
        let shape = GridShape::new(2, 2);
        let t0 = hour(2023, 10, 23, 0);
        let t1 = hour(2023, 10, 23, 1);

        let samples = vec![
            foggy_sample(t1, 1, 1),
            foggy_sample(t0, 0, 1),
            foggy_sample(t1, 0, 0),
        ];

        let frames = SampleFrame::gather(samples, shape, None).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].valid_time(), t0);
        assert_eq!(frames[1].valid_time(), t1);

        // Unfilled cells are empty, filled cells keep their data.
        assert!(frames[0].samples()[0].is_none());
        assert_eq!(frames[0].samples()[1], Some(foggy_sample(t0, 0, 1)));
        assert!(frames[0].samples()[2].is_none());
        assert!(frames[1].samples()[1].is_none());
        assert_eq!(frames[1].samples()[3], Some(foggy_sample(t1, 1, 1)));
    }

    #[test]
    fn test_gather_rejects_bad_locations() {
        let shape = GridShape::new(2, 2);
        let t0 = hour(2023, 10, 23, 0);

        let outside = vec![foggy_sample(t0, 2, 0)];
        assert_eq!(
            SampleFrame::gather(outside, shape, None),
            Err(AnalysisError::InvalidInput)
        );

        let duplicate = vec![foggy_sample(t0, 1, 0), foggy_sample(t0, 1, 0)];
        assert_eq!(
            SampleFrame::gather(duplicate, shape, None),
            Err(AnalysisError::InvalidInput)
        );

        let latlon = TimestepSample {
            location: Location::LatLon {
                lat: 30.0,
                lon: -90.0,
            },
            ..foggy_sample(t0, 0, 0)
        };
        assert_eq!(
            SampleFrame::gather(vec![latlon], shape, None),
            Err(AnalysisError::InvalidInput)
        );

        assert_eq!(
            SampleFrame::gather(Vec::<TimestepSample>::new(), shape, None),
            Err(AnalysisError::EmptyInput)
        );
    }

    #[test]
    fn test_gather_places_lat_lon() {
        let region = Region::new(-100.0, 25.0, -80.0, 35.0, 5.0).unwrap();
        let shape = region.shape();
        assert_eq!(shape, GridShape::new(2, 4));

        let t0 = hour(2023, 10, 23, 0);
        let sample = TimestepSample {
            location: Location::LatLon {
                lat: 26.0,
                lon: -81.0,
            },
            ..foggy_sample(t0, 0, 0)
        };

        let frames = SampleFrame::gather(vec![sample], shape, Some(&region)).unwrap();
        let samples = frames[0].samples();
        assert!(samples[shape.index(1, 3).unwrap()].is_some());
        assert_eq!(samples.iter().filter(|s| s.is_some()).count(), 1);
    }
}
