//! Grid geometry and hourly rasters of fog flags.

use crate::{
    error::{AnalysisError, Result},
    fog::FogThresholds,
    sample::SampleFrame,
};
use chrono::NaiveDateTime;
use optional::OptionBool;
use rayon::prelude::*;

/// Number of rows and columns in a raster. Data is always stored row major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridShape {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
}

impl GridShape {
    /// Create a new shape.
    #[inline]
    pub fn new(rows: usize, cols: usize) -> Self {
        GridShape { rows, cols }
    }

    /// Total number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// True if there are no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row major index of a pixel, `None` if it is outside the grid.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }

    /// Row and column of a row major index.
    #[inline]
    pub fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }
}

/// A latitude-longitude rectangle divided into square cells.
///
/// Row 0 is the northern edge, column 0 the western edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
    cell_size: f64,
}

impl Region {
    /// Create a new region from its bounds and cell size, all in degrees.
    pub fn new(west: f64, south: f64, east: f64, north: f64, cell_size: f64) -> Result<Self> {
        // Written so NaN fails the checks too.
        if !(west < east && south < north && cell_size > 0.0) {
            return Err(AnalysisError::InvalidInput);
        }

        Ok(Region {
            west,
            south,
            east,
            north,
            cell_size,
        })
    }

    /// The southeastern United States, 100W to 80W and 25N to 35N, on the 0.1 degree ERA5-Land
    /// grid.
    pub fn southeast_us() -> Self {
        Region {
            west: -100.0,
            south: 25.0,
            east: -80.0,
            north: 35.0,
            cell_size: 0.1,
        }
    }

    /// Bounds as `(west, south, east, north)`.
    #[inline]
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.west, self.south, self.east, self.north)
    }

    /// Size of a cell in degrees.
    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// The shape of the grid covering this region. Partial cells on the south and east edges
    /// count as whole cells.
    pub fn shape(&self) -> GridShape {
        GridShape::new(
            num_cells(self.north - self.south, self.cell_size),
            num_cells(self.east - self.west, self.cell_size),
        )
    }

    /// The row and column of the cell containing a point, `None` if it is outside the region.
    pub fn cell_of(&self, lat: f64, lon: f64) -> Option<(usize, usize)> {
        if !(lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east) {
            return None;
        }

        let shape = self.shape();
        let row = ((self.north - lat) / self.cell_size).floor() as usize;
        let col = ((lon - self.west) / self.cell_size).floor() as usize;

        // Points on the south or east edge belong to the last cell.
        Some((row.min(shape.rows - 1), col.min(shape.cols - 1)))
    }

    /// Latitude and longitude of the center of a cell.
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        let lat = self.north - (row as f64 + 0.5) * self.cell_size;
        let lon = self.west + (col as f64 + 0.5) * self.cell_size;
        (lat, lon)
    }
}

fn num_cells(span: f64, cell_size: f64) -> usize {
    const EPS: f64 = 1.0e-6;

    let n = span / cell_size;
    let n = if (n - n.round()).abs() < EPS {
        n.round()
    } else {
        n.ceil()
    };

    (n as usize).max(1)
}

/// The fog flags for every pixel in a grid at one valid time.
///
/// A pixel without a sample is `OptionBool::None`. A pixel with a sample is never `None`, even if
/// every value in the sample is missing; such a sample is simply not fog.
#[derive(Debug, Clone, PartialEq)]
pub struct FogFrame {
    valid_time: NaiveDateTime,
    shape: GridShape,
    flags: Vec<OptionBool>,
}

impl FogFrame {
    /// Create a frame from row major flags for a grid with a sample at every pixel.
    pub fn new(valid_time: NaiveDateTime, shape: GridShape, flags: Vec<bool>) -> Result<Self> {
        Self::with_missing(
            valid_time,
            shape,
            flags.into_iter().map(to_option_bool).collect(),
        )
    }

    /// Create a frame from row major flags where some pixels may have no sample.
    pub fn with_missing(
        valid_time: NaiveDateTime,
        shape: GridShape,
        flags: Vec<OptionBool>,
    ) -> Result<Self> {
        if flags.len() != shape.len() {
            return Err(AnalysisError::ShapeMismatch);
        }

        Ok(FogFrame {
            valid_time,
            shape,
            flags,
        })
    }

    /// Apply the fog rule to every sample in a frame. Pixels are evaluated in parallel.
    pub fn classify(frame: &SampleFrame, thresholds: &FogThresholds) -> Self {
        let flags = frame
            .samples()
            .par_iter()
            .map(|sample| match sample {
                Some(sample) => to_option_bool(thresholds.is_fog_sample(sample)),
                None => OptionBool::None,
            })
            .collect();

        FogFrame {
            valid_time: frame.valid_time(),
            shape: frame.shape(),
            flags,
        }
    }

    /// Valid time of the frame.
    #[inline]
    pub fn valid_time(&self) -> NaiveDateTime {
        self.valid_time
    }

    /// Shape of the grid.
    #[inline]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// The flags in row major order.
    #[inline]
    pub fn flags(&self) -> &[OptionBool] {
        &self.flags
    }

    /// Number of pixels with fog.
    pub fn fog_count(&self) -> usize {
        self.flags
            .iter()
            .filter(|f| matches!(f, OptionBool::SomeTrue))
            .count()
    }

    /// Number of pixels without a sample.
    pub fn missing_count(&self) -> usize {
        self.flags
            .iter()
            .filter(|f| matches!(f, OptionBool::None))
            .count()
    }

    /// Name of the band when this frame is exported on its own, e.g. `20231023T05_fog_hour`.
    pub fn band_name(&self) -> String {
        format!("{}_fog_hour", self.valid_time.format("%Y%m%dT%H"))
    }
}

fn to_option_bool(val: bool) -> OptionBool {
    if val {
        OptionBool::SomeTrue
    } else {
        OptionBool::SomeFalse
    }
}
