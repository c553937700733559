//! Named floating point layers and the interface to whatever writes them to disk.

use crate::{
    error::{AnalysisError, Result},
    grid::{GridShape, Region},
};
use log::info;

/// A single named band of a raster, row major.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    name: String,
    values: Vec<f64>,
}

impl Layer {
    /// Band name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pixel values in row major order.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// An ordered collection of layers that all share the same grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterStack {
    shape: GridShape,
    layers: Vec<Layer>,
}

impl RasterStack {
    /// Create an empty stack.
    #[inline]
    pub fn new(shape: GridShape) -> Self {
        RasterStack {
            shape,
            layers: vec![],
        }
    }

    /// Append a layer.
    ///
    /// Fails with `ShapeMismatch` if the values do not fill the grid and `InvalidInput` if there
    /// is already a layer with this name.
    pub fn push_layer<S: Into<String>>(&mut self, name: S, values: Vec<f64>) -> Result<()> {
        let name = name.into();

        if values.len() != self.shape.len() {
            return Err(AnalysisError::ShapeMismatch);
        }

        if self.layer(&name).is_some() {
            return Err(AnalysisError::InvalidInput);
        }

        self.layers.push(Layer { name, values });
        Ok(())
    }

    /// Builder version of `push_layer`.
    pub fn with_layer<S: Into<String>>(mut self, name: S, values: Vec<f64>) -> Result<Self> {
        self.push_layer(name, values)?;
        Ok(self)
    }

    /// Shape of the grid.
    #[inline]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// The layers in band order.
    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of bands.
    #[inline]
    pub fn num_bands(&self) -> usize {
        self.layers.len()
    }

    /// Find a layer by name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|lyr| lyr.name == name)
    }

    /// Band names in order.
    pub fn band_names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(Layer::name)
    }
}

/// Where and how to export a raster.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    description: String,
    region: Region,
    scale: f64,
    max_pixels: u64,
}

impl ExportRequest {
    /// Create a new request with the default scale and pixel limit.
    pub fn new<S: Into<String>>(description: S, region: Region) -> Self {
        ExportRequest {
            description: description.into(),
            region,
            scale: 9000.0,
            max_pixels: 10_000_000_000_000,
        }
    }

    /// Export of daily events over October through December 2023 for the southeastern US.
    pub fn daily_default() -> Self {
        Self::new(
            "Daily_Fog_Events_OctDec2023_ExpandedRegion",
            Region::southeast_us(),
        )
    }

    /// Export of hourly flags for 23 October 2023 over the southeastern US.
    pub fn hourly_default() -> Self {
        Self::new(
            "Hourly_Fog_Oct23_2023_ExpandedRegion_WithTotalFogHours",
            Region::southeast_us(),
        )
    }

    /// Set the description, typically used as the file name.
    pub fn with_description<S: Into<String>>(self, description: S) -> Self {
        ExportRequest {
            description: description.into(),
            ..self
        }
    }

    /// Set the nominal pixel size in meters.
    pub fn with_scale(self, scale: f64) -> Self {
        ExportRequest { scale, ..self }
    }

    /// Set the maximum number of pixels per band.
    pub fn with_max_pixels(self, max_pixels: u64) -> Self {
        ExportRequest { max_pixels, ..self }
    }

    /// Description, typically used as the file name.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Region covered by the export.
    #[inline]
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Nominal pixel size in meters.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Maximum number of pixels per band.
    #[inline]
    pub fn max_pixels(&self) -> u64 {
        self.max_pixels
    }

    /// Check that a stack can be exported with this request.
    pub fn validate(&self, stack: &RasterStack) -> Result<()> {
        if stack.num_bands() == 0 || stack.shape().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        if stack.shape().len() as u64 > self.max_pixels {
            return Err(AnalysisError::InvalidInput);
        }

        if !(self.scale > 0.0) {
            return Err(AnalysisError::InvalidInput);
        }

        Ok(())
    }
}

/// Something that can persist a raster, for example as a multi-band GeoTIFF.
pub trait RasterSink {
    /// Write the stack. Implementations decide the file format and projection.
    fn export(&mut self, request: &ExportRequest, stack: &RasterStack) -> Result<()>;
}

/// A sink that keeps every export in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    exports: Vec<(ExportRequest, RasterStack)>,
}

impl MemorySink {
    /// Create an empty sink.
    #[inline]
    pub fn new() -> Self {
        MemorySink::default()
    }

    /// Everything exported so far, in order.
    #[inline]
    pub fn exports(&self) -> &[(ExportRequest, RasterStack)] {
        &self.exports
    }
}

impl RasterSink for MemorySink {
    fn export(&mut self, request: &ExportRequest, stack: &RasterStack) -> Result<()> {
        request.validate(stack)?;

        info!(
            "Exporting {} bands as {}.",
            stack.num_bands(),
            request.description()
        );

        self.exports.push((request.clone(), stack.clone()));
        Ok(())
    }
}
