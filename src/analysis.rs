//! Convenient package for running the whole analysis, from raw samples to an exported raster.

use crate::{
    aggregate::{daily_fog_events, hourly_fog_events, AnalysisWindow, DailySummary, HourlySummary},
    error::{AnalysisError, Result},
    fog::FogThresholds,
    grid::{FogFrame, GridShape, Region},
    raster::{ExportRequest, RasterSink},
    sample::{SampleFrame, TimestepSample},
};
use chrono::NaiveDate;
use log::debug;

/// Settings shared by every stage of the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FogAnalysis {
    thresholds: FogThresholds,
    region: Option<Region>,
}

impl FogAnalysis {
    /// Create an analysis with the default thresholds and no region.
    #[inline]
    pub fn new() -> Self {
        FogAnalysis::default()
    }

    /// Builder method for the thresholds.
    #[inline]
    pub fn with_thresholds(self, thresholds: FogThresholds) -> Self {
        FogAnalysis { thresholds, ..self }
    }

    /// Builder method for the region used to place samples located by latitude and longitude.
    #[inline]
    pub fn with_region(self, region: Region) -> Self {
        FogAnalysis {
            region: Some(region),
            ..self
        }
    }

    /// The thresholds in use.
    #[inline]
    pub fn thresholds(&self) -> &FogThresholds {
        &self.thresholds
    }

    /// The region, if one was set.
    #[inline]
    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// Apply the fog rule to every frame.
    pub fn classify(&self, frames: &[SampleFrame]) -> Vec<FogFrame> {
        let fog_frames: Vec<FogFrame> = frames
            .iter()
            .map(|frame| FogFrame::classify(frame, &self.thresholds))
            .collect();

        debug!(
            "Classified {} frames, {} foggy pixel-hours.",
            fog_frames.len(),
            fog_frames.iter().map(FogFrame::fog_count).sum::<usize>()
        );

        fog_frames
    }

    /// Gather loose samples into frames and apply the fog rule to them.
    ///
    /// If no shape is given the region's shape is used. Fails with `InvalidInput` if neither a
    /// shape nor a region is available.
    pub fn classify_samples<I>(&self, samples: I, shape: Option<GridShape>) -> Result<Vec<FogFrame>>
    where
        I: IntoIterator<Item = TimestepSample>,
    {
        let shape = shape
            .or_else(|| self.region.map(|r| r.shape()))
            .ok_or(AnalysisError::InvalidInput)?;

        let frames = SampleFrame::gather(samples, shape, self.region.as_ref())?;
        Ok(self.classify(&frames))
    }

    /// Daily fog events over `window`.
    pub fn daily(&self, frames: &[SampleFrame], window: &AnalysisWindow) -> Result<DailySummary> {
        daily_fog_events(&self.classify(frames), window)
    }

    /// Hourly fog flags for `day`.
    pub fn hourly(&self, frames: &[SampleFrame], day: NaiveDate) -> Result<HourlySummary> {
        hourly_fog_events(&self.classify(frames), day)
    }

    /// Run the daily analysis and hand the result to `sink`.
    pub fn export_daily<S: RasterSink>(
        &self,
        frames: &[SampleFrame],
        window: &AnalysisWindow,
        request: &ExportRequest,
        sink: &mut S,
    ) -> Result<DailySummary> {
        let summary = self.daily(frames, window)?;
        sink.export(request, &summary.to_raster_stack()?)?;
        Ok(summary)
    }

    /// Run the hourly analysis and hand the result to `sink`.
    pub fn export_hourly<S: RasterSink>(
        &self,
        frames: &[SampleFrame],
        day: NaiveDate,
        request: &ExportRequest,
        sink: &mut S,
    ) -> Result<HourlySummary> {
        let summary = self.hourly(frames, day)?;
        sink.export(request, &summary.to_raster_stack()?)?;
        Ok(summary)
    }
}
