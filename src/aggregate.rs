//! Reduce hourly fog flags over time.
//!
//! There are two modes. The daily mode collapses every hour of a calendar day into a single
//! event with a logical OR, then counts the days with fog. The hourly mode keeps every hour and
//! counts the hours with fog. Both only consider frames inside the requested window and sort them
//! by valid time first so the layers always come out in the same order.

use crate::{
    error::{AnalysisError, Result},
    grid::{FogFrame, GridShape},
    raster::RasterStack,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use itertools::Itertools;
use log::{debug, warn};
use optional::OptionBool;

/// Name of the summary band in the daily mode.
pub const TOTAL_FOG_EVENTS: &str = "total_fog_events";
/// Name of the summary band in the hourly mode.
pub const TOTAL_FOG_HOURS: &str = "total_fog_hours";

/// A range of whole calendar days, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindow {
    start: NaiveDate,
    num_days: u32,
}

impl AnalysisWindow {
    /// A window of `num_days` days starting at 00 UTC on `start`.
    pub fn new(start: NaiveDate, num_days: u32) -> Result<Self> {
        if num_days == 0 {
            return Err(AnalysisError::InvalidInput);
        }

        // Make sure the end is representable so `end` and `days` never fail.
        start
            .checked_add_signed(Duration::days(i64::from(num_days)))
            .ok_or(AnalysisError::InvalidInput)?;

        Ok(AnalysisWindow { start, num_days })
    }

    /// A window from `start` up to, but not including, `end`.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let num_days = end.signed_duration_since(start).num_days();
        if num_days <= 0 || num_days > i64::from(u32::MAX) {
            return Err(AnalysisError::InvalidInput);
        }

        Self::new(start, num_days as u32)
    }

    /// A window covering a single day.
    #[inline]
    pub fn single_day(day: NaiveDate) -> Result<Self> {
        Self::new(day, 1)
    }

    /// First day in the window.
    #[inline]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// First day after the window.
    #[inline]
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(i64::from(self.num_days))
    }

    /// Number of days in the window.
    #[inline]
    pub fn num_days(&self) -> u32 {
        self.num_days
    }

    /// Iterate over the days in the window.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.num_days).map(move |i| start + Duration::days(i64::from(i)))
    }

    /// Zero based index of the day containing `valid_time`, or `None` if it is outside the window.
    pub fn day_index(&self, valid_time: NaiveDateTime) -> Option<usize> {
        let offset = valid_time
            .date()
            .signed_duration_since(self.start)
            .num_days();

        if offset >= 0 && offset < i64::from(self.num_days) {
            Some(offset as usize)
        } else {
            None
        }
    }

    /// Is `valid_time` inside the window.
    #[inline]
    pub fn contains(&self, valid_time: NaiveDateTime) -> bool {
        self.day_index(valid_time).is_some()
    }
}

/// Whether there was fog at any hour of one day, for every pixel.
///
/// A pixel is `OptionBool::None` if it had no sample at any hour of the day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyEvents {
    date: NaiveDate,
    index: usize,
    events: Vec<OptionBool>,
}

impl DailyEvents {
    /// The calendar day.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Zero based index of the day in the analysis window.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The events in row major order.
    #[inline]
    pub fn events(&self) -> &[OptionBool] {
        &self.events
    }

    /// True if no pixel has any data for this day.
    pub fn is_missing(&self) -> bool {
        self.events.iter().all(|ev| matches!(ev, OptionBool::None))
    }

    /// Number of pixels without any data for this day.
    pub fn missing_count(&self) -> usize {
        self.events
            .iter()
            .filter(|ev| matches!(ev, OptionBool::None))
            .count()
    }

    /// Number of pixels that had fog during this day.
    pub fn fog_count(&self) -> usize {
        self.events
            .iter()
            .filter(|ev| matches!(ev, OptionBool::SomeTrue))
            .count()
    }

    /// Band name for export, e.g. `fog_event_day_007`.
    pub fn band_name(&self) -> String {
        format!("fog_event_day_{:03}", self.index)
    }
}

/// Daily fog events over a window of several days and the number of days with fog.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    shape: GridShape,
    window: AnalysisWindow,
    days: Vec<DailyEvents>,
    total: Vec<u32>,
}

impl DailySummary {
    /// Shape of the grid.
    #[inline]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// The window this summary covers.
    #[inline]
    pub fn window(&self) -> AnalysisWindow {
        self.window
    }

    /// One entry for every day in the window, in order.
    #[inline]
    pub fn days(&self) -> &[DailyEvents] {
        &self.days
    }

    /// Number of days with fog at each pixel. Days with missing data do not count.
    #[inline]
    pub fn total(&self) -> &[u32] {
        &self.total
    }

    /// The days in the window that had no data at all.
    pub fn missing_days(&self) -> Vec<NaiveDate> {
        self.days
            .iter()
            .filter(|day| day.is_missing())
            .map(DailyEvents::date)
            .collect()
    }

    /// The days in the window where at least one pixel had no data.
    pub fn incomplete_days(&self) -> Vec<NaiveDate> {
        self.days
            .iter()
            .filter(|day| day.missing_count() > 0)
            .map(DailyEvents::date)
            .collect()
    }

    /// Fail with `MissingData` naming the first day where any pixel had no data, if there is one.
    pub fn require_complete(&self) -> Result<&Self> {
        match self.days.iter().find(|day| day.missing_count() > 0) {
            Some(day) => Err(AnalysisError::MissingData(day.date())),
            None => Ok(self),
        }
    }

    /// Convert to a raster with one band per day and a final `total_fog_events` band.
    ///
    /// Days with fog are 1.0, days without 0.0, and missing days NaN.
    pub fn to_raster_stack(&self) -> Result<RasterStack> {
        let mut stack = RasterStack::new(self.shape);

        for day in &self.days {
            let values = day.events.iter().map(to_layer_value).collect();
            stack.push_layer(day.band_name(), values)?;
        }

        let total = self.total.iter().map(|&n| f64::from(n)).collect();
        stack.push_layer(TOTAL_FOG_EVENTS, total)?;

        Ok(stack)
    }
}

/// Fog flags for every hour of a single day and the number of hours with fog.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySummary {
    shape: GridShape,
    day: NaiveDate,
    hours: Vec<FogFrame>,
    total: Vec<u32>,
}

impl HourlySummary {
    /// Shape of the grid.
    #[inline]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// The day this summary covers.
    #[inline]
    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// The hourly frames in chronological order.
    #[inline]
    pub fn hours(&self) -> &[FogFrame] {
        &self.hours
    }

    /// Number of hours with fog at each pixel. Hours without a sample do not count.
    #[inline]
    pub fn total(&self) -> &[u32] {
        &self.total
    }

    /// Convert to a raster with one band per hour and a final `total_fog_hours` band.
    ///
    /// Hours with fog are 1.0, hours without 0.0, and pixels without a sample NaN.
    pub fn to_raster_stack(&self) -> Result<RasterStack> {
        let mut stack = RasterStack::new(self.shape);

        for frame in &self.hours {
            let values = frame.flags().iter().map(to_layer_value).collect();
            stack.push_layer(frame.band_name(), values)?;
        }

        let total = self.total.iter().map(|&n| f64::from(n)).collect();
        stack.push_layer(TOTAL_FOG_HOURS, total)?;

        Ok(stack)
    }
}

/// Collapse hourly fog flags into daily events for every day in `window`.
///
/// Frames outside the window are ignored. A pixel with no sample at any hour of a day is kept as
/// missing rather than counted as a day without fog, see `DailySummary::missing_days`,
/// `DailySummary::incomplete_days`, and `DailySummary::require_complete`.
///
/// Fails with `EmptyInput` if there are no frames inside the window and `ShapeMismatch` if the
/// frames inside the window are not all the same shape.
pub fn daily_fog_events(frames: &[FogFrame], window: &AnalysisWindow) -> Result<DailySummary> {
    let frames = frames_in_window(frames, window)?;
    let shape = common_shape(&frames)?;

    if let Some(t) = duplicate_valid_time(&frames) {
        warn!("Multiple fog frames valid at {}.", t);
    }

    let mut reduced: Vec<Vec<OptionBool>> =
        vec![vec![OptionBool::None; shape.len()]; window.num_days() as usize];
    for frame in frames {
        let idx = match window.day_index(frame.valid_time()) {
            Some(idx) => idx,
            None => continue,
        };

        for (fog_any, &fog) in reduced[idx].iter_mut().zip(frame.flags()) {
            *fog_any = fog_or(*fog_any, fog);
        }
    }

    let days: Vec<DailyEvents> = window
        .days()
        .zip(reduced)
        .enumerate()
        .map(|(index, (date, events))| {
            let day = DailyEvents {
                date,
                index,
                events,
            };

            if day.is_missing() {
                warn!("No fog frames for {} (day {:03}), marked missing.", date, index);
            } else if day.missing_count() > 0 {
                warn!(
                    "{} pixels without samples on {} (day {:03}), marked missing.",
                    day.missing_count(),
                    date,
                    index
                );
            }

            day
        })
        .collect();

    let mut total = vec![0; shape.len()];
    for day in &days {
        for (count, ev) in total.iter_mut().zip(&day.events) {
            if matches!(ev, OptionBool::SomeTrue) {
                *count += 1;
            }
        }
    }

    Ok(DailySummary {
        shape,
        window: *window,
        days,
        total,
    })
}

/// Keep every hourly frame valid on `day` and count the hours with fog.
///
/// Fails with `EmptyInput` if there are no frames on `day`, `ShapeMismatch` if the frames on
/// `day` are not all the same shape, and `InvalidInput` if two frames are valid at the same time.
pub fn hourly_fog_events(frames: &[FogFrame], day: NaiveDate) -> Result<HourlySummary> {
    let window = AnalysisWindow::single_day(day)?;
    let frames = frames_in_window(frames, &window)?;
    let shape = common_shape(&frames)?;

    if let Some(t) = duplicate_valid_time(&frames) {
        warn!("Multiple fog frames valid at {}.", t);
        return Err(AnalysisError::InvalidInput);
    }

    let mut total = vec![0; shape.len()];
    for frame in &frames {
        for (count, fog) in total.iter_mut().zip(frame.flags()) {
            if matches!(fog, OptionBool::SomeTrue) {
                *count += 1;
            }
        }
    }

    Ok(HourlySummary {
        shape,
        day,
        hours: frames.into_iter().cloned().collect(),
        total,
    })
}

// Missing only if both are missing.
fn fog_or(acc: OptionBool, fog: OptionBool) -> OptionBool {
    match (acc, fog) {
        (OptionBool::SomeTrue, _) | (_, OptionBool::SomeTrue) => OptionBool::SomeTrue,
        (OptionBool::None, OptionBool::None) => OptionBool::None,
        _ => OptionBool::SomeFalse,
    }
}

fn to_layer_value(fog: &OptionBool) -> f64 {
    match fog {
        OptionBool::SomeTrue => 1.0,
        OptionBool::SomeFalse => 0.0,
        OptionBool::None => std::f64::NAN,
    }
}

fn common_shape(frames: &[&FogFrame]) -> Result<GridShape> {
    let shape = frames
        .first()
        .map(|f| f.shape())
        .ok_or(AnalysisError::EmptyInput)?;

    if frames.iter().any(|f| f.shape() != shape) {
        return Err(AnalysisError::ShapeMismatch);
    }

    Ok(shape)
}

// The frames inside the window, sorted by valid time.
fn frames_in_window<'a>(
    frames: &'a [FogFrame],
    window: &AnalysisWindow,
) -> Result<Vec<&'a FogFrame>> {
    let selected: Vec<&FogFrame> = frames
        .iter()
        .filter(|f| window.contains(f.valid_time()))
        .sorted_by_key(|f| f.valid_time())
        .collect();

    debug!(
        "Selected {} of {} fog frames from {} up to {}.",
        selected.len(),
        frames.len(),
        window.start(),
        window.end()
    );

    if selected.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    Ok(selected)
}

// Expects frames sorted by valid time.
fn duplicate_valid_time(frames: &[&FogFrame]) -> Option<NaiveDateTime> {
    frames
        .iter()
        .tuple_windows()
        .find(|(a, b)| a.valid_time() == b.valid_time())
        .map(|(a, _)| a.valid_time())
}
