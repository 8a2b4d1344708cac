//! Equal-time divisions of one orbital period with per-interval swept-area totals.
//!
//! The planner only knows about time and area: the caller feeds it the area
//! swept during each integrator sub-step and the planner splits that area
//! between the intervals the sub-step overlaps, in proportion to time.

use serde::Serialize;
use thiserror::Error;

/// Smallest division count offered to learners.
pub const MIN_DIVISIONS: usize = 2;
/// Largest division count offered to learners.
pub const MAX_DIVISIONS: usize = 6;
pub const DEFAULT_DIVISIONS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DivisionError {
    #[error("division count must be between 2 and 6 (got {0})")]
    CountOutOfRange(usize),
}

/// One equal-time interval of the orbit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub index: usize,
    /// k·T/n, offset from the last reset.
    pub start_time: f64,
    /// Area swept while inside this interval, summed over every lap.
    pub area: f64,
    /// Most recent time the body entered this interval, at or before the
    /// current elapsed time. Rewinding rolls it back.
    pub last_crossing: Option<f64>,
}

/// Accumulates swept area per equal-time interval of a bound orbit.
#[derive(Debug, Clone)]
pub struct DivisionPlanner {
    count: usize,
    period: Option<f64>,
    elapsed: f64,
    areas: Vec<f64>,
    crossings: Vec<Option<f64>>,
    total: f64,
}

impl DivisionPlanner {
    /// Planner with `count` divisions and no period (undefined until [`reset`](Self::reset)).
    pub fn new(count: usize) -> Result<Self, DivisionError> {
        check_count(count)?;
        let mut planner = Self {
            count,
            period: None,
            elapsed: 0.0,
            areas: Vec::new(),
            crossings: Vec::new(),
            total: 0.0,
        };
        planner.reset(None);
        Ok(planner)
    }

    pub fn division_count(&self) -> usize {
        self.count
    }

    /// Change the number of divisions and restart accumulation.
    ///
    /// Out-of-range counts are rejected without touching the planner.
    pub fn set_division_count(&mut self, count: usize) -> Result<(), DivisionError> {
        check_count(count)?;
        self.count = count;
        self.reset(self.period);
        Ok(())
    }

    /// Clear all accumulators. `period` must be finite and positive for the
    /// divisions to be defined.
    pub fn reset(&mut self, period: Option<f64>) {
        self.period = period.filter(|t| t.is_finite() && *t > 0.0);
        self.elapsed = 0.0;
        self.total = 0.0;
        self.areas = vec![0.0; self.count];
        self.crossings = vec![None; self.count];
        if self.period.is_some() {
            self.crossings[0] = Some(0.0);
        }
    }

    pub fn is_defined(&self) -> bool {
        self.period.is_some()
    }

    pub fn period(&self) -> Option<f64> {
        self.period
    }

    /// T/n.
    pub fn interval_duration(&self) -> Option<f64> {
        self.period.map(|t| t / self.count as f64)
    }

    /// Time accounted for since the last reset.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Completed periods since the last reset.
    pub fn laps(&self) -> usize {
        match self.period {
            Some(period) if self.elapsed > 0.0 => (self.elapsed / period).floor() as usize,
            _ => 0,
        }
    }

    /// Interval the body is currently in.
    pub fn active_interval(&self) -> Option<usize> {
        let width = self.interval_duration()?;
        Some(self.wrap(interval_index(self.elapsed, width)))
    }

    /// Per-interval areas, always `division_count()` long. All zero while undefined.
    pub fn division_areas(&self) -> &[f64] {
        &self.areas
    }

    /// Area swept since the last reset.
    pub fn total_area_swept(&self) -> f64 {
        self.total
    }

    pub fn markers(&self) -> Option<Vec<Marker>> {
        let width = self.interval_duration()?;
        Some(
            (0..self.count)
                .map(|index| Marker {
                    index,
                    start_time: index as f64 * width,
                    area: self.areas[index],
                    last_crossing: self.crossings[index],
                })
                .collect(),
        )
    }

    /// Account for `area` swept over `duration` of simulated time.
    ///
    /// Negative durations (with negative areas) rewind the accumulators. No-op
    /// while the divisions are undefined.
    pub fn on_step(&mut self, duration: f64, area: f64) {
        let Some(width) = self.interval_duration() else {
            return;
        };
        if !duration.is_finite() || !area.is_finite() {
            return;
        }

        if duration == 0.0 {
            if area != 0.0 {
                let k = self.wrap(interval_index(self.elapsed, width));
                self.areas[k] += area;
                self.total += area;
            }
            return;
        }

        let start = self.elapsed;
        let end = start + duration;
        let rate = area / duration;

        if duration > 0.0 {
            self.distribute_forward(start, end, rate, width);
        } else {
            self.distribute_backward(start, end, rate, width);
        }

        self.total += area;
        self.elapsed = end;
    }

    fn distribute_forward(&mut self, start: f64, end: f64, rate: f64, width: f64) {
        let mut t = start;
        while t < end {
            let mut k = interval_index(t, width);
            let mut boundary = (k + 1) as f64 * width;
            if boundary <= t {
                k += 1;
                boundary = (k + 1) as f64 * width;
            }
            let seg_end = boundary.min(end);
            let slot = self.wrap(k);
            self.areas[slot] += rate * (seg_end - t);
            if seg_end == boundary {
                let entered = self.wrap(k + 1);
                self.crossings[entered] = Some(boundary);
            }
            t = seg_end;
        }
    }

    /// Undo forward accounting back to `end`.
    ///
    /// Leaving interval k backwards through its lower boundary forgets that
    /// entry, so its marker falls back to the entry one period earlier.
    fn distribute_backward(&mut self, start: f64, end: f64, rate: f64, width: f64) {
        let period = width * self.count as f64;
        let mut t = start;
        while t > end {
            let mut k = (t / width).ceil() as i64 - 1;
            let mut lower = k as f64 * width;
            if lower >= t {
                k -= 1;
                lower = k as f64 * width;
            }
            let seg_start = lower.max(end);
            let slot = self.wrap(k);
            self.areas[slot] -= rate * (t - seg_start);
            if lower > end {
                let previous = lower - period;
                self.crossings[slot] = (previous >= 0.0).then_some(previous);
            }
            t = seg_start;
        }
    }

    fn wrap(&self, k: i64) -> usize {
        k.rem_euclid(self.count as i64) as usize
    }
}

impl Default for DivisionPlanner {
    fn default() -> Self {
        Self {
            count: DEFAULT_DIVISIONS,
            period: None,
            elapsed: 0.0,
            areas: vec![0.0; DEFAULT_DIVISIONS],
            crossings: vec![None; DEFAULT_DIVISIONS],
            total: 0.0,
        }
    }
}

fn check_count(count: usize) -> Result<(), DivisionError> {
    if (MIN_DIVISIONS..=MAX_DIVISIONS).contains(&count) {
        Ok(())
    } else {
        Err(DivisionError::CountOutOfRange(count))
    }
}

fn interval_index(t: f64, width: f64) -> i64 {
    (t / width).floor() as i64
}
