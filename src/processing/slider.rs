use serde::{Deserialize, Serialize};

use crate::data::dataset::{format_number, parse_leading_float};
use crate::processing::filter::{DataRange, FilterRangeCache};
use crate::state::graph_state::{Axis, AxisFilter, AxisFilters, Bound};

/// Highlighted part of a slider track, in percent of the full track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderTrack {
    pub left: f64,
    pub width: f64,
}

/// A dual-handle range slider kept in sync with two text fields.
///
/// Handles sit on a grid of `steps` equal steps across the data range.
/// The text fields hold what the user typed (or the formatted handle value
/// after a drag); an empty text means the bound is unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSlider {
    range: DataRange,
    steps: u32,
    low: f64,
    high: f64,
    low_text: String,
    high_text: String,
}

impl RangeSlider {
    /// Full-range slider with both bounds unset.
    pub fn new(range: DataRange, steps: u32) -> Self {
        Self {
            range,
            steps: steps.max(1),
            low: range.min,
            high: range.max,
            low_text: String::new(),
            high_text: String::new(),
        }
    }

    /// Slider positioned at the bounds of `filter`, or the range ends.
    pub fn from_filter(range: DataRange, steps: u32, filter: &AxisFilter) -> Self {
        let mut slider = Self::new(range, steps);
        for bound in [Bound::Min, Bound::Max] {
            if let Some(v) = filter.bound(bound) {
                *slider.text_mut(bound) = format_number(v);
                let pos = slider.place(v);
                *slider.handle_mut(bound) = pos;
            }
        }
        slider
    }

    pub fn range(&self) -> DataRange {
        self.range
    }

    pub fn handle(&self, bound: Bound) -> f64 {
        match bound {
            Bound::Min => self.low,
            Bound::Max => self.high,
        }
    }

    pub fn text(&self, bound: Bound) -> &str {
        match bound {
            Bound::Min => &self.low_text,
            Bound::Max => &self.high_text,
        }
    }

    /// Step size; 1 when the range is degenerate.
    pub fn step(&self) -> f64 {
        let span = self.range.span();
        if span > 0.0 {
            span / f64::from(self.steps)
        } else {
            1.0
        }
    }

    /// Text edit: store the text and move the handle to its clamped value.
    /// Unparseable text parks the handle on its own end of the range.
    ///
    /// Returns the filter bound the text denotes (`None` when it is not a
    /// number).
    pub fn set_text(&mut self, bound: Bound, text: &str) -> Option<f64> {
        *self.text_mut(bound) = text.to_string();
        let parsed = parse_bound(text);
        let target = parsed.unwrap_or(match bound {
            Bound::Min => self.range.min,
            Bound::Max => self.range.max,
        });
        let pos = self.place(target);
        *self.handle_mut(bound) = pos;
        parsed
    }

    /// Drag a handle. The low handle never passes the high one and vice
    /// versa; the text follows the handle.
    pub fn drag(&mut self, bound: Bound, value: f64) -> f64 {
        let mut v = self.place(value);
        match bound {
            Bound::Min => v = v.min(self.high),
            Bound::Max => v = v.max(self.low),
        }
        *self.handle_mut(bound) = v;
        *self.text_mut(bound) = format_handle(v);
        v
    }

    /// Rescale to `range` with both bounds unset and the handles at its ends.
    pub fn reset(&mut self, range: DataRange) {
        self.range = range;
        self.low = self.range.min;
        self.high = self.range.max;
        self.low_text.clear();
        self.high_text.clear();
    }

    /// Highlighted track between the handles.
    pub fn track(&self) -> SliderTrack {
        let span = self.range.span();
        if span == 0.0 {
            return SliderTrack {
                left: 0.0,
                width: 100.0,
            };
        }
        let left = (self.low - self.range.min) / span * 100.0;
        let right = (self.high - self.range.min) / span * 100.0;
        SliderTrack {
            left,
            width: right - left,
        }
    }

    // Clamp into the range and snap to the step grid.
    fn place(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return if value > 0.0 { self.range.max } else { self.range.min };
        }
        let span = self.range.span();
        if span <= 0.0 {
            return self.range.min;
        }
        let steps = f64::from(self.steps);
        let k = ((self.range.clamp(value) - self.range.min) / self.step()).round();
        self.range.clamp(self.range.min + k * span / steps)
    }

    fn handle_mut(&mut self, bound: Bound) -> &mut f64 {
        match bound {
            Bound::Min => &mut self.low,
            Bound::Max => &mut self.high,
        }
    }

    fn text_mut(&mut self, bound: Bound) -> &mut String {
        match bound {
            Bound::Min => &mut self.low_text,
            Bound::Max => &mut self.high_text,
        }
    }
}

/// Filter bound typed into a text field; blank or non-numeric is unset.
pub fn parse_bound(text: &str) -> Option<f64> {
    let v = parse_leading_float(text);
    if v.is_nan() {
        None
    } else {
        Some(v)
    }
}

/// Handle value as shown in its text field: integers plain, others with
/// two decimals.
pub fn format_handle(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format_number(v)
    } else {
        format!("{v:.2}")
    }
}

/// The three sliders of a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSliders {
    pub x: RangeSlider,
    pub y: RangeSlider,
    pub z: RangeSlider,
}

impl AxisSliders {
    pub fn build(ranges: &FilterRangeCache, filters: &AxisFilters, steps: u32) -> Self {
        let slider = |axis| RangeSlider::from_filter(ranges.get(axis), steps, filters.get(axis));
        Self {
            x: slider(Axis::X),
            y: slider(Axis::Y),
            z: slider(Axis::Z),
        }
    }

    pub fn get(&self, axis: Axis) -> &RangeSlider {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    pub fn get_mut(&mut self, axis: Axis) -> &mut RangeSlider {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}
