use serde::{Deserialize, Serialize};

use crate::data::dataset::{row_number, Row};
use crate::state::graph_state::{Axis, AxisFilter, Graph};

/// Numeric extent of a column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataRange {
    pub min: f64,
    pub max: f64,
}

impl DataRange {
    /// Range used when a column has no finite values.
    pub const FALLBACK: DataRange = DataRange { min: 0.0, max: 100.0 };

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn clamp(&self, v: f64) -> f64 {
        v.max(self.min).min(self.max)
    }
}

impl Default for DataRange {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Min/max over the finite values of `column`, if there are any.
pub fn finite_extent<'r, I>(rows: I, column: &str) -> Option<DataRange>
where
    I: IntoIterator<Item = &'r Row>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for row in rows {
        let v = row_number(row, column);
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min.is_finite() && max.is_finite() {
        Some(DataRange { min, max })
    } else {
        None
    }
}

/// Slider range for a column: its finite extent, or 0..100 when empty.
pub fn compute_range(rows: &[Row], column: &str) -> DataRange {
    finite_extent(rows, column).unwrap_or(DataRange::FALLBACK)
}

/// Whether a single parsed value passes an axis filter.
///
/// NaN is only rejected by a bound or ignore-zero, never implicitly: with
/// both bounds unset and ignore-zero off everything passes.
pub fn passes(value: f64, filter: &AxisFilter) -> bool {
    if filter.ignore_zero && value == 0.0 {
        return false;
    }
    if let Some(min) = filter.min {
        if value.is_nan() || value < min {
            return false;
        }
    }
    if let Some(max) = filter.max {
        if value.is_nan() || value > max {
            return false;
        }
    }
    true
}

/// Whether `row` passes every active axis filter of `graph`.
///
/// The z filter is only consulted for 3D graphs.
pub fn matches(row: &Row, graph: &Graph) -> bool {
    graph.dimensionality.active_axes().iter().all(|&axis| {
        let value = graph
            .columns
            .for_axis(axis)
            .map(|col| row_number(row, col))
            .unwrap_or(f64::NAN);
        passes(value, graph.filters.get(axis))
    })
}

/// Rows of `rows` that pass the graph's filters, in order.
pub fn filter_rows<'r>(rows: &'r [Row], graph: &Graph) -> Vec<&'r Row> {
    rows.iter().filter(|row| matches(row, graph)).collect()
}

/// Data ranges of the x/y/z columns, used to scale the filter sliders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRangeCache {
    pub x: DataRange,
    pub y: DataRange,
    pub z: DataRange,
}

impl FilterRangeCache {
    pub fn build(rows: &[Row], graph: &Graph) -> Self {
        let range = |axis| {
            graph
                .columns
                .for_axis(axis)
                .map(|col| compute_range(rows, col))
                .unwrap_or(DataRange::FALLBACK)
        };
        Self {
            x: range(Axis::X),
            y: range(Axis::Y),
            z: range(Axis::Z),
        }
    }

    pub fn get(&self, axis: Axis) -> DataRange {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::{row_from, Cell};
    use crate::state::graph_state::Dimensionality;

    fn graph(columns: &[&str]) -> Graph {
        let cols: Vec<String> = columns.iter().map(|s| s.to_string()).collect();
        Graph::new(1, "S", &cols)
    }

    #[test]
    fn range_skips_non_numeric_cells() {
        let rows = vec![
            row_from([("A", Cell::Number(4.0))]),
            row_from([("A", Cell::from("n/a"))]),
            row_from([("A", Cell::Number(-2.0))]),
            row_from([("A", Cell::Null)]),
        ];
        assert_eq!(compute_range(&rows, "A"), DataRange { min: -2.0, max: 4.0 });
    }

    #[test]
    fn range_without_finite_values_falls_back() {
        let rows = vec![row_from([("A", Cell::from("x"))])];
        assert_eq!(compute_range(&rows, "A"), DataRange { min: 0.0, max: 100.0 });
        assert_eq!(compute_range(&[], "A"), DataRange::FALLBACK);
    }

    #[test]
    fn ignore_zero_rejects_exact_zero() {
        let rows = vec![row_from([("X", 0.0), ("Y", 1.0)]), row_from([("X", 5.0), ("Y", 2.0)])];
        let mut g = graph(&["X", "Y"]);
        assert_eq!(filter_rows(&rows, &g).len(), 2);

        g.filters.x.ignore_zero = true;
        let kept = filter_rows(&rows, &g);
        assert_eq!(kept.len(), 1);
        assert_eq!(row_number(kept[0], "X"), 5.0);
    }

    #[test]
    fn ignore_zero_wins_over_wide_bounds() {
        let f = AxisFilter {
            min: Some(-10.0),
            max: Some(10.0),
            ignore_zero: true,
        };
        assert!(!passes(0.0, &f));
        assert!(passes(1.0, &f));
    }

    #[test]
    fn bounds_are_inclusive() {
        let f = AxisFilter {
            min: Some(1.0),
            max: Some(3.0),
            ignore_zero: false,
        };
        assert!(passes(1.0, &f));
        assert!(passes(3.0, &f));
        assert!(!passes(0.5, &f));
        assert!(!passes(3.5, &f));
    }

    #[test]
    fn nan_only_rejected_by_explicit_bound() {
        assert!(passes(f64::NAN, &AxisFilter::default()));
        let f = AxisFilter {
            min: Some(0.0),
            ..Default::default()
        };
        assert!(!passes(f64::NAN, &f));
    }

    #[test]
    fn z_filter_inert_on_2d_graphs() {
        let rows = vec![row_from([("X", 1.0), ("Y", 1.0), ("Z", 0.0)])];
        let mut g = graph(&["X", "Y", "Z"]);
        g.filters.z.ignore_zero = true;
        assert_eq!(filter_rows(&rows, &g).len(), 1);

        g.dimensionality = Dimensionality::ThreeD;
        assert!(filter_rows(&rows, &g).is_empty());
    }

    #[test]
    fn cache_uses_fallback_for_unset_columns() {
        let rows = vec![row_from([("X", 2.0), ("Y", 8.0)])];
        let g = graph(&["X", "Y"]);
        let cache = FilterRangeCache::build(&rows, &g);
        assert_eq!(cache.get(Axis::X), DataRange { min: 2.0, max: 2.0 });
        assert_eq!(cache.get(Axis::Z), DataRange::FALLBACK);
    }
}
