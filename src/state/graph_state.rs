use serde::{Deserialize, Serialize};

use crate::state::overlay::OverlaySet;

/// Identifier of a graph within a session. Assigned monotonically.
pub type GraphId = u64;

/// A filterable coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Which end of a filter range is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dimensionality {
    #[default]
    #[serde(rename = "2D")]
    TwoD,
    #[serde(rename = "2D with Color")]
    TwoDColor,
    #[serde(rename = "3D")]
    ThreeD,
    #[serde(rename = "3D with Color")]
    ThreeDColor,
}

impl Dimensionality {
    pub const ALL: [Dimensionality; 4] = [
        Dimensionality::TwoD,
        Dimensionality::TwoDColor,
        Dimensionality::ThreeD,
        Dimensionality::ThreeDColor,
    ];

    pub fn is_3d(&self) -> bool {
        matches!(self, Dimensionality::ThreeD | Dimensionality::ThreeDColor)
    }

    pub fn has_color(&self) -> bool {
        matches!(self, Dimensionality::TwoDColor | Dimensionality::ThreeDColor)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dimensionality::TwoD => "2D",
            Dimensionality::TwoDColor => "2D with Color",
            Dimensionality::ThreeD => "3D",
            Dimensionality::ThreeDColor => "3D with Color",
        }
    }

    /// Axes whose filters take part in row filtering.
    pub fn active_axes(&self) -> &'static [Axis] {
        if self.is_3d() {
            &Axis::ALL
        } else {
            &[Axis::X, Axis::Y]
        }
    }
}

/// How the main data series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeriesKind {
    #[default]
    Scatter,
    Line,
    Bar,
    #[serde(rename = "3D Scatter")]
    Scatter3D,
}

impl SeriesKind {
    /// The kinds a graph of the given dimensionality may use.
    pub fn options_for(dim: Dimensionality) -> &'static [SeriesKind] {
        if dim.is_3d() {
            &[SeriesKind::Scatter3D]
        } else {
            &[SeriesKind::Scatter, SeriesKind::Line, SeriesKind::Bar]
        }
    }

    pub fn default_for(dim: Dimensionality) -> SeriesKind {
        Self::options_for(dim)[0]
    }

    pub fn is_valid_for(&self, dim: Dimensionality) -> bool {
        Self::options_for(dim).contains(self)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeriesKind::Scatter => "Scatter",
            SeriesKind::Line => "Line",
            SeriesKind::Bar => "Bar",
            SeriesKind::Scatter3D => "3D Scatter",
        }
    }
}

/// A column role that can be bound to a sheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    X,
    Y,
    Z,
    Color,
}

impl ColumnRole {
    /// The filter axis driven by this role, if any.
    pub fn axis(&self) -> Option<Axis> {
        match self {
            ColumnRole::X => Some(Axis::X),
            ColumnRole::Y => Some(Axis::Y),
            ColumnRole::Z => Some(Axis::Z),
            ColumnRole::Color => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub x: String,
    pub y: String,
    pub z: Option<String>,
    pub color: Option<String>,
}

impl ColumnMapping {
    /// Map x/y/z to the first three columns of a sheet.
    pub fn from_sheet_columns(columns: &[String]) -> Self {
        Self {
            x: columns.first().cloned().unwrap_or_default(),
            y: columns.get(1).cloned().unwrap_or_default(),
            z: columns.get(2).cloned(),
            color: None,
        }
    }

    /// Column bound to `axis`; `None` when unset or blank.
    pub fn for_axis(&self, axis: Axis) -> Option<&str> {
        let name = match axis {
            Axis::X => Some(self.x.as_str()),
            Axis::Y => Some(self.y.as_str()),
            Axis::Z => self.z.as_deref(),
        };
        name.filter(|n| !n.is_empty())
    }

    pub fn color_column(&self) -> Option<&str> {
        self.color.as_deref().filter(|n| !n.is_empty())
    }

    pub fn set(&mut self, role: ColumnRole, column: Option<String>) {
        match role {
            ColumnRole::X => self.x = column.unwrap_or_default(),
            ColumnRole::Y => self.y = column.unwrap_or_default(),
            ColumnRole::Z => self.z = column,
            ColumnRole::Color => self.color = column,
        }
    }
}

/// Per-axis row filter. Unset bounds mean the full data range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisFilter {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub ignore_zero: bool,
}

impl AxisFilter {
    pub fn bound(&self, bound: Bound) -> Option<f64> {
        match bound {
            Bound::Min => self.min,
            Bound::Max => self.max,
        }
    }

    pub fn set_bound(&mut self, bound: Bound, value: Option<f64>) {
        match bound {
            Bound::Min => self.min = value,
            Bound::Max => self.max = value,
        }
    }

    pub fn clear_bounds(&mut self) {
        self.min = None;
        self.max = None;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisFilters {
    pub x: AxisFilter,
    pub y: AxisFilter,
    pub z: AxisFilter,
}

impl AxisFilters {
    pub fn get(&self, axis: Axis) -> &AxisFilter {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    pub fn get_mut(&mut self, axis: Axis) -> &mut AxisFilter {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

/// Extra hover columns and the overlay hover switch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoverSettings {
    pub fields: Vec<String>,
    pub disable_overlay_hover: bool,
}

/// Everything about a graph that undo/redo restores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub title: String,
    pub sheet_name: String,
    pub dimensionality: Dimensionality,
    pub series_kind: SeriesKind,
    pub columns: ColumnMapping,
    pub filters: AxisFilters,
    pub hover: HoverSettings,
    pub overlays: OverlaySet,
}

/// One configured visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub id: GraphId,
    pub title: String,
    pub sheet_name: String,
    pub dimensionality: Dimensionality,
    pub series_kind: SeriesKind,
    pub columns: ColumnMapping,
    pub filters: AxisFilters,
    pub hover: HoverSettings,
    pub overlays: OverlaySet,
}

impl Graph {
    /// A new 2D scatter graph bound to the first columns of `sheet_name`.
    pub fn new(id: GraphId, sheet_name: &str, sheet_columns: &[String]) -> Self {
        Self {
            id,
            title: format!("Graph {id}"),
            sheet_name: sheet_name.to_string(),
            dimensionality: Dimensionality::TwoD,
            series_kind: SeriesKind::Scatter,
            columns: ColumnMapping::from_sheet_columns(sheet_columns),
            filters: AxisFilters::default(),
            hover: HoverSettings::default(),
            overlays: OverlaySet::default(),
        }
    }

    pub fn is_3d(&self) -> bool {
        self.dimensionality.is_3d()
    }

    pub fn has_color(&self) -> bool {
        self.dimensionality.has_color()
    }

    /// Title used when drawing; a blank title falls back to `Graph <id>`.
    pub fn display_title(&self) -> String {
        if self.title.trim().is_empty() {
            format!("Graph {}", self.id)
        } else {
            self.title.clone()
        }
    }

    /// Label above an axis filter, e.g. `"Pressure Filter"`.
    pub fn filter_label(&self, axis: Axis) -> String {
        match self.columns.for_axis(axis) {
            Some(column) => format!("{column} Filter"),
            None => format!("{}-Axis Filter", axis.label()),
        }
    }

    /// Change dimensionality, resetting the series kind when crossing
    /// between 2D and 3D.
    pub fn set_dimensionality(&mut self, dim: Dimensionality) {
        let crosses = dim.is_3d() != self.dimensionality.is_3d();
        self.dimensionality = dim;
        if crosses || !self.series_kind.is_valid_for(dim) {
            self.series_kind = SeriesKind::default_for(dim);
        }
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            title: self.title.clone(),
            sheet_name: self.sheet_name.clone(),
            dimensionality: self.dimensionality,
            series_kind: self.series_kind,
            columns: self.columns.clone(),
            filters: self.filters,
            hover: self.hover.clone(),
            overlays: self.overlays.clone(),
        }
    }

    /// Overwrite every configurable field with a copy of `snapshot`.
    pub fn restore(&mut self, snapshot: &GraphSnapshot) {
        self.title = snapshot.title.clone();
        self.sheet_name = snapshot.sheet_name.clone();
        self.dimensionality = snapshot.dimensionality;
        self.series_kind = snapshot.series_kind;
        self.columns = snapshot.columns.clone();
        self.filters = snapshot.filters;
        self.hover = snapshot.hover.clone();
        self.overlays = snapshot.overlays.clone();
    }

    /// Copy data-binding settings (not title, overlays or hover) from `source`.
    pub fn copy_settings_from(&mut self, source: &Graph) {
        self.sheet_name = source.sheet_name.clone();
        self.dimensionality = source.dimensionality;
        self.series_kind = source.series_kind;
        self.columns = source.columns.clone();
        self.filters = source.filters;
    }
}
