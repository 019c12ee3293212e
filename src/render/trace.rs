//! Renderer-agnostic trace descriptors.
//!
//! These mirror what a plotting backend needs to draw one series: the
//! geometry with its coordinate arrays, optional styling, and the hover
//! policy. NaN coordinates serialize as `null`, which renderers treat as
//! gaps.

use serde::{Deserialize, Serialize};

/// Named colour scale used for data-driven marker colours.
pub const COLOR_SCALE: &str = "Viridis";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    Markers,
    Lines,
    LinesMarkers,
}

/// Coordinates along one side of a surface: a 1-D axis shared by every
/// row, or a full grid for parametric surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SurfaceCoords {
    Axis(Vec<f64>),
    Grid(Vec<Vec<f64>>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshFaces {
    /// Explicit triangles as vertex index triples `(i[n], j[n], k[n])`.
    Indexed {
        i: Vec<usize>,
        j: Vec<usize>,
        k: Vec<usize>,
    },
    /// Let the renderer triangulate; `0` asks for a Delaunay hull.
    AlphaHull(f64),
}

impl MeshFaces {
    pub fn triangle_count(&self) -> usize {
        match self {
            MeshFaces::Indexed { i, .. } => i.len(),
            MeshFaces::AlphaHull(_) => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    Scatter2d {
        x: Vec<f64>,
        y: Vec<f64>,
        mode: DrawMode,
    },
    Bar {
        x: Vec<f64>,
        y: Vec<f64>,
    },
    Scatter3d {
        x: Vec<f64>,
        y: Vec<f64>,
        z: Vec<f64>,
        mode: DrawMode,
    },
    /// Filled surface; `z[row][col]`.
    Surface {
        x: SurfaceCoords,
        y: SurfaceCoords,
        z: Vec<Vec<f64>>,
    },
    Mesh {
        x: Vec<f64>,
        y: Vec<f64>,
        z: Vec<f64>,
        faces: MeshFaces,
    },
}

impl Geometry {
    /// Number of plotted positions (vertices or grid nodes).
    pub fn len(&self) -> usize {
        match self {
            Geometry::Scatter2d { x, .. }
            | Geometry::Bar { x, .. }
            | Geometry::Scatter3d { x, .. }
            | Geometry::Mesh { x, .. } => x.len(),
            Geometry::Surface { z, .. } => z.iter().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkerColor {
    Solid(String),
    Values(Vec<f64>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<MarkerColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<String>,
    pub show_scale: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorbar_title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub width: f64,
}

/// Uniform colour and opacity of a surface or mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceStyle {
    pub color: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverField {
    Name,
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", content = "value", rename_all = "snake_case")]
pub enum HoverPolicy {
    /// One prepared label per data point.
    Text(Vec<String>),
    /// Renderer-generated label built from these fields.
    Fields(Vec<HoverField>),
    /// No hover label at all.
    Skip,
}

impl HoverPolicy {
    /// `fields`, or `Skip` when overlay hover is disabled.
    pub fn fields_unless(disabled: bool, fields: &[HoverField]) -> Self {
        if disabled {
            HoverPolicy::Skip
        } else {
            HoverPolicy::Fields(fields.to_vec())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub name: String,
    pub geometry: Geometry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<SurfaceStyle>,
    pub hover: HoverPolicy,
}

impl Trace {
    pub fn new(name: impl Into<String>, geometry: Geometry, hover: HoverPolicy) -> Self {
        Self {
            name: name.into(),
            geometry,
            marker: None,
            line: None,
            surface: None,
            hover,
        }
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_surface(mut self, color: &str, opacity: f64) -> Self {
        self.surface = Some(SurfaceStyle {
            color: color.to_string(),
            opacity,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_len_counts_grid_nodes() {
        let g = Geometry::Surface {
            x: SurfaceCoords::Axis(vec![0.0, 1.0]),
            y: SurfaceCoords::Axis(vec![0.0, 1.0, 2.0]),
            z: vec![vec![0.0; 2]; 3],
        };
        assert_eq!(g.len(), 6);
    }

    #[test]
    fn serializes_with_kind_tag_and_null_gaps() {
        let trace = Trace::new(
            "t",
            Geometry::Scatter2d {
                x: vec![1.0, f64::NAN],
                y: vec![2.0, 3.0],
                mode: DrawMode::Markers,
            },
            HoverPolicy::Skip,
        );
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["geometry"]["kind"], "scatter2d");
        assert!(json["geometry"]["x"][1].is_null());
        assert_eq!(json["hover"]["policy"], "skip");
        assert!(json.get("marker").is_none());
    }

    #[test]
    fn hover_disabled_skips() {
        assert_eq!(HoverPolicy::fields_unless(true, &[HoverField::Name]), HoverPolicy::Skip);
        assert_eq!(
            HoverPolicy::fields_unless(false, &[HoverField::Name]),
            HoverPolicy::Fields(vec![HoverField::Name])
        );
    }
}
