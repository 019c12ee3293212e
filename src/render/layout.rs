use serde::{Deserialize, Serialize};

use crate::plot3d::camera::SceneCamera;
use crate::state::graph_state::{Axis, Graph};

pub const GRID_COLOR: &str = "#e2e8f0";
pub const BACKGROUND: &str = "white";

/// Legend placement, relative to the plot area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub orientation: String,
    pub x: f64,
    pub x_anchor: String,
    pub y: f64,
    pub y_anchor: String,
}

impl Default for Legend {
    /// Horizontal, centred below the plot.
    fn default() -> Self {
        Self {
            orientation: "h".into(),
            x: 0.5,
            x_anchor: "center".into(),
            y: -0.15,
            y_anchor: "top".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

impl Margin {
    /// Right margin widens to make room for a colour bar.
    pub fn for_color_scale(has_color: bool) -> Self {
        Self {
            l: 60,
            r: if has_color { 100 } else { 30 },
            t: 60,
            b: 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub title: String,
    pub grid_color: String,
    /// `Some(false)` hides the zero line; `None` leaves the renderer default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_line: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Axes {
    Cartesian {
        x: AxisConfig,
        y: AxisConfig,
    },
    Scene {
        x: AxisConfig,
        y: AxisConfig,
        z: AxisConfig,
        background: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        camera: Option<SceneCamera>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: String,
    pub show_legend: bool,
    pub legend: Legend,
    pub paper_background: String,
    pub plot_background: String,
    pub margin: Margin,
    pub axes: Axes,
}

impl Layout {
    pub fn camera(&self) -> Option<SceneCamera> {
        match &self.axes {
            Axes::Scene { camera, .. } => *camera,
            Axes::Cartesian { .. } => None,
        }
    }
}

/// Layout for `graph`. A 3D graph carries `camera` so redraws keep the
/// viewpoint; 2D graphs ignore it.
pub fn build_layout(graph: &Graph, camera: Option<SceneCamera>) -> Layout {
    let is_3d = graph.is_3d();
    let axis = |a: Axis| AxisConfig {
        title: graph.columns.for_axis(a).unwrap_or_default().to_string(),
        grid_color: GRID_COLOR.to_string(),
        zero_line: if is_3d { None } else { Some(false) },
    };

    let axes = if is_3d {
        Axes::Scene {
            x: axis(Axis::X),
            y: axis(Axis::Y),
            z: axis(Axis::Z),
            background: BACKGROUND.to_string(),
            camera,
        }
    } else {
        Axes::Cartesian {
            x: axis(Axis::X),
            y: axis(Axis::Y),
        }
    };

    Layout {
        title: graph.display_title(),
        show_legend: true,
        legend: Legend::default(),
        paper_background: BACKGROUND.to_string(),
        plot_background: BACKGROUND.to_string(),
        margin: Margin::for_color_scale(graph.has_color()),
        axes,
    }
}
