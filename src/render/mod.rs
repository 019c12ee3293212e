pub mod layout;
pub mod main_trace;
pub mod overlay;
pub mod trace;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::data::dataset::Row;
use crate::plot3d::camera::SceneCamera;
use crate::processing::filter::filter_rows;
use crate::state::graph_state::Graph;
use crate::state::overlay::display_name;

pub use layout::{build_layout, Layout};
pub use overlay::OverlayBuilder;
pub use trace::Trace;

/// Sampling resolution for overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub line_samples: usize,
    pub surface_grid: usize,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            line_samples: 101,
            surface_grid: 30,
        }
    }
}

/// Everything the renderer needs for one graph, plus the non-fatal
/// warnings produced while assembling it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOutcome {
    pub traces: Vec<Trace>,
    pub layout: Layout,
    pub warnings: Vec<String>,
}

/// Assemble the main series and every visible overlay of `graph`.
///
/// Overlay failures are reported as warnings and the overlay is left out.
/// Surfaces are only drawn on 3D graphs.
pub fn render_graph(
    graph: &Graph,
    rows: &[Row],
    camera: Option<SceneCamera>,
    resolution: Resolution,
) -> RenderOutcome {
    let filtered = filter_rows(rows, graph);
    let mut warnings = Vec::new();
    if filtered.is_empty() {
        warn!(graph = graph.id, "no data after applying filters");
        warnings.push("No data after applying filters".to_string());
    }

    let mut traces = vec![main_trace::build_main_trace(&filtered, graph)];
    let mut builder = OverlayBuilder::new(graph, &filtered)
        .with_resolution(resolution.line_samples, resolution.surface_grid);
    let overlays = &graph.overlays;

    for point in overlays.points.iter().filter(|p| p.visible) {
        traces.push(builder.build_point(point));
    }

    for (index, line) in overlays.lines.iter().enumerate() {
        if !line.visible {
            continue;
        }
        let name = display_name(&line.name, "Line", index);
        match builder.build_line(line) {
            Ok(trace) if !trace.geometry.is_empty() => traces.push(trace),
            Ok(_) => warnings.push(format!(
                "Overlay line \"{name}\" produced no valid data. Check your equation or points."
            )),
            Err(err) => {
                warn!(graph = graph.id, overlay = %name, error = %err, "overlay line failed");
                warnings.push(format!("Error in overlay line \"{name}\": {err}"));
            }
        }
    }

    if graph.is_3d() {
        for (index, surface) in overlays.surfaces.iter().enumerate() {
            if !surface.visible {
                continue;
            }
            let name = display_name(&surface.name, "Surface", index);
            match builder.build_surface(surface) {
                Ok(trace) if !trace.geometry.is_empty() => traces.push(trace),
                Ok(_) => warnings.push(format!(
                    "Overlay surface \"{name}\" produced no valid data. Check your equation or add more points."
                )),
                Err(err) => {
                    warn!(graph = graph.id, overlay = %name, error = %err, "overlay surface failed");
                    warnings.push(format!("Error in overlay surface \"{name}\": {err}"));
                }
            }
        }
    }

    let camera = if graph.is_3d() { camera } else { None };
    RenderOutcome {
        traces,
        layout: build_layout(graph, camera),
        warnings,
    }
}
