//! Turns overlay definitions into trace geometry.
//!
//! Equation overlays are sampled over the extent of the filtered data;
//! parametric surfaces over `u, v ∈ [0, 2π]`. A failing overlay returns an
//! [`OverlayError`] without affecting its siblings.

use std::f64::consts::TAU;

use crate::data::dataset::Row;
use crate::error::OverlayError;
use crate::processing::expression::Evaluator;
use crate::processing::filter::{finite_extent, DataRange};
use crate::render::trace::{
    DrawMode, Geometry, HoverField, HoverPolicy, LineStyle, Marker, MarkerColor, MeshFaces,
    SurfaceCoords, Trace,
};
use crate::state::graph_state::{Axis, Graph};
use crate::state::overlay::{
    DependentVariable, LineMode, OverlayLine, OverlayPoint, OverlaySurface, Point3, SurfaceMode,
};

/// `n` evenly spaced values from `min` to `max` inclusive.
pub fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let last = (n - 1) as f64;
            (0..n).map(|k| min + (max - min) * k as f64 / last).collect()
        }
    }
}

/// Two triangles per cell of an `n × n` row-major vertex grid.
///
/// Each cell with corners `tl, tr, bl, br` yields `(tl, tr, bl)` and
/// `(bl, tr, br)`, so a grid has `2·(n−1)²` triangles.
pub fn grid_triangles(n: usize) -> MeshFaces {
    let cells = n.saturating_sub(1);
    let mut i = Vec::with_capacity(2 * cells * cells);
    let mut j = Vec::with_capacity(2 * cells * cells);
    let mut k = Vec::with_capacity(2 * cells * cells);
    for row in 0..cells {
        for col in 0..cells {
            let top_left = row * n + col;
            let top_right = top_left + 1;
            let bottom_left = (row + 1) * n + col;
            let bottom_right = bottom_left + 1;

            i.push(top_left);
            j.push(top_right);
            k.push(bottom_left);

            i.push(bottom_left);
            j.push(top_right);
            k.push(bottom_right);
        }
    }
    MeshFaces::Indexed { i, j, k }
}

fn required<'e>(
    expr: &'e str,
    what: &'static str,
    example: &'static str,
) -> Result<&'e str, OverlayError> {
    let expr = expr.trim();
    if expr.is_empty() {
        Err(OverlayError::EmptyExpression { what, example })
    } else {
        Ok(expr)
    }
}

fn split_points(points: &[Point3]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    (
        points.iter().map(|p| p.x).collect(),
        points.iter().map(|p| p.y).collect(),
        points.iter().map(|p| p.z).collect(),
    )
}

/// Builds overlay traces for one graph against its filtered rows.
pub struct OverlayBuilder<'a> {
    graph: &'a Graph,
    rows: &'a [&'a Row],
    line_samples: usize,
    grid: usize,
    evaluator: Evaluator,
}

impl<'a> OverlayBuilder<'a> {
    pub fn new(graph: &'a Graph, rows: &'a [&'a Row]) -> Self {
        Self {
            graph,
            rows,
            line_samples: 101,
            grid: 30,
            evaluator: Evaluator::new(),
        }
    }

    /// Sample counts: points per equation line and nodes per surface side.
    pub fn with_resolution(mut self, line_samples: usize, grid: usize) -> Self {
        self.line_samples = line_samples.max(2);
        self.grid = grid.max(2);
        self
    }

    fn hover(&self, fields: &[HoverField]) -> HoverPolicy {
        HoverPolicy::fields_unless(self.graph.hover.disable_overlay_hover, fields)
    }

    /// Extent of the column bound to `axis` over the filtered rows.
    fn domain(&self, axis: Axis) -> Result<DataRange, OverlayError> {
        let column = self.graph.columns.for_axis(axis);
        column
            .and_then(|col| finite_extent(self.rows.iter().copied(), col))
            .ok_or_else(|| OverlayError::EmptyDomain {
                column: column.unwrap_or(axis.label()).to_string(),
            })
    }

    fn sample<I>(&mut self, expr: &str, bindings: I) -> Result<Vec<f64>, OverlayError>
    where
        I: IntoIterator,
        I::Item: AsRef<[(&'static str, f64)]>,
    {
        let values: Vec<f64> = bindings
            .into_iter()
            .map(|b| self.evaluator.evaluate(expr, b.as_ref()))
            .collect();
        self.evaluator
            .validate_samples(&values)
            .map_err(OverlayError::Expression)?;
        Ok(values)
    }

    /// Like [`Self::sample`], but failed samples stay NaN gaps instead of
    /// failing the build.
    fn sample_unchecked<I>(&mut self, expr: &str, bindings: I) -> Vec<f64>
    where
        I: IntoIterator,
        I::Item: AsRef<[(&'static str, f64)]>,
    {
        let values = bindings
            .into_iter()
            .map(|b| self.evaluator.evaluate(expr, b.as_ref()))
            .collect();
        self.evaluator.take_diagnostic();
        values
    }

    pub fn build_point(&self, point: &OverlayPoint) -> Trace {
        let marker = Marker {
            size: Some(point.size),
            color: Some(MarkerColor::Solid(point.color.clone())),
            symbol: Some(point.symbol.renderer_name().to_string()),
            ..Default::default()
        };
        let (geometry, hover) = if self.graph.is_3d() {
            (
                Geometry::Scatter3d {
                    x: vec![point.x],
                    y: vec![point.y],
                    z: vec![point.z],
                    mode: DrawMode::Markers,
                },
                self.hover(&[HoverField::Name, HoverField::X, HoverField::Y, HoverField::Z]),
            )
        } else {
            (
                Geometry::Scatter2d {
                    x: vec![point.x],
                    y: vec![point.y],
                    mode: DrawMode::Markers,
                },
                self.hover(&[HoverField::Name, HoverField::X, HoverField::Y]),
            )
        };
        Trace::new(point.name.clone(), geometry, hover).with_marker(marker)
    }

    pub fn build_line(&mut self, line: &OverlayLine) -> Result<Trace, OverlayError> {
        let is_3d = self.graph.is_3d();
        let (x, y, z) = match line.mode {
            LineMode::Equation => {
                let y_expr = required(&line.equation.y, "Line equation for y", "2*x + 1")?;
                let domain = self.domain(Axis::X)?;
                let xs = linspace(domain.min, domain.max, self.line_samples);
                let ys = self.sample(y_expr, xs.iter().map(|&x| [("x", x)]))?;
                let zs = match line.equation.z.trim() {
                    "" => vec![0.0; xs.len()],
                    z_expr if is_3d => self.sample_unchecked(z_expr, xs.iter().map(|&x| [("x", x)])),
                    _ => Vec::new(),
                };
                (xs, ys, zs)
            }
            LineMode::Points => {
                if line.points.len() < 2 {
                    return Err(OverlayError::NotEnoughPoints {
                        what: "a line",
                        required: 2,
                        found: line.points.len(),
                    });
                }
                split_points(&line.points)
            }
        };

        let geometry = if is_3d {
            Geometry::Scatter3d {
                x,
                y,
                z,
                mode: DrawMode::Lines,
            }
        } else {
            Geometry::Scatter2d {
                x,
                y,
                mode: DrawMode::Lines,
            }
        };
        Ok(Trace::new(line.name.clone(), geometry, self.hover(&[HoverField::Name]))
            .with_line(LineStyle {
                color: Some(line.color.clone()),
                width: line.width,
            }))
    }

    pub fn build_surface(&mut self, surface: &OverlaySurface) -> Result<Trace, OverlayError> {
        let geometry = match surface.mode {
            SurfaceMode::Equation => self.equation_surface(surface)?,
            SurfaceMode::Parametric => self.parametric_surface(surface)?,
            SurfaceMode::Points => {
                if surface.points.len() < 3 {
                    return Err(OverlayError::NotEnoughPoints {
                        what: "a surface mesh",
                        required: 3,
                        found: surface.points.len(),
                    });
                }
                let (x, y, z) = split_points(&surface.points);
                Geometry::Mesh {
                    x,
                    y,
                    z,
                    faces: MeshFaces::AlphaHull(0.0),
                }
            }
        };
        let hover = self.hover(&[HoverField::X, HoverField::Y, HoverField::Z, HoverField::Name]);
        Ok(Trace::new(surface.name.clone(), geometry, hover)
            .with_surface(&surface.color, surface.opacity))
    }

    fn equation_surface(&mut self, surface: &OverlaySurface) -> Result<Geometry, OverlayError> {
        let expr = required(&surface.equation.expression, "Surface equation", "x^2 + y^2")?;
        let n = self.grid;

        match surface.equation.variable {
            DependentVariable::Z => {
                let xr = self.domain(Axis::X)?;
                let yr = self.domain(Axis::Y)?;
                let xs = linspace(xr.min, xr.max, n);
                let ys = linspace(yr.min, yr.max, n);
                let nodes = ys
                    .iter()
                    .flat_map(|&y| xs.iter().map(move |&x| [("x", x), ("y", y)]));
                let flat = self.sample(expr, nodes)?;
                let z = flat.chunks(n).map(<[f64]>::to_vec).collect();
                Ok(Geometry::Surface {
                    x: SurfaceCoords::Axis(xs),
                    y: SurfaceCoords::Axis(ys),
                    z,
                })
            }
            DependentVariable::Y => {
                let xr = self.domain(Axis::X)?;
                let zr = self.domain(Axis::Z)?;
                let (x, z) = grid_nodes(xr, zr, n);
                let nodes = x.iter().zip(&z).map(|(&x, &z)| [("x", x), ("z", z)]);
                let y = self.sample(expr, nodes)?;
                Ok(Geometry::Mesh {
                    x,
                    y,
                    z,
                    faces: grid_triangles(n),
                })
            }
            DependentVariable::X => {
                let yr = self.domain(Axis::Y)?;
                let zr = self.domain(Axis::Z)?;
                let (y, z) = grid_nodes(yr, zr, n);
                let nodes = y.iter().zip(&z).map(|(&y, &z)| [("y", y), ("z", z)]);
                let x = self.sample(expr, nodes)?;
                Ok(Geometry::Mesh {
                    x,
                    y,
                    z,
                    faces: grid_triangles(n),
                })
            }
        }
    }

    fn parametric_surface(&mut self, surface: &OverlaySurface) -> Result<Geometry, OverlayError> {
        let eq = &surface.parametric;
        let x_expr = required(&eq.x, "Parametric equation for x", "cos(u)*sin(v)")?;
        let y_expr = required(&eq.y, "Parametric equation for y", "sin(u)*sin(v)")?;
        let z_expr = required(&eq.z, "Parametric equation for z", "cos(v)")?;

        let n = self.grid;
        let params = linspace(0.0, TAU, n);
        // Rows follow v, columns follow u; `t` is an alias for `u`.
        let nodes: Vec<[(&'static str, f64); 3]> = params
            .iter()
            .flat_map(|&v| params.iter().map(move |&u| [("t", u), ("u", u), ("v", v)]))
            .collect();

        let mut grid = |expr: &str| -> Result<Vec<Vec<f64>>, OverlayError> {
            let flat = self.sample(expr, nodes.iter())?;
            Ok(flat.chunks(n).map(<[f64]>::to_vec).collect())
        };
        let x = grid(x_expr)?;
        let y = grid(y_expr)?;
        let z = grid(z_expr)?;

        Ok(Geometry::Surface {
            x: SurfaceCoords::Grid(x),
            y: SurfaceCoords::Grid(y),
            z,
        })
    }
}

/// Row-major vertex coordinates of an `n × n` grid: `a` varies along a
/// row, `b` between rows.
fn grid_nodes(a: DataRange, b: DataRange, n: usize) -> (Vec<f64>, Vec<f64>) {
    let avals = linspace(a.min, a.max, n);
    let bvals = linspace(b.min, b.max, n);
    let mut out_a = Vec::with_capacity(n * n);
    let mut out_b = Vec::with_capacity(n * n);
    for &bv in &bvals {
        for &av in &avals {
            out_a.push(av);
            out_b.push(bv);
        }
    }
    (out_a, out_b)
}
