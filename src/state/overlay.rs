use serde::{Deserialize, Serialize};

/// Default colors for newly added overlays.
pub const POINT_COLOR: &str = "#ef4444";
pub const LINE_COLOR: &str = "#3b82f6";
pub const SURFACE_COLOR: &str = "#10b981";

/// Marker symbol for an overlay point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSymbol {
    #[default]
    Circle,
    Square,
    Diamond,
    Cross,
    X,
    Triangle,
    Star,
}

impl MarkerSymbol {
    pub const ALL: [MarkerSymbol; 7] = [
        MarkerSymbol::Circle,
        MarkerSymbol::Square,
        MarkerSymbol::Diamond,
        MarkerSymbol::Cross,
        MarkerSymbol::X,
        MarkerSymbol::Triangle,
        MarkerSymbol::Star,
    ];

    /// Symbol name understood by the renderer.
    pub fn renderer_name(&self) -> &'static str {
        match self {
            MarkerSymbol::Circle => "circle",
            MarkerSymbol::Square => "square",
            MarkerSymbol::Diamond => "diamond",
            MarkerSymbol::Cross => "cross",
            MarkerSymbol::X => "x",
            MarkerSymbol::Triangle => "triangle-up",
            MarkerSymbol::Star => "star",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarkerSymbol::Circle => "Circle",
            MarkerSymbol::Square => "Square",
            MarkerSymbol::Diamond => "Diamond",
            MarkerSymbol::Cross => "Cross",
            MarkerSymbol::X => "X",
            MarkerSymbol::Triangle => "Triangle",
            MarkerSymbol::Star => "Star",
        }
    }
}

/// A literal coordinate in an explicit point list. `z` is ignored in 2D.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayPoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub color: String,
    pub size: f64,
    pub symbol: MarkerSymbol,
    pub visible: bool,
}

impl OverlayPoint {
    /// A fresh point at the origin, named after its 1-based position.
    pub fn numbered(n: usize) -> Self {
        Self {
            name: format!("Point {n}"),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            color: POINT_COLOR.to_string(),
            size: 12.0,
            symbol: MarkerSymbol::Circle,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineMode {
    #[default]
    Equation,
    Points,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineEquation {
    /// y as a function of x.
    pub y: String,
    /// z as a function of x; only used on 3D graphs.
    pub z: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayLine {
    pub name: String,
    pub color: String,
    pub width: f64,
    pub mode: LineMode,
    pub equation: LineEquation,
    pub points: Vec<Point3>,
    pub visible: bool,
}

impl OverlayLine {
    pub fn numbered(n: usize) -> Self {
        Self {
            name: format!("Line {n}"),
            color: LINE_COLOR.to_string(),
            width: 2.0,
            mode: LineMode::Equation,
            equation: LineEquation::default(),
            points: Vec::new(),
            visible: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceMode {
    /// One coordinate as a function of the other two.
    #[default]
    Equation,
    /// x, y and z as functions of (u, v).
    Parametric,
    /// Literal point cloud, triangulated by the renderer.
    Points,
}

/// The coordinate an equation surface solves for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependentVariable {
    X,
    Y,
    #[default]
    Z,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceEquation {
    pub variable: DependentVariable,
    pub expression: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParametricEquations {
    pub x: String,
    pub y: String,
    pub z: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySurface {
    pub name: String,
    pub color: String,
    pub opacity: f64,
    pub mode: SurfaceMode,
    pub equation: SurfaceEquation,
    pub parametric: ParametricEquations,
    pub points: Vec<Point3>,
    pub visible: bool,
}

impl OverlaySurface {
    pub fn numbered(n: usize) -> Self {
        Self {
            name: format!("Surface {n}"),
            color: SURFACE_COLOR.to_string(),
            opacity: 0.7,
            mode: SurfaceMode::Equation,
            equation: SurfaceEquation::default(),
            parametric: ParametricEquations::default(),
            points: Vec::new(),
            visible: true,
        }
    }
}

/// The three overlay collections of a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlaySet {
    pub points: Vec<OverlayPoint>,
    pub lines: Vec<OverlayLine>,
    pub surfaces: Vec<OverlaySurface>,
}

impl OverlaySet {
    /// Append a default point and return it for editing.
    pub fn add_point(&mut self) -> &mut OverlayPoint {
        let n = self.points.len() + 1;
        self.points.push(OverlayPoint::numbered(n));
        let last = self.points.len() - 1;
        &mut self.points[last]
    }

    pub fn add_line(&mut self) -> &mut OverlayLine {
        let n = self.lines.len() + 1;
        self.lines.push(OverlayLine::numbered(n));
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    pub fn add_surface(&mut self) -> &mut OverlaySurface {
        let n = self.surfaces.len() + 1;
        self.surfaces.push(OverlaySurface::numbered(n));
        let last = self.surfaces.len() - 1;
        &mut self.surfaces[last]
    }

    pub fn set_points_visible(&mut self, visible: bool) {
        self.points.iter_mut().for_each(|p| p.visible = visible);
    }

    pub fn set_lines_visible(&mut self, visible: bool) {
        self.lines.iter_mut().for_each(|l| l.visible = visible);
    }

    pub fn set_surfaces_visible(&mut self, visible: bool) {
        self.surfaces.iter_mut().for_each(|s| s.visible = visible);
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty() && self.surfaces.is_empty()
    }
}

/// Name used in messages: the user's name, or `<Kind> <n>` when blank.
pub fn display_name(name: &str, kind: &str, index: usize) -> String {
    if name.trim().is_empty() {
        format!("{kind} {}", index + 1)
    } else {
        name.to_string()
    }
}
