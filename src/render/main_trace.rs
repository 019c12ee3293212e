use crate::data::dataset::{row_number, Row};
use crate::render::trace::{
    DrawMode, Geometry, HoverPolicy, LineStyle, Marker, MarkerColor, Trace, COLOR_SCALE,
};
use crate::state::graph_state::{Axis, Graph, SeriesKind};

/// Line break used inside hover labels.
pub const HOVER_BREAK: &str = "<br>";

fn column_values(rows: &[&Row], column: Option<&str>) -> Vec<f64> {
    match column {
        Some(col) => rows.iter().map(|row| row_number(row, col)).collect(),
        None => vec![f64::NAN; rows.len()],
    }
}

fn raw(row: &Row, column: &str) -> String {
    row.get(column).map(|c| c.display()).unwrap_or_default()
}

/// One `column: raw value` block per row: x, y, then z and colour when the
/// dimensionality uses them, then extra hover fields not already listed.
pub fn hover_text(rows: &[&Row], graph: &Graph) -> Vec<String> {
    let shown: Vec<&str> = [
        graph.columns.for_axis(Axis::X),
        graph.columns.for_axis(Axis::Y),
        graph.columns.for_axis(Axis::Z).filter(|_| graph.is_3d()),
        graph.columns.color_column().filter(|_| graph.has_color()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let bound: Vec<&str> = [
        graph.columns.for_axis(Axis::X),
        graph.columns.for_axis(Axis::Y),
        graph.columns.for_axis(Axis::Z),
        graph.columns.color_column(),
    ]
    .into_iter()
    .flatten()
    .collect();
    let extra: Vec<&str> = graph
        .hover
        .fields
        .iter()
        .map(String::as_str)
        .filter(|f| !bound.contains(f))
        .collect();

    rows.iter()
        .map(|row| {
            shown
                .iter()
                .chain(extra.iter())
                .map(|col| format!("{col}: {}", raw(row, col)))
                .collect::<Vec<_>>()
                .join(HOVER_BREAK)
        })
        .collect()
}

/// The filtered data series, styled by dimensionality and series kind.
pub fn build_main_trace(rows: &[&Row], graph: &Graph) -> Trace {
    let x = column_values(rows, graph.columns.for_axis(Axis::X));
    let y = column_values(rows, graph.columns.for_axis(Axis::Y));
    let has_color = graph.has_color();
    let color_column = graph.columns.color_column();
    let colors = || MarkerColor::Values(column_values(rows, color_column));
    let colorbar = || color_column.map(str::to_string);
    let hover = HoverPolicy::Text(hover_text(rows, graph));
    let name = graph.display_title();

    if graph.is_3d() {
        let z = column_values(rows, graph.columns.for_axis(Axis::Z));
        let marker = Marker {
            size: Some(5.0),
            color: has_color.then(colors),
            colorscale: Some(COLOR_SCALE.to_string()),
            show_scale: has_color,
            colorbar_title: if has_color { colorbar() } else { None },
            ..Default::default()
        };
        return Trace::new(
            name,
            Geometry::Scatter3d {
                x,
                y,
                z,
                mode: DrawMode::Markers,
            },
            hover,
        )
        .with_marker(marker);
    }

    match graph.series_kind {
        SeriesKind::Line => {
            let marker = Marker {
                size: Some(6.0),
                color: has_color.then(colors),
                colorscale: has_color.then(|| COLOR_SCALE.to_string()),
                ..Default::default()
            };
            Trace::new(
                name,
                Geometry::Scatter2d {
                    x,
                    y,
                    mode: DrawMode::LinesMarkers,
                },
                hover,
            )
            .with_marker(marker)
            .with_line(LineStyle {
                color: None,
                width: 2.0,
            })
        }
        SeriesKind::Bar => {
            let trace = Trace::new(name, Geometry::Bar { x, y }, hover);
            if has_color {
                trace.with_marker(Marker {
                    color: Some(colors()),
                    colorscale: Some(COLOR_SCALE.to_string()),
                    show_scale: true,
                    colorbar_title: colorbar(),
                    ..Default::default()
                })
            } else {
                trace
            }
        }
        // Scatter, and anything that slipped past validation.
        SeriesKind::Scatter | SeriesKind::Scatter3D => {
            let marker = Marker {
                size: Some(8.0),
                color: has_color.then(colors),
                colorscale: Some(COLOR_SCALE.to_string()),
                show_scale: has_color,
                colorbar_title: if has_color { colorbar() } else { None },
                ..Default::default()
            };
            Trace::new(
                name,
                Geometry::Scatter2d {
                    x,
                    y,
                    mode: DrawMode::Markers,
                },
                hover,
            )
            .with_marker(marker)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::{row_from, Cell};
    use crate::state::graph_state::{ColumnRole, Dimensionality};

    fn setup() -> (Vec<Row>, Graph) {
        let rows = vec![
            row_from([
                ("A", Cell::Number(1.0)),
                ("B", Cell::Number(2.5)),
                ("C", Cell::from("7x")),
                ("Site", Cell::from("north")),
            ]),
            row_from([
                ("A", Cell::Number(2.0)),
                ("B", Cell::Null),
                ("C", Cell::Number(9.0)),
                ("Site", Cell::from("south")),
            ]),
        ];
        let cols: Vec<String> = ["A", "B", "C", "Site"].iter().map(|s| s.to_string()).collect();
        (rows, Graph::new(1, "S", &cols))
    }

    #[test]
    fn scatter_2d_defaults() {
        let (rows, g) = setup();
        let refs: Vec<&Row> = rows.iter().collect();
        let trace = build_main_trace(&refs, &g);
        assert_eq!(trace.name, "Graph 1");
        match &trace.geometry {
            Geometry::Scatter2d { x, y, mode } => {
                assert_eq!(x, &vec![1.0, 2.0]);
                assert_eq!(y[0], 2.5);
                assert!(y[1].is_nan());
                assert_eq!(*mode, DrawMode::Markers);
            }
            other => panic!("unexpected geometry {other:?}"),
        }
        let marker = trace.marker.unwrap();
        assert_eq!(marker.size, Some(8.0));
        assert!(!marker.show_scale);
        assert_eq!(marker.color, None);
    }

    #[test]
    fn hover_lists_raw_values_and_extra_fields_once() {
        let (rows, mut g) = setup();
        g.hover.fields = vec!["Site".into(), "A".into()];
        let refs: Vec<&Row> = rows.iter().collect();
        let text = hover_text(&refs, &g);
        assert_eq!(text[0], "A: 1<br>B: 2.5<br>Site: north");
        assert_eq!(text[1], "A: 2<br>B: <br>Site: south");
    }

    #[test]
    fn three_d_with_color_uses_color_bar() {
        let (rows, mut g) = setup();
        g.set_dimensionality(Dimensionality::ThreeDColor);
        g.columns.set(ColumnRole::Color, Some("A".into()));
        let refs: Vec<&Row> = rows.iter().collect();
        let trace = build_main_trace(&refs, &g);
        match &trace.geometry {
            Geometry::Scatter3d { z, .. } => {
                assert_eq!(z[0], 7.0);
                assert_eq!(z[1], 9.0);
            }
            other => panic!("unexpected geometry {other:?}"),
        }
        let marker = trace.marker.unwrap();
        assert_eq!(marker.size, Some(5.0));
        assert!(marker.show_scale);
        assert_eq!(marker.colorbar_title.as_deref(), Some("A"));
        assert_eq!(marker.color, Some(MarkerColor::Values(vec![1.0, 2.0])));

        let text = hover_text(&refs, &g);
        assert_eq!(text[0], "A: 1<br>B: 2.5<br>C: 7x<br>A: 1");
    }

    #[test]
    fn line_and_bar_styles() {
        let (rows, mut g) = setup();
        let refs: Vec<&Row> = rows.iter().collect();

        g.series_kind = SeriesKind::Line;
        let line = build_main_trace(&refs, &g);
        assert!(matches!(
            line.geometry,
            Geometry::Scatter2d { mode: DrawMode::LinesMarkers, .. }
        ));
        assert_eq!(line.line.map(|l| l.width), Some(2.0));
        assert_eq!(line.marker.and_then(|m| m.size), Some(6.0));

        g.series_kind = SeriesKind::Bar;
        let bar = build_main_trace(&refs, &g);
        assert!(matches!(bar.geometry, Geometry::Bar { .. }));
        assert!(bar.marker.is_none());
    }
}
