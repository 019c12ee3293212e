use plotdeck::data::dataset::{row_from, Sheet, Workbook};
use plotdeck::data::example::{example_workbook, EXAMPLE_SHEET};
use plotdeck::render::trace::{Geometry, HoverPolicy};
use plotdeck::session::TaskKind;
use plotdeck::state::graph_state::{Axis, Bound, ColumnRole, Dimensionality, GraphId};
use plotdeck::state::overlay::{DependentVariable, SurfaceMode};
use plotdeck::{GraphSession, SessionConfig};
use proptest::prelude::*;

const COLUMNS: [&str; 3] = ["A", "B", "C"];

fn workbook() -> Workbook {
    let rows = (0..10)
        .map(|i| {
            let v = i as f64;
            row_from([("A", v), ("B", v * 2.0 - 5.0), ("C", 10.0 - v)])
        })
        .collect();
    let columns = COLUMNS.iter().map(|c| c.to_string()).collect();
    Workbook::new(vec![Sheet::new("Readings", columns, rows)])
}

fn session() -> (GraphSession, GraphId) {
    let mut s = GraphSession::new(SessionConfig::default());
    let id = s.load_workbook(workbook()).expect("graph");
    (s, id)
}

#[derive(Debug, Clone)]
enum Edit {
    Dimension(usize),
    IgnoreZero(usize, bool),
    Column(usize, usize),
    Title(String),
    FilterText(usize, bool, f64),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0..4usize).prop_map(Edit::Dimension),
        (0..3usize, any::<bool>()).prop_map(|(a, on)| Edit::IgnoreZero(a, on)),
        (0..4usize, 0..3usize).prop_map(|(r, c)| Edit::Column(r, c)),
        "[A-Za-z ]{1,12}".prop_map(Edit::Title),
        (0..3usize, any::<bool>(), -10.0f64..10.0).prop_map(|(a, max, v)| Edit::FilterText(a, max, v)),
    ]
}

/// Apply one edit so that it produces exactly one history entry.
fn apply(s: &mut GraphSession, id: GraphId, edit: &Edit) {
    let quiet = s.config().quiet_period_ms;
    match edit {
        Edit::Dimension(i) => {
            assert!(s.set_dimensionality(id, Dimensionality::ALL[*i]));
        }
        Edit::IgnoreZero(a, on) => {
            assert!(s.set_ignore_zero(id, Axis::ALL[*a], *on));
        }
        Edit::Column(r, c) => {
            let role = [ColumnRole::X, ColumnRole::Y, ColumnRole::Z, ColumnRole::Color][*r];
            assert!(s.set_column(id, role, Some(COLUMNS[*c])));
        }
        Edit::Title(t) => {
            assert!(s.set_title(id, t));
            s.advance(quiet);
        }
        Edit::FilterText(a, max, v) => {
            let bound = if *max { Bound::Max } else { Bound::Min };
            assert!(s.set_filter_text(id, Axis::ALL[*a], bound, &format!("{v}")));
            s.advance(quiet);
        }
    }
}

proptest! {
    #[test]
    fn undo_then_redo_round_trips(edits in prop::collection::vec(edit(), 1..=25)) {
        let (mut s, id) = session();
        let original = s.graph(id).unwrap().snapshot();
        for e in &edits {
            apply(&mut s, id, e);
        }
        let last = s.graph(id).unwrap().snapshot();
        prop_assert_eq!(s.history_depth(id), Some((edits.len(), 0)));

        for _ in 0..edits.len() {
            prop_assert!(s.undo(id));
        }
        prop_assert!(!s.undo(id));
        prop_assert_eq!(&s.graph(id).unwrap().snapshot(), &original);

        for _ in 0..edits.len() {
            prop_assert!(s.redo(id));
        }
        prop_assert!(!s.redo(id));
        prop_assert_eq!(&s.graph(id).unwrap().snapshot(), &last);
    }

    #[test]
    fn history_never_exceeds_capacity(edits in prop::collection::vec(edit(), 0..60)) {
        let (mut s, id) = session();
        for e in &edits {
            apply(&mut s, id, e);
            let (undo, _) = s.history_depth(id).unwrap();
            prop_assert!(undo <= 25);
        }
        prop_assert_eq!(s.history_depth(id).unwrap().0, edits.len().min(25));
    }

    #[test]
    fn slider_handles_never_cross(moves in prop::collection::vec((any::<bool>(), -5.0f64..15.0), 1..40)) {
        let (mut s, id) = session();
        for (max, v) in moves {
            let bound = if max { Bound::Max } else { Bound::Min };
            s.drag_filter_slider(id, Axis::X, bound, v);
            let slider = s.slider(id, Axis::X).unwrap();
            prop_assert!(slider.handle(Bound::Min) <= slider.handle(Bound::Max));
            prop_assert!(slider.handle(Bound::Min) >= 0.0);
            prop_assert!(slider.handle(Bound::Max) <= 9.0);
        }
    }
}

#[test]
fn edit_after_undo_clears_redo() {
    let (mut s, id) = session();
    s.set_ignore_zero(id, Axis::X, true);
    s.set_ignore_zero(id, Axis::Y, true);
    assert!(s.undo(id));
    assert!(s.can_redo(id));
    s.set_dimensionality(id, Dimensionality::TwoDColor);
    assert!(!s.can_redo(id));
    assert!(!s.redo(id));
}

#[test]
fn twenty_sixth_commit_evicts_oldest() {
    let (mut s, id) = session();
    for i in 0..26 {
        s.set_ignore_zero(id, Axis::X, i % 2 == 0);
    }
    assert_eq!(s.history_depth(id), Some((25, 0)));
    for _ in 0..25 {
        assert!(s.undo(id));
    }
    // The state before the very first toggle is gone.
    assert!(s.graph(id).unwrap().filters.x.ignore_zero);
}

#[test]
fn deleted_graph_leaves_nothing_behind() {
    let (mut s, id) = session();
    s.set_title(id, "pending");
    s.set_filter_text(id, Axis::X, Bound::Min, "3");
    assert!(s.is_pending(id, TaskKind::HistoryCommit));
    assert!(s.delete_graph(id));

    assert_eq!(s.advance(10_000), 0);
    assert!(s.rendered(id).is_none());
    assert!(s.slider(id, Axis::X).is_none());
    assert!(!s.set_title(id, "late"));

    let fresh = s.create_graph().unwrap();
    assert_ne!(fresh, id);
    assert_eq!(s.history_depth(fresh), Some((0, 0)));
    assert_eq!(s.graph(fresh).unwrap().filters.x.min, None);
}

#[test]
fn redraw_and_commit_timers_are_independent() {
    let (mut s, id) = session();
    s.set_title(id, "T");
    s.advance(100);
    // Releasing a slider redraws at once but restarts the commit timer.
    s.drag_filter_slider(id, Axis::X, Bound::Min, 2.0);
    s.release_filter_slider(id, Axis::X, Bound::Min);
    assert!(!s.is_pending(id, TaskKind::Redraw));
    assert_eq!(s.rendered(id).unwrap().layout.title, "T");
    assert_eq!(s.rendered(id).unwrap().traces[0].geometry.len(), 8);

    s.advance(200);
    assert_eq!(s.history_depth(id), Some((0, 0)));
    assert!(s.is_pending(id, TaskKind::HistoryCommit));
    s.advance(100);
    assert_eq!(s.history_depth(id), Some((1, 0)));

    assert!(s.undo(id));
    let g = s.graph(id).unwrap();
    assert_eq!(g.title, format!("Graph {id}"));
    assert_eq!(g.filters.x.min, None);
}

#[test]
fn example_workbook_renders_surface_overlay() {
    let mut s = GraphSession::default();
    let id = s.load_workbook(example_workbook()).unwrap();
    assert_eq!(s.graph(id).unwrap().sheet_name, EXAMPLE_SHEET);
    s.set_dimensionality(id, Dimensionality::ThreeDColor);
    s.set_column(id, ColumnRole::Color, Some("Amplitude"));

    s.begin_overlay_edit(id);
    s.edit_overlays(id, |set, hover| {
        let surface = set.add_surface();
        surface.mode = SurfaceMode::Equation;
        surface.equation.variable = DependentVariable::X;
        surface.equation.expression = "y/2 + z".into();
        let broken = set.add_surface();
        broken.equation.expression = "2y".into();
        hover.fields.push("Radius".into());
    });
    assert!(s.apply_overlay_edit(id));

    let out = s.rendered(id).unwrap();
    assert_eq!(out.traces.len(), 2);
    assert_eq!(out.warnings.len(), 1);
    assert!(out.warnings[0].contains("Surface 2"));
    assert!(out.warnings[0].contains("Use * for multiplication"));
    assert_eq!(out.layout.margin.r, 100);

    match &out.traces[0].hover {
        HoverPolicy::Text(lines) => {
            assert_eq!(lines.len(), 35 * 35);
            assert!(lines[0].contains("Radius: "));
        }
        other => panic!("main trace should carry text hover, got {other:?}"),
    }
    assert!(matches!(out.traces[1].geometry, Geometry::Mesh { .. }));

    let json = serde_json::to_value(out).unwrap();
    assert_eq!(json["traces"][0]["geometry"]["kind"], "scatter3d");
    assert_eq!(json["traces"][1]["geometry"]["kind"], "mesh");
}
