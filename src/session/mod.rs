//! Session-level orchestration of graphs.
//!
//! [`GraphSession`] owns every graph together with its derived state
//! (history, slider ranges, last render, camera) in a single registry, and
//! drives the debounce timers on a virtual clock. Operations on an unknown
//! graph id are ignored and report `false` / `None`.

pub mod history;
pub mod scheduler;

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::data::dataset::Workbook;
use crate::plot3d::camera::SceneCamera;
use crate::processing::filter::{DataRange, FilterRangeCache};
use crate::processing::slider::{parse_bound, AxisSliders, RangeSlider};
use crate::render::{render_graph, RenderOutcome, Resolution};
use crate::state::graph_state::{
    Axis, Bound, ColumnMapping, ColumnRole, Dimensionality, Graph, GraphId, GraphSnapshot,
    HoverSettings, SeriesKind,
};
use crate::state::overlay::OverlaySet;

pub use history::History;
pub use scheduler::{Scheduler, TaskKind};

/// Overlay and hover configuration captured when an overlay edit opens.
#[derive(Debug, Clone, PartialEq)]
struct OverlayEdit {
    overlays: OverlaySet,
    hover: HoverSettings,
}

/// A graph plus everything derived from it.
#[derive(Debug)]
struct GraphEntry {
    graph: Graph,
    history: History<GraphSnapshot>,
    ranges: FilterRangeCache,
    sliders: AxisSliders,
    camera: Option<SceneCamera>,
    overlay_edit: Option<OverlayEdit>,
    last_render: Option<RenderOutcome>,
}

impl GraphEntry {
    /// Commit the current configuration as the before-state of a discrete
    /// change. An open burst is committed first so it stays its own step.
    fn record_immediate(&mut self) {
        self.history.commit_pending();
        self.history.record(self.graph.snapshot());
    }

    fn begin_burst(&mut self) {
        let graph = &self.graph;
        if self.history.begin_burst(|| graph.snapshot()) {
            debug!(graph = graph.id, "history burst started");
        }
    }

    fn rebuild_ranges(&mut self, workbook: &Workbook, steps: u32) {
        let rows = workbook.rows(&self.graph.sheet_name);
        self.ranges = FilterRangeCache::build(rows, &self.graph);
        self.sliders = AxisSliders::build(&self.ranges, &self.graph.filters, steps);
    }
}

pub struct GraphSession {
    config: SessionConfig,
    workbook: Workbook,
    graphs: BTreeMap<GraphId, GraphEntry>,
    next_id: GraphId,
    scheduler: Scheduler,
}

impl Default for GraphSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl GraphSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            workbook: Workbook::default(),
            graphs: BTreeMap::new(),
            next_id: 1,
            scheduler: Scheduler::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    fn resolution(&self) -> Resolution {
        Resolution {
            line_samples: self.config.line_samples,
            surface_grid: self.config.surface_grid,
        }
    }

    fn entry_mut(&mut self, id: GraphId) -> Option<&mut GraphEntry> {
        let entry = self.graphs.get_mut(&id);
        if entry.is_none() {
            debug!(graph = id, "ignoring action on unknown graph");
        }
        entry
    }

    // ----- lifecycle -------------------------------------------------------

    /// Replace the data set. Every graph and all derived state is dropped;
    /// one default graph is created when the workbook has a sheet.
    pub fn load_workbook(&mut self, workbook: Workbook) -> Option<GraphId> {
        self.graphs.clear();
        self.scheduler.clear();
        info!(sheets = workbook.sheets.len(), "workbook loaded");
        self.workbook = workbook;
        self.create_graph()
    }

    /// Add a graph bound to the first sheet. `None` without data.
    pub fn create_graph(&mut self) -> Option<GraphId> {
        let Some(sheet) = self.workbook.first_sheet() else {
            warn!("cannot create a graph without data");
            return None;
        };
        let id = self.next_id;
        self.next_id += 1;

        let graph = Graph::new(id, &sheet.name, &sheet.columns);
        let ranges = FilterRangeCache::build(&sheet.rows, &graph);
        let sliders = AxisSliders::build(&ranges, &graph.filters, self.config.slider_steps);
        self.graphs.insert(
            id,
            GraphEntry {
                graph,
                history: History::new(self.config.history_capacity),
                ranges,
                sliders,
                camera: None,
                overlay_edit: None,
                last_render: None,
            },
        );
        info!(graph = id, sheet = %sheet.name, "graph created");
        self.redraw(id);
        Some(id)
    }

    /// Remove a graph with its history, timers and caches.
    pub fn delete_graph(&mut self, id: GraphId) -> bool {
        self.scheduler.cancel_graph(id);
        if self.graphs.remove(&id).is_some() {
            info!(graph = id, "graph deleted");
            true
        } else {
            debug!(graph = id, "delete of unknown graph ignored");
            false
        }
    }

    pub fn graph_ids(&self) -> Vec<GraphId> {
        self.graphs.keys().copied().collect()
    }

    pub fn graph(&self, id: GraphId) -> Option<&Graph> {
        self.graphs.get(&id).map(|e| &e.graph)
    }

    /// Copy sheet, dimensionality, series kind, columns and filters from
    /// `source` into `target` as one undoable step on `target`.
    pub fn copy_settings(&mut self, target: GraphId, source: GraphId) -> bool {
        if target == source {
            warn!(graph = target, "cannot copy settings from a graph to itself");
            return false;
        }
        let Some(src) = self.graphs.get(&source).map(|e| e.graph.clone()) else {
            debug!(graph = source, "copy from unknown graph ignored");
            return false;
        };
        let steps = self.config.slider_steps;
        let Some(entry) = self.graphs.get_mut(&target) else {
            debug!(graph = target, "copy into unknown graph ignored");
            return false;
        };
        entry.record_immediate();
        entry.graph.copy_settings_from(&src);
        entry.rebuild_ranges(&self.workbook, steps);
        self.scheduler.cancel(target, TaskKind::HistoryCommit);
        info!(graph = target, from = source, "settings copied");
        self.redraw(target);
        true
    }

    // ----- immediate edits -------------------------------------------------

    /// Switch sheet. Columns go back to the sheet's first three and every
    /// filter to its full range.
    pub fn set_sheet(&mut self, id: GraphId, sheet: &str) -> bool {
        let Some(columns) = self.workbook.sheet(sheet).map(|s| s.columns.clone()) else {
            warn!(graph = id, sheet, "unknown sheet");
            return false;
        };
        let steps = self.config.slider_steps;
        let Some(entry) = self.graphs.get_mut(&id) else {
            debug!(graph = id, "ignoring action on unknown graph");
            return false;
        };
        entry.record_immediate();
        entry.graph.sheet_name = sheet.to_string();
        entry.graph.columns = ColumnMapping::from_sheet_columns(&columns);
        for axis in Axis::ALL {
            entry.graph.filters.get_mut(axis).clear_bounds();
        }
        entry.rebuild_ranges(&self.workbook, steps);
        self.after_immediate(id);
        true
    }

    pub fn set_dimensionality(&mut self, id: GraphId, dim: Dimensionality) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        entry.record_immediate();
        entry.graph.set_dimensionality(dim);
        self.after_immediate(id);
        true
    }

    /// Rejected when `kind` is not offered for the graph's dimensionality.
    pub fn set_series_kind(&mut self, id: GraphId, kind: SeriesKind) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        if !kind.is_valid_for(entry.graph.dimensionality) {
            warn!(
                graph = id,
                kind = kind.label(),
                dimensionality = entry.graph.dimensionality.label(),
                "series kind not available"
            );
            return false;
        }
        entry.record_immediate();
        entry.graph.series_kind = kind;
        self.after_immediate(id);
        true
    }

    /// Bind a column role. Re-binding x, y or z recomputes that axis's
    /// data range and resets its filter to the full range.
    pub fn set_column(&mut self, id: GraphId, role: ColumnRole, column: Option<&str>) -> bool {
        let Some(entry) = self.graphs.get_mut(&id) else {
            debug!(graph = id, "ignoring action on unknown graph");
            return false;
        };
        if let Some(col) = column {
            let known = self
                .workbook
                .columns(&entry.graph.sheet_name)
                .iter()
                .any(|c| c == col);
            if !known {
                warn!(graph = id, column = col, "unknown column");
                return false;
            }
        }

        entry.record_immediate();
        entry.graph.columns.set(role, column.map(str::to_string));
        if let Some(axis) = role.axis() {
            let rows = self.workbook.rows(&entry.graph.sheet_name);
            entry.ranges = FilterRangeCache::build(rows, &entry.graph);
            entry.graph.filters.get_mut(axis).clear_bounds();
            let range = entry.ranges.get(axis);
            entry.sliders.get_mut(axis).reset(range);
        }
        self.after_immediate(id);
        true
    }

    pub fn set_ignore_zero(&mut self, id: GraphId, axis: Axis, ignore: bool) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        entry.record_immediate();
        entry.graph.filters.get_mut(axis).ignore_zero = ignore;
        self.after_immediate(id);
        true
    }

    fn after_immediate(&mut self, id: GraphId) {
        self.scheduler.cancel(id, TaskKind::HistoryCommit);
        self.redraw(id);
    }

    // ----- coalesced edits -------------------------------------------------

    pub fn set_title(&mut self, id: GraphId, title: &str) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        entry.begin_burst();
        entry.graph.title = title.to_string();
        self.schedule_coalesced(id);
        true
    }

    /// Typed filter bound. The slider handle follows the clamped value;
    /// text that is not a number leaves the bound unset.
    pub fn set_filter_text(&mut self, id: GraphId, axis: Axis, bound: Bound, text: &str) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        entry.begin_burst();
        let value = entry.sliders.get_mut(axis).set_text(bound, text);
        entry.graph.filters.get_mut(axis).set_bound(bound, value);
        self.schedule_coalesced(id);
        true
    }

    /// Move a slider handle. Only the handle and its text change; the
    /// filter is written on release. Returns the clamped handle value.
    pub fn drag_filter_slider(&mut self, id: GraphId, axis: Axis, bound: Bound, value: f64) -> Option<f64> {
        let entry = self.entry_mut(id)?;
        Some(entry.sliders.get_mut(axis).drag(bound, value))
    }

    /// Write the handle's value into the filter and redraw. The history
    /// commit is coalesced with neighbouring edits.
    pub fn release_filter_slider(&mut self, id: GraphId, axis: Axis, bound: Bound) -> bool {
        let delay = self.config.quiet_period_ms;
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        entry.begin_burst();
        let value = parse_bound(entry.sliders.get(axis).text(bound));
        entry.graph.filters.get_mut(axis).set_bound(bound, value);
        self.scheduler.schedule(id, TaskKind::HistoryCommit, delay);
        self.redraw(id);
        true
    }

    fn schedule_coalesced(&mut self, id: GraphId) {
        let delay = self.config.quiet_period_ms;
        self.scheduler.schedule(id, TaskKind::HistoryCommit, delay);
        self.scheduler.schedule(id, TaskKind::Redraw, delay);
    }

    // ----- undo / redo -----------------------------------------------------

    pub fn undo(&mut self, id: GraphId) -> bool {
        self.step_history(id, true)
    }

    pub fn redo(&mut self, id: GraphId) -> bool {
        self.step_history(id, false)
    }

    fn step_history(&mut self, id: GraphId, back: bool) -> bool {
        let steps = self.config.slider_steps;
        let Some(entry) = self.graphs.get_mut(&id) else {
            debug!(graph = id, "ignoring action on unknown graph");
            return false;
        };
        let current = entry.graph.snapshot();
        let target = if back {
            entry.history.undo(current)
        } else {
            entry.history.redo(current)
        };
        self.scheduler.cancel(id, TaskKind::HistoryCommit);
        let Some(snapshot) = target else {
            return false;
        };
        entry.graph.restore(&snapshot);
        entry.rebuild_ranges(&self.workbook, steps);
        info!(
            graph = id,
            action = if back { "undo" } else { "redo" },
            undo_depth = entry.history.undo_len(),
            redo_depth = entry.history.redo_len(),
            "history step applied"
        );
        self.redraw(id);
        true
    }

    pub fn can_undo(&self, id: GraphId) -> bool {
        self.graphs.get(&id).is_some_and(|e| e.history.can_undo())
    }

    pub fn can_redo(&self, id: GraphId) -> bool {
        self.graphs.get(&id).is_some_and(|e| e.history.can_redo())
    }

    /// `(undo, redo)` stack depths, not counting an open burst.
    pub fn history_depth(&self, id: GraphId) -> Option<(usize, usize)> {
        self.graphs
            .get(&id)
            .map(|e| (e.history.undo_len(), e.history.redo_len()))
    }

    // ----- overlay editing -------------------------------------------------

    /// Open an overlay edit, remembering the current overlays and hover
    /// settings. Re-opening keeps the original starting point.
    pub fn begin_overlay_edit(&mut self, id: GraphId) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        if entry.overlay_edit.is_none() {
            entry.overlay_edit = Some(OverlayEdit {
                overlays: entry.graph.overlays.clone(),
                hover: entry.graph.hover.clone(),
            });
        }
        true
    }

    pub fn is_editing_overlays(&self, id: GraphId) -> bool {
        self.graphs.get(&id).is_some_and(|e| e.overlay_edit.is_some())
    }

    /// Change overlays and hover settings inside an open edit. Nothing is
    /// committed until [`GraphSession::apply_overlay_edit`].
    pub fn edit_overlays<F>(&mut self, id: GraphId, edit: F) -> bool
    where
        F: FnOnce(&mut OverlaySet, &mut HoverSettings),
    {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        if entry.overlay_edit.is_none() {
            warn!(graph = id, "overlay edit not open");
            return false;
        }
        edit(&mut entry.graph.overlays, &mut entry.graph.hover);
        true
    }

    /// Close the edit with one history step covering all of its changes.
    pub fn apply_overlay_edit(&mut self, id: GraphId) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        let Some(start) = entry.overlay_edit.take() else {
            return false;
        };
        let mut before = entry.graph.snapshot();
        before.overlays = start.overlays;
        before.hover = start.hover;
        entry.history.commit_pending();
        entry.history.record(before);
        info!(graph = id, "overlay changes applied");
        self.after_immediate(id);
        true
    }

    /// Close the edit and put the starting overlays back.
    pub fn discard_overlay_edit(&mut self, id: GraphId) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        let Some(start) = entry.overlay_edit.take() else {
            return false;
        };
        entry.graph.overlays = start.overlays;
        entry.graph.hover = start.hover;
        self.redraw(id);
        true
    }

    /// Close the edit keeping its changes, without a history step.
    pub fn close_overlay_edit(&mut self, id: GraphId) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        if entry.overlay_edit.take().is_none() {
            return false;
        }
        self.redraw(id);
        true
    }

    // ----- rendering -------------------------------------------------------

    /// Record the renderer's live camera so later 3D layouts keep it.
    pub fn observe_camera(&mut self, id: GraphId, camera: SceneCamera) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.camera = Some(camera);
                true
            }
            None => false,
        }
    }

    pub fn camera(&self, id: GraphId) -> Option<SceneCamera> {
        self.graphs.get(&id).and_then(|e| e.camera)
    }

    /// Redraw now, replacing any pending debounced redraw.
    pub fn render(&mut self, id: GraphId) -> Option<&RenderOutcome> {
        self.redraw(id);
        self.rendered(id)
    }

    /// The most recent render of a graph.
    pub fn rendered(&self, id: GraphId) -> Option<&RenderOutcome> {
        self.graphs.get(&id).and_then(|e| e.last_render.as_ref())
    }

    fn redraw(&mut self, id: GraphId) {
        self.scheduler.cancel(id, TaskKind::Redraw);
        let resolution = self.resolution();
        let Some(entry) = self.graphs.get_mut(&id) else {
            return;
        };
        let rows = self.workbook.rows(&entry.graph.sheet_name);
        let outcome = render_graph(&entry.graph, rows, entry.camera, resolution);
        debug!(
            graph = id,
            traces = outcome.traces.len(),
            warnings = outcome.warnings.len(),
            "graph rendered"
        );
        entry.last_render = Some(outcome);
    }

    // ----- timers ----------------------------------------------------------

    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn is_pending(&self, id: GraphId, kind: TaskKind) -> bool {
        self.scheduler.is_pending(id, kind)
    }

    /// Move the clock forward by `ms`, firing due tasks in deadline order.
    /// Returns how many fired.
    pub fn advance(&mut self, ms: u64) -> usize {
        let until = self.scheduler.now().saturating_add(ms);
        let mut fired = 0;
        while let Some((id, kind)) = self.scheduler.next_due(until) {
            fired += 1;
            match kind {
                TaskKind::Redraw => self.redraw(id),
                TaskKind::HistoryCommit => {
                    if let Some(entry) = self.graphs.get_mut(&id) {
                        if entry.history.commit_pending() {
                            debug!(graph = id, undo_depth = entry.history.undo_len(), "history committed");
                        }
                    }
                }
            }
        }
        self.scheduler.set_now(until);
        fired
    }

    // ----- filter widgets --------------------------------------------------

    pub fn filter_label(&self, id: GraphId, axis: Axis) -> Option<String> {
        self.graph(id).map(|g| g.filter_label(axis))
    }

    pub fn slider(&self, id: GraphId, axis: Axis) -> Option<&RangeSlider> {
        self.graphs.get(&id).map(|e| e.sliders.get(axis))
    }

    pub fn filter_range(&self, id: GraphId, axis: Axis) -> Option<DataRange> {
        self.graphs.get(&id).map(|e| e.ranges.get(axis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::{row_from, Sheet};

    fn workbook() -> Workbook {
        let rows = vec![
            row_from([("X", 0.0), ("Y", 1.0), ("Z", 4.0)]),
            row_from([("X", 5.0), ("Y", 2.0), ("Z", 8.0)]),
        ];
        let columns = vec!["X".to_string(), "Y".to_string(), "Z".to_string()];
        Workbook::new(vec![
            Sheet::new("Data", columns.clone(), rows),
            Sheet::new("Empty", columns, Vec::new()),
        ])
    }

    fn session() -> (GraphSession, GraphId) {
        let mut s = GraphSession::default();
        let id = s.load_workbook(workbook()).unwrap();
        (s, id)
    }

    #[test]
    fn load_creates_default_graph() {
        let (s, id) = session();
        assert_eq!(s.graph_ids(), vec![id]);
        let g = s.graph(id).unwrap();
        assert_eq!(g.sheet_name, "Data");
        assert_eq!(g.title, format!("Graph {id}"));
        assert!(s.rendered(id).is_some());
        assert!(!s.can_undo(id));
    }

    #[test]
    fn ids_keep_increasing_across_loads() {
        let (mut s, first) = session();
        let second = s.load_workbook(workbook()).unwrap();
        assert!(second > first);
        assert_eq!(s.graph_ids(), vec![second]);
    }

    #[test]
    fn empty_workbook_has_no_graphs() {
        let mut s = GraphSession::default();
        assert_eq!(s.load_workbook(Workbook::default()), None);
        assert_eq!(s.create_graph(), None);
    }

    #[test]
    fn ignore_zero_scenario() {
        let (mut s, id) = session();
        assert!(s.set_ignore_zero(id, Axis::X, true));
        let out = s.rendered(id).unwrap();
        assert_eq!(out.traces[0].geometry.len(), 1);
        assert!(s.undo(id));
        assert!(!s.graph(id).unwrap().filters.x.ignore_zero);
        assert!(s.redo(id));
        assert!(s.graph(id).unwrap().filters.x.ignore_zero);
    }

    #[test]
    fn title_edits_coalesce_into_one_step() {
        let (mut s, id) = session();
        s.set_title(id, "P");
        s.advance(100);
        s.set_title(id, "Pr");
        s.advance(250);
        s.set_title(id, "Pressure");
        assert_eq!(s.history_depth(id), Some((0, 0)));
        assert!(s.is_pending(id, TaskKind::Redraw));

        s.advance(300);
        assert_eq!(s.history_depth(id), Some((1, 0)));
        assert!(!s.is_pending(id, TaskKind::HistoryCommit));
        assert_eq!(s.rendered(id).unwrap().layout.title, "Pressure");

        assert!(s.undo(id));
        assert_eq!(s.graph(id).unwrap().title, format!("Graph {id}"));
    }

    #[test]
    fn undo_during_burst_restores_pre_burst_state() {
        let (mut s, id) = session();
        s.set_title(id, "Draft");
        assert!(s.can_undo(id));
        assert!(s.undo(id));
        assert_eq!(s.graph(id).unwrap().title, format!("Graph {id}"));
        // The cancelled commit timer never pushes a stale entry.
        s.advance(1000);
        assert_eq!(s.history_depth(id), Some((0, 1)));
    }

    #[test]
    fn slider_drag_only_moves_handle_until_release() {
        let (mut s, id) = session();
        assert_eq!(s.drag_filter_slider(id, Axis::X, Bound::Min, 2.5), Some(2.5));
        assert_eq!(s.slider(id, Axis::X).unwrap().text(Bound::Min), "2.50");
        assert_eq!(s.graph(id).unwrap().filters.x.min, None);

        assert!(s.release_filter_slider(id, Axis::X, Bound::Min));
        assert_eq!(s.graph(id).unwrap().filters.x.min, Some(2.5));
        assert_eq!(s.rendered(id).unwrap().traces[0].geometry.len(), 1);
        s.advance(300);
        assert_eq!(s.history_depth(id), Some((1, 0)));
    }

    #[test]
    fn filter_text_sets_bound_and_slider() {
        let (mut s, id) = session();
        s.set_filter_text(id, Axis::Y, Bound::Max, "1.5");
        assert_eq!(s.graph(id).unwrap().filters.y.max, Some(1.5));
        assert_eq!(s.slider(id, Axis::Y).unwrap().handle(Bound::Max), 1.5);
        s.set_filter_text(id, Axis::Y, Bound::Max, "");
        assert_eq!(s.graph(id).unwrap().filters.y.max, None);
        assert_eq!(s.slider(id, Axis::Y).unwrap().handle(Bound::Max), 2.0);
    }

    #[test]
    fn column_change_resets_axis_filter() {
        let (mut s, id) = session();
        s.set_filter_text(id, Axis::X, Bound::Min, "1");
        assert!(s.set_column(id, ColumnRole::X, Some("Z")));
        let g = s.graph(id).unwrap();
        assert_eq!(g.filters.x.min, None);
        assert_eq!(s.filter_label(id, Axis::X).as_deref(), Some("Z Filter"));
        assert_eq!(s.filter_range(id, Axis::X), Some(DataRange { min: 4.0, max: 8.0 }));
        let slider = s.slider(id, Axis::X).unwrap();
        assert_eq!(slider.range(), DataRange { min: 4.0, max: 8.0 });
        assert_eq!((slider.handle(Bound::Min), slider.handle(Bound::Max)), (4.0, 8.0));
        assert_eq!(slider.text(Bound::Min), "");
        assert!(!s.set_column(id, ColumnRole::Y, Some("Nope")));
        // burst + column change
        assert_eq!(s.history_depth(id), Some((2, 0)));
    }

    #[test]
    fn series_kind_must_match_dimensionality() {
        let (mut s, id) = session();
        assert!(!s.set_series_kind(id, SeriesKind::Scatter3D));
        assert!(s.set_series_kind(id, SeriesKind::Bar));
        assert!(s.set_dimensionality(id, Dimensionality::ThreeD));
        assert_eq!(s.graph(id).unwrap().series_kind, SeriesKind::Scatter3D);
        assert!(s.undo(id));
        assert_eq!(s.graph(id).unwrap().series_kind, SeriesKind::Bar);
    }

    #[test]
    fn sheet_change_resets_columns_and_filters() {
        let (mut s, id) = session();
        s.set_column(id, ColumnRole::X, Some("Y"));
        s.set_filter_text(id, Axis::Y, Bound::Min, "1");
        assert!(s.set_sheet(id, "Empty"));
        let g = s.graph(id).unwrap();
        assert_eq!(g.columns.x, "X");
        assert_eq!(g.filters.y.min, None);
        assert_eq!(s.filter_range(id, Axis::X), Some(DataRange::FALLBACK));
        assert!(!s.set_sheet(id, "Missing"));
    }

    #[test]
    fn copy_settings_is_one_step_on_target() {
        let (mut s, a) = session();
        let b = s.create_graph().unwrap();
        s.set_dimensionality(a, Dimensionality::ThreeD);
        s.set_ignore_zero(a, Axis::Z, true);
        s.set_title(a, "Source");
        s.advance(300);

        assert!(s.copy_settings(b, a));
        let gb = s.graph(b).unwrap();
        assert_eq!(gb.dimensionality, Dimensionality::ThreeD);
        assert!(gb.filters.z.ignore_zero);
        assert_eq!(gb.title, format!("Graph {b}"));
        assert_eq!(s.history_depth(b), Some((1, 0)));

        assert!(!s.copy_settings(b, b));
        assert!(!s.copy_settings(b, 999));
    }

    #[test]
    fn delete_discards_state_and_timers() {
        let (mut s, id) = session();
        s.set_title(id, "x");
        assert!(s.delete_graph(id));
        assert!(!s.is_pending(id, TaskKind::HistoryCommit));
        assert!(!s.is_pending(id, TaskKind::Redraw));
        assert_eq!(s.advance(1000), 0);
        assert!(!s.undo(id));
        assert!(!s.delete_graph(id));

        let fresh = s.create_graph().unwrap();
        assert_ne!(fresh, id);
        assert!(!s.can_undo(fresh));
    }

    #[test]
    fn overlay_edit_applies_as_one_step() {
        let (mut s, id) = session();
        assert!(!s.edit_overlays(id, |set, _| {
            set.add_point();
        }));
        assert!(s.begin_overlay_edit(id));
        s.edit_overlays(id, |set, hover| {
            set.add_point();
            set.add_line().equation.y = "x".into();
            hover.disable_overlay_hover = true;
        });
        assert_eq!(s.history_depth(id), Some((0, 0)));
        assert!(s.apply_overlay_edit(id));
        assert_eq!(s.history_depth(id), Some((1, 0)));
        assert_eq!(s.rendered(id).unwrap().traces.len(), 3);

        assert!(s.undo(id));
        let g = s.graph(id).unwrap();
        assert!(g.overlays.is_empty());
        assert!(!g.hover.disable_overlay_hover);
    }

    #[test]
    fn overlay_edit_discard_and_close() {
        let (mut s, id) = session();
        s.begin_overlay_edit(id);
        s.edit_overlays(id, |set, _| {
            set.add_point();
        });
        assert!(s.discard_overlay_edit(id));
        assert!(s.graph(id).unwrap().overlays.points.is_empty());

        s.begin_overlay_edit(id);
        s.edit_overlays(id, |set, _| {
            set.add_point();
        });
        assert!(s.close_overlay_edit(id));
        assert_eq!(s.graph(id).unwrap().overlays.points.len(), 1);
        assert!(!s.can_undo(id));
        assert!(!s.close_overlay_edit(id));
    }

    #[test]
    fn camera_round_trips_into_3d_layout() {
        let (mut s, id) = session();
        let cam = SceneCamera::from_orbit(0.3, 0.2, 2.0);
        s.observe_camera(id, cam);
        assert_eq!(s.render(id).unwrap().layout.camera(), None);
        s.set_dimensionality(id, Dimensionality::ThreeD);
        assert_eq!(s.rendered(id).unwrap().layout.camera(), Some(cam));
    }
}
