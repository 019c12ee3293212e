pub mod graph_state;
pub mod overlay;
