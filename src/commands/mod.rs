pub mod graph;
pub mod process;
