pub mod cache;
pub mod error;
pub mod gate;
pub mod graph;
