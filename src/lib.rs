#![allow(
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]

pub mod bfs;
pub mod fixture;
pub mod graph;
pub mod list;

#[cfg(test)]
pub mod testing;

pub use bfs::{shortest_hop_counts, UNREACHED};
pub use graph::Graph;
pub use list::{FloatList, IntList, Kind, List, TextList, Value};
