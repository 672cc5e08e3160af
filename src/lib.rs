/*!
This crate characterizes DNA double-strand break repair outcomes from
amplicon sequencing data. Aligned reads are classified against the amplicon
reference, trimmed to a window around the break site, deduplicated into a
windowed variant table, and finally assembled into a variation-distance
graph connecting repair outcomes that are a single edit apart.
*/

pub mod align;
pub mod classify;
pub mod cli;
pub mod commands;
pub mod dedup;
pub mod graph;
pub mod utils;
