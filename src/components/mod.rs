//! Reusable UI components.

pub mod question_graph;
