//! Force-laid-out bubble graph of questions and the relations between them.

pub mod behaviors;
mod component;
pub mod controller;
pub mod edge;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod loader;
pub mod mode;
pub mod model;
pub mod node;
pub mod render;
pub mod scale;
pub mod simulation;
pub mod source;
pub mod surface;
pub mod text_fit;
pub mod touch;
pub mod view;

pub use behaviors::{Dialogs, EditResult, Inspection, dispatch, navigate};
pub use component::QuestionGraphCanvas;
pub use graph::{GraphError, QuestionGraph};
pub use mode::{Interaction, InteractionMode};
pub use model::{Question, QuestionId, Relation, Vote};
pub use node::GraphNode;
pub use source::{DataError, DataResult, DataSource, MemoryDataSource};
pub use view::{GraphView, GraphViewConfig};
