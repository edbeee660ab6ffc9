//! Scene graph: Display objects, their ordering, and the tree that holds them.

mod object;
mod order;
mod tree;

pub use object::{FocusBehavior, KeyboardHandler, MouseHandler, ObjectId, SceneObject, UpdateHandler};
pub use order::{compare, sort_by_order, SortOrdered};
pub use tree::Scene;
