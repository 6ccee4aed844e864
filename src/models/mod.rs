pub mod todo;

pub use todo::{MessageResponse, Todo, TodoInput};
