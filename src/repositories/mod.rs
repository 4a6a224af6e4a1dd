mod memory_store;
pub mod query;
mod traits;

pub use memory_store::InMemoryStore;
pub use query::{ContactRow, Filter, Pipeline, Stage, TextPattern};
pub use traits::{ContactRepository, ImageRepository};
