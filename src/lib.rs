pub mod driver;
mod errors;
mod handle;
mod node;
mod sequence;
mod tuple;

pub use errors::TupleError;
pub use handle::Handle;
pub use node::Node;
pub use sequence::{Iter, IterHandles, Sequence};
pub use tuple::{NaturalTuple, EMPTY_MARKER, SENTINEL};
