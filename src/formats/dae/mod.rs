//! COLLADA scene output

mod writer;

pub use writer::{serialize_dae, write_dae};
