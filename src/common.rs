//! Miscellaneous common structs used throughout the library.

mod closest_nodes;
mod hash;
mod id;
mod routing_table;

pub use closest_nodes::*;
pub use hash::*;
pub use id::*;
pub use routing_table::*;
