//! Resource arithmetic: quantity parsing and the `ResourceVector` triple
//! every other module in this crate is built on (spec §4.1).

pub mod quantity;
pub mod vector;

pub use quantity::{Dimension, Quantity};
pub use vector::ResourceVector;
