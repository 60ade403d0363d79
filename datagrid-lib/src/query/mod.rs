//! Sort and window query types

mod order;
mod page;

pub use order::*;
pub use page::*;
