//! Loading card data, rules and saved games.

pub mod load;
pub mod persistence;

pub use load::*;
pub use persistence::*;
