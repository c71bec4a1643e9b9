//! The fitted-model artifact: typed representation and its cached repository.

pub mod fitted;
pub mod repository;

pub use fitted::*;
pub use repository::*;
