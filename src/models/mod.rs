pub mod document;
pub mod listed_product;
pub mod outcome;
pub mod query;
pub mod recommendation;

pub use document::*;
pub use listed_product::*;
pub use outcome::*;
pub use query::*;
pub use recommendation::*;
