pub mod compose;
pub mod resolve;
pub mod segment;
pub mod validate;
