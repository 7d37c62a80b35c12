pub mod catalog;
pub mod resolver;
pub mod source;
