pub mod chapter;
pub mod comic;
pub mod language;
pub mod link;
pub mod page;
pub mod website;
