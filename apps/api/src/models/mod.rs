pub mod document;
pub mod profile;
pub mod user;
