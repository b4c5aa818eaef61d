pub mod app;
pub mod coordinator;
pub mod db;
pub mod env;
pub mod fetch;
pub mod image;
pub mod media;
