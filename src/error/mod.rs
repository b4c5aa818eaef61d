pub mod entity;
pub mod thumbnail;
