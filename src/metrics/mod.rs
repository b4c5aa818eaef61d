pub mod prometheus;
pub mod sink;
