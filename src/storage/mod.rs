pub mod blob;
pub mod local_storage;
