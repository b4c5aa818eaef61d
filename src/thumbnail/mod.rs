pub mod coordinator;
pub mod db_store;
pub mod key;
pub mod memory_store;
pub mod record;
pub mod retry;
pub mod service;
pub mod store;
