pub mod origin;
pub mod reqwest_fetcher;
