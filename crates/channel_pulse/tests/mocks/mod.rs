pub mod page_fetcher;
pub mod playlist_store;
