//! Remote paginated API integration

pub mod client;
pub mod fetcher;

pub use client::HttpPageFetcher;
pub use fetcher::PageFetcher;
