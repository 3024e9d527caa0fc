pub mod client;
pub mod fallback;

pub use client::{SearchClient, SearchSnippet, SerperClient, WebSearchResponse};
pub use fallback::WebSearchFallback;
