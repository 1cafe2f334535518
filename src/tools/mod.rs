//! Web lookup collaborators used by the function-call endpoints.

mod web;

pub use web::{fetch_url, web_search, FetchedPage, SearchResult, SearchResults, WebToolError};
