//! Video search proxy
//!
//! Forwards a free-text query to the YouTube Data API using the server's
//! credential and reshapes each hit into a [`VideoSummary`].

mod youtube;

pub use youtube::{parse_search_response, SearchError, VideoSummary, YouTubeSearch};
