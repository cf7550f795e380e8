//! mediashelf: a small local-first personal media server
//!
//! - Library and journal records stored as flat JSON array files
//! - Image uploads under generated names, with a gallery listing
//! - A YouTube search proxy using a server-held API key
//! - Static serving of the web UI

pub mod collection;
pub mod config;
pub mod http;
pub mod media;
pub mod search;
pub mod store;

pub use config::Config;
