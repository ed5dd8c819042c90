//! # galleria-core
//!
//! Core types, traits, and pagination primitives for the galleria media feed.
//!
//! This crate provides the data model, the opaque cursor codec, tag-list
//! normalisation, page assembly and the repository trait that storage
//! backends implement. It performs no I/O of its own.

pub mod cursor;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod page;
pub mod tags;
pub mod traits;

// Re-export commonly used types at crate root
pub use cursor::{decode_timestamp, encode_timestamp, PageCursor};
pub use error::{Error, Result};
pub use models::*;
pub use page::{assemble_page, AssembledPage, FeedResponse, PageLimit};
pub use tags::{group_tags, normalize_tags, TagFilter};
pub use traits::*;
