//! Interactive prompt that shows what a GitHub user has been up to lately.
//! Recent public events are fetched from the REST API, kept in a small in-memory cache, and
//! condensed into a few human readable lines: one per star, fork or new repository, and one per
//! kind of work done in each repository.
//!

pub mod activity;
pub mod cli;
pub mod github;
pub mod utils;
