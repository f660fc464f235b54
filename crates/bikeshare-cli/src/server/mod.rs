//! JSON API over a shared [`bikeshare::Dashboard`].

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
