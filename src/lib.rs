//! Regional broadcast guide
//!
//! Resolves which channel carries each game for a viewer's ZIP code and
//! maintains the admin-editable DMA rule table behind those overrides.

pub mod api;
pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod location;
pub mod markets;
pub mod models;
pub mod resolver;
pub mod review;
pub mod rules;
pub mod sample;
pub mod session;
