//! API module for the broadcast guide
//!
//! REST interface over the shared guide service.

pub mod service;
pub mod handlers;

pub use handlers::router;
pub use service::GuideService;
