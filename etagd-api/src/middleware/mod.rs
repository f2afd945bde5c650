//! Middleware modules for etagd API
//!
//! - `conditional`: conditional request guard and validator generation
//!
//! # Middleware Order
//!
//! The conditional layer sits on the resource router only. Observability and
//! CORS wrap the whole application:
//!
//! ```ignore
//! Router::new()
//!     .nest("/etag", resource_router) // conditional layer inside
//!     .layer(middleware::from_fn(observability_middleware))
//!     .layer(TraceLayer::new_for_http())
//!     .layer(cors)
//!     // Outermost
//! ```

pub mod conditional;

pub use conditional::{conditional_middleware, ConditionalError};
