//! Core library for the `fetchdemo` screens.
//!
//! This crate defines:
//! - The fetch lifecycle controller (one in-flight request, minimum loader
//!   time, cancellation on supersede or detach)
//! - The JSON transport seam and its reqwest implementation
//! - View models for the post list and current-weather screens
//! - Configuration handling
//!
//! It is used by `fetchdemo-cli`, but can also be reused by other front ends.

pub mod config;
pub mod controller;
pub mod delay;
pub mod error;
pub mod location;
pub mod model;
pub mod posts;
pub mod transport;
pub mod view;
pub mod weather;

pub use config::{Config, Endpoints};
pub use controller::FetchController;
pub use delay::LoaderDelay;
pub use error::FetchError;
pub use location::Location;
pub use model::{FetchRequest, FetchState, RequestConfig};
pub use transport::{HttpTransport, JsonTransport};
pub use view::View;
