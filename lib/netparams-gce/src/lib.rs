//! Compute API integration
//!
//! Implements the validators' `CloudNetworks` collaborator on top of the
//! Compute REST API.
pub mod client;
pub mod config;
pub mod error;
pub mod networks;

pub use client::ComputeClient;
pub use config::GceConfig;
pub use error::{GceError, Result};
pub use networks::GceNetworks;
