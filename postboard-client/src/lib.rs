//! Client side of postboard: a gateway that wraps every call to the API in a timeout and an
//! exponential backoff retry loop, plus typed accessors for users and posts.

pub mod config;
pub mod error;
pub mod gateway;
pub mod resources;
pub mod retry;

pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use gateway::{FetchOptions, Gateway, Payload, RequestOptions};
