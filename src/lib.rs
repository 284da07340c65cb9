//! `ltu-loadtest` is an async client for the LTU image recognition API,
//! built for load-testing the service.
//!
//! The client wraps four endpoints:
//! - [`LtuClient::upload_image`]
//! - [`LtuClient::search_by_upload`]
//! - [`LtuClient::delete_image`]
//! - [`LtuClient::is_available`]
//!
//! Transient network failures are retried by [`RetryPolicy`] with linear backoff.

mod client;
mod config;
mod decode;
mod error;
mod image;
mod options;
mod retry;
mod types;
mod wire;

pub use client::{
    LtuClient, ADD_IMAGE_PATH, APPLICATION_STATUS_PATH, DELETE_IMAGE_PATH, SEARCH_BY_UPLOAD_PATH,
};
pub use config::{Environment, ServiceConfig, Settings};
pub use error::{LtuError, NetworkFailure};
pub use image::ImagePayload;
pub use options::ClientOptions;
pub use retry::{RetryPolicy, Transient};
pub use types::{ImageMatch, SearchResult, Status};

pub type Result<T> = std::result::Result<T, LtuError>;
