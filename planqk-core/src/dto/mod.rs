//! Data Transfer Objects sent to the platform
//!
//! Request bodies for the service platform and data pool catalog. Response
//! types live in [`crate::domain`].

pub mod application;
pub mod auth;
pub mod data_pool;
pub mod job;
pub mod service;
