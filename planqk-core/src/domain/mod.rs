//! Core domain types
//!
//! This module contains the structures returned by the PlanQK platform.
//! Field names follow the platform's camelCase JSON; fields the SDK does not
//! depend on are optional so that additions on the platform side do not break
//! deserialization.

pub mod application;
pub mod data_pool;
pub mod job;
pub mod service;
pub mod status;
