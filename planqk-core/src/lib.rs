//! PlanQK Core
//!
//! Core types for the PlanQK platform SDK.
//!
//! This crate contains:
//! - Domain types: Entities returned by the platform (Service, Job, DataPool, etc.)
//! - DTOs: Request bodies sent to the platform

pub mod domain;
pub mod dto;
