//! Core library for the placement cell service.
//!
//! Each module pairs a domain model with a repository trait, a service that
//! owns the business rules, and an axum router builder generic over the
//! repository so the HTTP surface can be exercised against in-memory stores.

pub mod analysis;
pub mod applications;
pub mod community;
pub mod config;
pub mod directory;
pub mod error;
pub mod notify;
pub mod records;
pub mod recruiting;
pub mod schedule;
pub mod storage;
pub mod telemetry;
