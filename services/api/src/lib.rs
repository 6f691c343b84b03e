//! services/api/src/lib.rs
//!
//! Library surface of the `api` service: configuration, the service-wide
//! error type, the PostgreSQL adapter for the episode store, and the axum
//! web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
