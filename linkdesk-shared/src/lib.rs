//! # LinkDesk Shared Library
//!
//! This crate contains shared types, utilities, and business logic used by
//! the LinkDesk API server.
//!
//! ## Module Organization
//!
//! - `auth`: Session tokens, password hashing, credential verification
//! - `db`: PostgreSQL connection pool management
//! - `models`: Record types and their validated creation inputs
//! - `repository`: Generic CRUD over any [`store::DocumentStore`]
//! - `store`: Document storage backends (PostgreSQL, in-memory)

pub mod auth;
pub mod db;
pub mod models;
pub mod repository;
pub mod store;

/// Current version of the LinkDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
