//! # cartpass-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for all CartPass entities.
//!
//! Repository methods that must participate in a caller-owned transaction
//! take an explicit `&mut PgConnection`; single-statement operations run
//! against the shared pool.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
