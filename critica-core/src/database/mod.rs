//! Persistence: ports, their Postgres and in-memory adapters, and the pool.

pub mod infrastructure;
pub mod ports;
pub mod postgres;

pub use postgres::{PoolSettings, PoolStats, PostgresDatabase};
