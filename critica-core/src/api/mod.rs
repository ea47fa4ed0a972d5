//! API-facing facade (transport DTOs and routes).

pub mod routes;

pub mod types {
    pub use crate::api_types::*;
}
