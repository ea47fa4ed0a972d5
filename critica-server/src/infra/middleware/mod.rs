pub mod error_envelope;

pub use error_envelope::{ErrorEnvelopeLayer, ErrorEnvelopeMiddleware};
