//! In-process adapters used by tests and by `--storage memory`.

mod catalog;

pub use catalog::InMemoryCatalog;
