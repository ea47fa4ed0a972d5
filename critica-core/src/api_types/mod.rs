pub mod dto;
pub mod requests;
pub mod responses;

pub use dto::*;
pub use requests::*;
pub use responses::*;
