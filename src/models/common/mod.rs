pub mod nullable;
pub mod response;

pub use nullable::deserialize_nullable;
pub use response::{AppStartTime, ErrorResponse};
