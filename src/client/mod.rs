//! Client side of the user directory API

pub mod errors;
pub mod http;
pub mod source;
pub mod types;

pub use errors::{ClientError, ClientResult};
pub use http::HttpUserSource;
pub use source::RemoteSource;
pub use types::{format_date, SourcePage, User};
