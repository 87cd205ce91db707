pub(crate) mod error;
pub(crate) mod functions;
pub(crate) mod installs;

pub(crate) use error::ApiError;
