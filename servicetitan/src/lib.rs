mod auth;
mod client;
mod servicetitan_url;
mod technician;

pub(crate) use servicetitan_url::*;

pub use auth::*;
pub use client::*;
pub use technician::*;
