//! Posts: a guarded write and a public listing.

mod handler;
mod request;
mod response;

pub use handler::*;
