//! HTTP request handlers.

pub(crate) mod media;
pub(crate) mod sources;
