//! Request handlers

pub mod posts;
pub mod search;
