//! # Around S3 Adapter
//!
//! Implements the domain's `MediaStore` port on top of AWS S3 or any
//! S3-compatible object store.

pub mod infrastructure;
