//! # Around Elasticsearch Adapter
//!
//! Implements the domain's `SearchIndex` port on an Elasticsearch index whose
//! `location` field is mapped as a `geo_point`.

pub mod infrastructure;
