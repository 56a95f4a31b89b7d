mod elastic_search_index;

pub use elastic_search_index::{ElasticError, ElasticSearchIndex};
