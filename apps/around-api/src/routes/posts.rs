//! Post routes

use around_domain::ports::{MediaStore, SearchIndex};
use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::{posts::create_post_handler, search::search_handler},
    AppState,
};

/// Create post routes
pub fn routes<M, I>() -> Router<AppState<M, I>>
where
    M: MediaStore + 'static,
    I: SearchIndex + 'static,
{
    Router::new()
        .route("/post", post(create_post_handler::<M, I>))
        .route("/search", get(search_handler::<M, I>))
}
