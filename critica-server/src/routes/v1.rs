use axum::{
    Router,
    routing::{delete, get, post},
};
use critica_core::api::routes::v1;

use crate::{
    AppState,
    handlers::{catalog, crew, games, likes, media, movies, reviews, users},
};

/// Create all v1 API routes
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .merge(create_catalog_routes())
        .merge(create_media_routes())
        .merge(create_interaction_routes())
        .route(
            v1::users::COLLECTION,
            get(users::list_users).post(users::create_user),
        )
        .route(
            v1::users::ITEM,
            get(users::get_user).delete(users::deactivate_user),
        )
}

fn create_catalog_routes() -> Router<AppState> {
    Router::new()
        .route(
            v1::developers::COLLECTION,
            get(catalog::list_developers).post(catalog::create_developer),
        )
        .route(
            v1::developers::ITEM,
            get(catalog::get_developer).delete(catalog::delete_developer),
        )
        .route(
            v1::platforms::COLLECTION,
            get(catalog::list_platforms).post(catalog::create_platform),
        )
        .route(
            v1::platforms::ITEM,
            get(catalog::get_platform).delete(catalog::delete_platform),
        )
        .route(
            v1::genres::COLLECTION,
            get(catalog::list_genres).post(catalog::create_genre),
        )
        .route(
            v1::genres::ITEM,
            get(catalog::get_genre).delete(catalog::delete_genre),
        )
        .route(
            v1::crew::COLLECTION,
            get(crew::list_crew).post(crew::create_crew),
        )
        .route(
            v1::crew::ITEM,
            get(crew::get_crew).delete(crew::delete_crew),
        )
}

fn create_media_routes() -> Router<AppState> {
    Router::new()
        .route(
            v1::games::COLLECTION,
            get(games::list_games).post(games::create_game),
        )
        .route(v1::games::SEARCH, get(games::search_games))
        .route(
            v1::games::ITEM,
            get(games::get_game).delete(games::delete_game),
        )
        .route(
            v1::movies::COLLECTION,
            get(movies::list_movies).post(movies::create_movie),
        )
        .route(v1::movies::SEARCH, get(movies::search_movies))
        .route(
            v1::movies::ITEM,
            get(movies::get_movie).delete(movies::delete_movie),
        )
        .route(v1::movies::CREW, post(movies::assign_crew_role))
        .route(v1::movies::CREW_ITEM, delete(movies::remove_crew_role))
        .route(v1::media::ITEM, get(media::get_media))
}

fn create_interaction_routes() -> Router<AppState> {
    Router::new()
        .route(
            v1::likes::COLLECTION,
            get(likes::list_likes).post(likes::create_like),
        )
        .route(
            v1::likes::ITEM,
            get(likes::get_like).delete(likes::delete_like),
        )
        .route(v1::likes::BY_MEDIA, get(likes::likes_by_media))
        .route(v1::likes::BY_USER, get(likes::likes_by_user))
        .route(
            v1::reviews::COLLECTION,
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(v1::reviews::SEARCH, get(reviews::search_reviews))
        .route(
            v1::reviews::ITEM,
            get(reviews::get_review)
                .put(reviews::replace_review)
                .patch(reviews::patch_review)
                .delete(reviews::delete_review),
        )
}
