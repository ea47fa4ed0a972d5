//! Postgres adapter tests. Need a server reachable through `DATABASE_URL`.
#![cfg(feature = "postgres-tests")]

use critica_core::application::AppUnitOfWork;
use critica_core::error::{Aggregate, CatalogError};
use critica_core::query::{FilterBuilder, GameKey, ReviewKey};
use critica_core::services::Services;
use critica_model::{
    CrewRole, GenreId, MediaId, MovieCrewKey, NewCrewRole, NewGame, NewLike, NewMovie,
    NewMovieCrew, NewNamed, NewReview, NewUser, PageRequest, ReviewPatch,
};
use rust_decimal::Decimal;
use sqlx::PgPool;

fn game(title: &str, genre_ids: Vec<GenreId>) -> NewGame {
    NewGame {
        title: title.into(),
        release_date: None,
        description: Some("test fixture".into()),
        price: Decimal::new(1999, 2),
        developer_id: None,
        genre_ids,
        platform_ids: vec![],
    }
}

#[sqlx::test(migrator = "critica_core::MIGRATOR")]
async fn named_rows_are_unique_ignoring_case(pool: PgPool) {
    let uow = AppUnitOfWork::postgres(pool);

    let created = uow
        .genres
        .insert(&NewNamed {
            name: "Action".into(),
        })
        .await
        .expect("insert");
    assert_eq!(created.name, "action");

    let err = uow
        .genres
        .insert(&NewNamed {
            name: "ACTION".into(),
        })
        .await
        .expect_err("duplicate");
    assert_eq!(err, CatalogError::already_exists(Aggregate::Genre, "action"));

    let found = uow.genres.find_by_name("AcTiOn").await.expect("lookup");
    assert_eq!(found.map(|g| g.id), Some(created.id));
}

#[sqlx::test(migrator = "critica_core::MIGRATOR")]
async fn game_insert_rolls_back_on_missing_genre(pool: PgPool) {
    let uow = AppUnitOfWork::postgres(pool.clone());

    let err = uow
        .games
        .insert(&game("Zelda", vec![GenreId(404)]))
        .await
        .expect_err("unknown genre");
    assert!(matches!(err, CatalogError::NotFound { .. }));

    let media_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM media")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(media_rows, 0);
}

#[sqlx::test(migrator = "critica_core::MIGRATOR")]
async fn game_search_and_stats(pool: PgPool) {
    let uow = AppUnitOfWork::postgres(pool);

    let action = uow
        .genres
        .insert(&NewNamed {
            name: "action".into(),
        })
        .await
        .expect("genre");
    let zelda = uow
        .games
        .insert(&game("Zelda", vec![action.id]))
        .await
        .expect("zelda");
    uow.games
        .insert(&game("Zelda Picross", vec![]))
        .await
        .expect("picross");

    let user = uow
        .users
        .insert(&NewUser {
            username: "Ana".into(),
            email: "ana@example.com".into(),
        })
        .await
        .expect("user");
    uow.likes
        .insert(&NewLike {
            user_id: user.id,
            media_id: zelda.id,
        })
        .await
        .expect("like");

    let filter = FilterBuilder::<GameKey>::new()
        .with("genre", "act")
        .with("title", "zel")
        .build()
        .expect("filter");
    let page = uow
        .games
        .search(&filter, PageRequest::default())
        .await
        .expect("search");

    assert_eq!(page.total_elements, 1);
    assert_eq!(page.content[0].id, zelda.id);
    assert_eq!(page.content[0].stats.likes, 1);
    assert_eq!(page.content[0].stats.reviews, 0);
}

#[sqlx::test(migrator = "critica_core::MIGRATOR")]
async fn interaction_constraints_map_to_domain_errors(pool: PgPool) {
    let uow = AppUnitOfWork::postgres(pool);

    let user = uow
        .users
        .insert(&NewUser {
            username: "ana".into(),
            email: "ana@example.com".into(),
        })
        .await
        .expect("user");
    let movie = uow
        .movies
        .insert(&NewMovie {
            title: "Heat".into(),
            release_date: None,
            description: None,
            producer: "Art Linson".into(),
            actors: ["Al Pacino".to_string()].into_iter().collect(),
        })
        .await
        .expect("movie");

    let review = NewReview {
        user_id: user.id,
        media_id: movie.id,
        score: 9,
        text: "tense".into(),
    };
    let created = uow.reviews.insert(&review).await.expect("review");
    assert!(matches!(
        uow.reviews.insert(&review).await,
        Err(CatalogError::AlreadyReviewed { .. })
    ));

    let err = uow
        .likes
        .insert(&NewLike {
            user_id: user.id,
            media_id: MediaId(9999),
        })
        .await
        .expect_err("missing media");
    assert_eq!(err, CatalogError::not_found(Aggregate::Media, 9999));

    let updated = uow
        .reviews
        .update(
            created.id,
            &ReviewPatch {
                score: None,
                text: Some("still tense".into()),
            },
        )
        .await
        .expect("update")
        .expect("row exists");
    assert_eq!(updated.score, 9);
    assert_eq!(updated.text, "still tense");
}

#[sqlx::test(migrator = "critica_core::MIGRATOR")]
async fn deleting_a_movie_cascades_to_roles_and_reviews(pool: PgPool) {
    let uow = AppUnitOfWork::postgres(pool);

    let movie = uow
        .movies
        .insert(&NewMovie {
            title: "Alien".into(),
            release_date: None,
            description: None,
            producer: "Walter Hill".into(),
            actors: Default::default(),
        })
        .await
        .expect("movie");
    let scott = uow
        .crew
        .insert(&NewMovieCrew {
            name: "Ridley Scott".into(),
            birth_date: None,
        })
        .await
        .expect("crew");
    let key = MovieCrewKey::new(movie.id, scott.id);
    uow.crew
        .assign_role(&NewCrewRole {
            key,
            role: CrewRole::Director,
            character_name: None,
        })
        .await
        .expect("role");

    let err = uow
        .crew
        .assign_role(&NewCrewRole {
            key,
            role: CrewRole::Writer,
            character_name: None,
        })
        .await
        .expect_err("second role");
    assert!(matches!(
        err,
        CatalogError::AlreadyExists {
            aggregate: Aggregate::MovieCrewRole,
            ..
        }
    ));

    let loaded = uow.media.get_media(movie.id).await.expect("get").expect("exists");
    assert_eq!(loaded.as_movie().and_then(|m| m.crew.as_ref()).map(Vec::len), Some(1));

    assert!(uow.movies.delete(movie.id).await.expect("delete"));
    assert_eq!(uow.crew.find_role(key).await.expect("lookup"), None);
    assert!(uow.crew.get(scott.id).await.expect("crew kept").is_some());
}

#[sqlx::test(migrator = "critica_core::MIGRATOR")]
async fn listings_by_deleted_media_are_empty(pool: PgPool) {
    let uow = AppUnitOfWork::postgres(pool);
    let services = Services::new(&uow);

    let user = services
        .users()
        .create(NewUser {
            username: "ana".into(),
            email: "ana@example.com".into(),
        })
        .await
        .expect("user");
    let doom = services
        .games()
        .create(game("Doom", vec![]))
        .await
        .expect("game");
    services
        .likes()
        .create(NewLike {
            user_id: user.id,
            media_id: doom.id,
        })
        .await
        .expect("like");
    services
        .reviews()
        .create(NewReview {
            user_id: user.id,
            media_id: doom.id,
            score: 7,
            text: "fast".into(),
        })
        .await
        .expect("review");

    services.games().delete(doom.id).await.expect("delete");

    let likes = services
        .likes()
        .list_by_media(doom.id, PageRequest::default())
        .await
        .expect("likes");
    assert!(likes.content.is_empty());
    assert_eq!(likes.total_elements, 0);

    let filter = FilterBuilder::<ReviewKey>::new()
        .with("mediaId", &doom.id.to_string())
        .build()
        .expect("filter");
    let reviews = services
        .reviews()
        .search(&filter, PageRequest::default())
        .await
        .expect("reviews");
    assert!(reviews.content.is_empty());
    assert_eq!(reviews.total_elements, 0);
}
