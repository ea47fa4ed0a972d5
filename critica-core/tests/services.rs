//! Service behaviour over the in-memory catalog.

use critica_core::api_types::requests::{
    CreateReviewRequest, PatchReviewRequest, ReplaceReviewRequest, Validate,
};
use critica_core::application::AppUnitOfWork;
use critica_core::error::{Aggregate, CatalogError};
use critica_core::messages::ErrorCode;
use critica_core::query::{FilterBuilder, GameKey, MovieKey, ReviewKey};
use critica_core::services::Services;
use critica_model::{
    CrewAssignment, CrewId, CrewRole, DeveloperId, GenreId, LikeId, Media, MediaId, NewDeveloper, NewGame,
    NewLike, NewMovie, NewMovieCrew, NewNamed, NewReview, NewUser, PageRequest, PlatformId,
    ReviewId, UserId,
};
use rust_decimal::Decimal;

fn named(name: &str) -> NewNamed {
    NewNamed { name: name.into() }
}

fn user(name: &str) -> NewUser {
    NewUser {
        username: name.into(),
        email: format!("{name}@example.com"),
    }
}

fn game(title: &str) -> NewGame {
    NewGame {
        title: title.into(),
        release_date: None,
        description: None,
        price: Decimal::new(5999, 2),
        developer_id: None,
        genre_ids: vec![],
        platform_ids: vec![],
    }
}

fn movie(title: &str) -> NewMovie {
    NewMovie {
        title: title.into(),
        release_date: None,
        description: None,
        producer: "someone".into(),
        actors: Default::default(),
    }
}

fn titles(media: &[Media]) -> Vec<&str> {
    media.iter().map(|m| m.title.as_str()).collect()
}

fn review(user: UserId, media: MediaId) -> NewReview {
    NewReview {
        user_id: user,
        media_id: media,
        score: 8,
        text: "solid".into(),
    }
}

#[tokio::test]
async fn created_developer_reads_back_lowercased() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    let created = services
        .developers()
        .create(NewDeveloper {
            name: "Nintendo".into(),
            social_links: vec!["https://nintendo.com".into()],
        })
        .await
        .expect("create developer");
    let fetched = services.developers().get(created.id).await.expect("get");

    assert_eq!(fetched.name, "nintendo");
    assert_eq!(fetched.social_links, vec!["https://nintendo.com".to_string()]);
    assert_eq!(fetched.games, Some(vec![]));
}

#[tokio::test]
async fn names_differing_only_in_case_conflict() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    services.platforms().create(named("Switch")).await.expect("first");
    let err = services
        .platforms()
        .create(named("SWITCH"))
        .await
        .expect_err("duplicate");
    assert_eq!(
        err,
        CatalogError::already_exists(Aggregate::Platform, "switch")
    );

    services.genres().create(named("RPG")).await.expect("first");
    assert!(matches!(
        services.genres().create(named("rpg")).await,
        Err(CatalogError::AlreadyExists { aggregate: Aggregate::Genre, .. })
    ));
}

#[tokio::test]
async fn usernames_and_emails_are_unique_ignoring_case() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    services.users().create(user("Ana")).await.expect("first");
    let err = services
        .users()
        .create(NewUser {
            username: "ANA".into(),
            email: "other@example.com".into(),
        })
        .await
        .expect_err("same username");
    assert_eq!(err.to_string(), "User already exists: ana");

    let err = services
        .users()
        .create(NewUser {
            username: "bea".into(),
            email: "ANA@example.com".into(),
        })
        .await
        .expect_err("same email");
    assert_eq!(err.to_string(), "User already exists: ana@example.com");
}

#[tokio::test]
async fn not_found_names_aggregate_and_id() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    let cases = [
        services.developers().get(DeveloperId(7)).await.map(|_| ()),
        services.platforms().get(PlatformId(7)).await.map(|_| ()),
        services.genres().get(GenreId(7)).await.map(|_| ()),
        services.games().get(MediaId(7)).await.map(|_| ()),
        services.movies().get(MediaId(7)).await.map(|_| ()),
        services.media().get(MediaId(7)).await.map(|_| ()),
        services.crew().get(CrewId(7)).await.map(|_| ()),
        services.likes().get(LikeId(7)).await.map(|_| ()),
        services.reviews().get(ReviewId(7)).await.map(|_| ()),
        services.users().get(UserId(7)).await.map(|_| ()),
    ];
    let expected = [
        "Developer", "Platform", "Genre", "Game", "Movie", "Media", "Movie crew", "Like",
        "Review", "User",
    ];

    for (result, label) in cases.into_iter().zip(expected) {
        let err = result.expect_err("missing id");
        assert_eq!(err.to_string(), format!("{label} not found with id: 7"));
    }
}

#[tokio::test]
async fn game_lookup_does_not_return_movies() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    let film = services.movies().create(movie("Heat")).await.expect("movie");
    assert!(matches!(
        services.games().get(film.id).await,
        Err(CatalogError::NotFound { aggregate: Aggregate::Game, .. })
    ));
    let resolved = services.media().get(film.id).await.expect("media");
    assert!(resolved.as_movie().is_some());
}

#[tokio::test]
async fn game_creation_resolves_every_reference() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    let dev = services
        .developers()
        .create(NewDeveloper {
            name: "Nintendo".into(),
            social_links: vec![],
        })
        .await
        .expect("developer");
    let genre = services.genres().create(named("Adventure")).await.expect("genre");

    let mut missing_platform = game("Zelda");
    missing_platform.developer_id = Some(dev.id);
    missing_platform.genre_ids = vec![genre.id];
    missing_platform.platform_ids = vec![PlatformId(42)];
    let err = services
        .games()
        .create(missing_platform)
        .await
        .expect_err("unknown platform");
    assert_eq!(err, CatalogError::not_found(Aggregate::Platform, 42));
    assert_eq!(services.games().list(PageRequest::default()).await.unwrap().total_elements, 0);

    let mut ok = game("Zelda");
    ok.developer_id = Some(dev.id);
    ok.genre_ids = vec![genre.id];
    let created = services.games().create(ok).await.expect("game");
    let details = created.as_game().expect("game payload");
    assert_eq!(details.developer.as_ref().map(|d| d.name.as_str()), Some("nintendo"));
    assert_eq!(details.genres.as_ref().map(Vec::len), Some(1));

    let dev = services.developers().get(dev.id).await.expect("developer");
    assert_eq!(dev.games.map(|g| g.len()), Some(1));
}

#[tokio::test]
async fn game_price_must_fit_the_price_column() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    let mut fine = game("Fine");
    fine.price = Decimal::new(19_999, 3);
    let err = services.games().create(fine).await.expect_err("three decimals");
    let CatalogError::Invalid(violations) = err else {
        panic!("expected Invalid, got {err:?}");
    };
    assert_eq!(violations[0].code, ErrorCode::PriceScale);

    let mut pricey = game("Pricey");
    pricey.price = Decimal::new(100_000_000, 0);
    let err = services.games().create(pricey).await.expect_err("too large");
    assert_eq!(err.to_string(), "Price must be less than 100000000");

    let listed = services.games().list(PageRequest::default()).await.expect("list");
    assert_eq!(listed.total_elements, 0);
}

#[tokio::test]
async fn pages_of_two_over_three_rows() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);
    for name in ["pc", "switch", "ps5"] {
        services.platforms().create(named(name)).await.expect("platform");
    }

    let first = services
        .platforms()
        .list(PageRequest::new(0, 2))
        .await
        .expect("page 0");
    let second = services
        .platforms()
        .list(PageRequest::new(1, 2))
        .await
        .expect("page 1");

    assert_eq!(first.content.len(), 2);
    assert_eq!(second.content.len(), 1);
    assert_eq!(first.total_elements, 3);
    assert_eq!(first.total_pages, 2);
}

#[tokio::test]
async fn game_search_combines_criteria_with_and() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    let action = services.genres().create(named("Action")).await.expect("genre");
    let puzzle = services.genres().create(named("Puzzle")).await.expect("genre");

    for (title, genre) in [("Zelda", action.id), ("Zelda Picross", puzzle.id), ("Doom", action.id)]
    {
        let mut new_game = game(title);
        new_game.genre_ids = vec![genre];
        services.games().create(new_game).await.expect("game");
    }

    let filter = FilterBuilder::<GameKey>::new()
        .with("genre", "ACT")
        .with("title", "zel")
        .build()
        .expect("filter");
    let page = services
        .games()
        .search(&filter, PageRequest::default())
        .await
        .expect("search");
    assert_eq!(titles(&page.content), vec!["Zelda"]);
}

#[tokio::test]
async fn games_without_developer_never_match_developer_key() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);
    services.games().create(game("Orphan")).await.expect("game");

    let filter = FilterBuilder::<GameKey>::new()
        .with("developer", "")
        .build()
        .expect("filter");
    let page = services
        .games()
        .search(&filter, PageRequest::default())
        .await
        .expect("search");
    assert!(page.content.is_empty());
}

#[tokio::test]
async fn unknown_keys_return_the_unfiltered_set() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);
    services.games().create(game("Zelda")).await.expect("game");
    services.games().create(game("Doom")).await.expect("game");

    let filter = FilterBuilder::<GameKey>::new()
        .with("colour", "red")
        .build()
        .expect("filter");
    assert_eq!(filter.ignored_keys(), ["colour".to_string()]);

    let page = services
        .games()
        .search(&filter, PageRequest::default())
        .await
        .expect("search");
    assert_eq!(page.total_elements, 2);
}

#[tokio::test]
async fn movie_search_by_crew_member() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    let heat = services.movies().create(movie("Heat")).await.expect("movie");
    services.movies().create(movie("Alien")).await.expect("movie");
    let mann = services
        .crew()
        .create(NewMovieCrew {
            name: "Michael Mann".into(),
            birth_date: None,
        })
        .await
        .expect("crew");
    services
        .crew()
        .assign(
            heat.id,
            CrewAssignment {
                crew_id: mann.id,
                role: CrewRole::Director,
                character_name: None,
            },
        )
        .await
        .expect("assign");

    let filter = FilterBuilder::<MovieKey>::new()
        .with("crewId", &mann.id.to_string())
        .build()
        .expect("filter");
    let page = services
        .movies()
        .search(&filter, PageRequest::default())
        .await
        .expect("search");
    assert_eq!(titles(&page.content), vec!["Heat"]);
}

#[tokio::test]
async fn second_role_for_the_same_pair_conflicts() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    let heat = services.movies().create(movie("Heat")).await.expect("movie");
    let pacino = services
        .crew()
        .create(NewMovieCrew {
            name: "Al Pacino".into(),
            birth_date: None,
        })
        .await
        .expect("crew");
    let assignment = CrewAssignment {
        crew_id: pacino.id,
        role: CrewRole::Actor,
        character_name: Some("Vincent Hanna".into()),
    };

    let role = services
        .crew()
        .assign(heat.id, assignment.clone())
        .await
        .expect("first role");
    assert_eq!(role.crew_name, "Al Pacino");

    assert!(matches!(
        services.crew().assign(heat.id, assignment).await,
        Err(CatalogError::AlreadyExists { aggregate: Aggregate::MovieCrewRole, .. })
    ));

    services.crew().unassign(heat.id, pacino.id).await.expect("unassign");
    let heat = services.movies().get(heat.id).await.expect("movie");
    assert_eq!(heat.as_movie().and_then(|m| m.crew.clone()), Some(vec![]));
}

#[tokio::test]
async fn duplicate_like_fails_until_the_first_is_deleted() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    let ana = services.users().create(user("ana")).await.expect("user");
    let zelda = services.games().create(game("Zelda")).await.expect("game");
    let like = NewLike {
        user_id: ana.id,
        media_id: zelda.id,
    };

    let first = services.likes().create(like).await.expect("first like");
    let err = services.likes().create(like).await.expect_err("second like");
    assert_eq!(err.to_string(), format!("User {} already liked media {}", ana.id, zelda.id));

    services.likes().delete(first.id).await.expect("delete");
    services.likes().create(like).await.expect("like again");

    let zelda = services.games().get(zelda.id).await.expect("game");
    assert_eq!(zelda.stats.likes, 1);
}

#[tokio::test]
async fn like_checks_user_and_media_independently() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    let ana = services.users().create(user("ana")).await.expect("user");
    let zelda = services.games().create(game("Zelda")).await.expect("game");

    let err = services
        .likes()
        .create(NewLike {
            user_id: UserId(99),
            media_id: zelda.id,
        })
        .await
        .expect_err("missing user");
    assert_eq!(err, CatalogError::not_found(Aggregate::User, 99));

    let err = services
        .likes()
        .create(NewLike {
            user_id: ana.id,
            media_id: MediaId(99),
        })
        .await
        .expect_err("missing media");
    assert_eq!(err, CatalogError::not_found(Aggregate::Media, 99));
}

#[tokio::test]
async fn duplicate_review_fails_until_the_first_is_deleted() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    let ana = services.users().create(user("ana")).await.expect("user");
    let heat = services.movies().create(movie("Heat")).await.expect("movie");

    let first = services
        .reviews()
        .create(review(ana.id, heat.id))
        .await
        .expect("review");
    assert!(matches!(
        services.reviews().create(review(ana.id, heat.id)).await,
        Err(CatalogError::AlreadyReviewed { .. })
    ));

    services.reviews().delete(first.id).await.expect("delete");
    services
        .reviews()
        .create(review(ana.id, heat.id))
        .await
        .expect("review again");
}

#[test]
fn review_validation_lists_every_violation() {
    let request = CreateReviewRequest {
        user_id: Some(UserId(1)),
        media_id: Some(MediaId(1)),
        score: Some(11),
        text: Some("x".repeat(1025)),
    };
    let messages: Vec<String> = request
        .validate()
        .expect_err("both invalid")
        .into_iter()
        .map(|v| v.message)
        .collect();

    assert!(messages.contains(&"Score must be between 1 and 10".to_string()));
    assert!(messages.contains(&"text must be at most 1024 characters".to_string()));
}

#[tokio::test]
async fn put_replaces_and_patch_keeps_absent_fields() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    let ana = services.users().create(user("ana")).await.expect("user");
    let zelda = services.games().create(game("Zelda")).await.expect("game");
    let created = services
        .reviews()
        .create(review(ana.id, zelda.id))
        .await
        .expect("review");

    let replace = ReplaceReviewRequest {
        score: Some(3),
        text: Some("changed my mind".into()),
    }
    .validate()
    .expect("valid replace");
    let replaced = services
        .reviews()
        .update(created.id, replace)
        .await
        .expect("put");
    assert_eq!((replaced.score, replaced.text.as_str()), (3, "changed my mind"));

    let patch = PatchReviewRequest {
        score: Some(6),
        text: None,
    }
    .validate()
    .expect("valid patch");
    let patched = services.reviews().update(created.id, patch).await.expect("patch");
    assert_eq!(patched.score, 6);
    assert_eq!(patched.text, "changed my mind");
    assert!(patched.updated_at >= created.updated_at);
    let stored = services.reviews().get(created.id).await.expect("stored");
    assert_eq!(stored, patched);

    assert!(
        ReplaceReviewRequest {
            score: Some(3),
            text: None,
        }
        .validate()
        .is_err()
    );
}

#[tokio::test]
async fn review_search_by_user() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    let ana = services.users().create(user("ana")).await.expect("user");
    let bea = services.users().create(user("bea")).await.expect("user");
    let zelda = services.games().create(game("Zelda")).await.expect("game");
    services.reviews().create(review(ana.id, zelda.id)).await.expect("ana");
    services.reviews().create(review(bea.id, zelda.id)).await.expect("bea");

    let filter = FilterBuilder::<ReviewKey>::new()
        .with("userId", &bea.id.to_string())
        .with("mediaId", &zelda.id.to_string())
        .build()
        .expect("filter");
    let page = services
        .reviews()
        .search(&filter, PageRequest::default())
        .await
        .expect("search");
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].username, "bea");
}

#[tokio::test]
async fn deleting_media_removes_interactions_but_keeps_catalog_entries() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    let ana = services.users().create(user("ana")).await.expect("user");
    let dev = services
        .developers()
        .create(NewDeveloper {
            name: "id software".into(),
            social_links: vec![],
        })
        .await
        .expect("developer");
    let genre = services.genres().create(named("shooter")).await.expect("genre");
    let platform = services.platforms().create(named("pc")).await.expect("platform");

    let mut doom = game("Doom");
    doom.developer_id = Some(dev.id);
    doom.genre_ids = vec![genre.id];
    doom.platform_ids = vec![platform.id];
    let doom = services.games().create(doom).await.expect("game");

    let like = services
        .likes()
        .create(NewLike {
            user_id: ana.id,
            media_id: doom.id,
        })
        .await
        .expect("like");
    let rev = services
        .reviews()
        .create(review(ana.id, doom.id))
        .await
        .expect("review");

    services.games().delete(doom.id).await.expect("delete game");

    let likes = services
        .likes()
        .list_by_media(doom.id, PageRequest::default())
        .await
        .expect("likes of deleted media");
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
        .expect("reviews of deleted media");
    assert!(reviews.content.is_empty());
    assert_eq!(reviews.total_elements, 0);

    assert!(services.likes().get(like.id).await.is_err());
    assert!(services.reviews().get(rev.id).await.is_err());
    services.developers().get(dev.id).await.expect("developer kept");
    services.genres().get(genre.id).await.expect("genre kept");
    services.platforms().get(platform.id).await.expect("platform kept");
    services.users().get(ana.id).await.expect("user kept");

    assert_eq!(
        services.games().delete(doom.id).await,
        Err(CatalogError::not_found(Aggregate::Game, doom.id))
    );
}

#[tokio::test]
async fn deleting_a_developer_detaches_its_games() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    let dev = services
        .developers()
        .create(NewDeveloper {
            name: "valve".into(),
            social_links: vec![],
        })
        .await
        .expect("developer");
    let mut portal = game("Portal");
    portal.developer_id = Some(dev.id);
    let portal = services.games().create(portal).await.expect("game");

    services.developers().delete(dev.id).await.expect("delete");

    let portal = services.games().get(portal.id).await.expect("game kept");
    assert_eq!(portal.as_game().and_then(|g| g.developer.clone()), None);
}

#[tokio::test]
async fn deactivated_users_leave_default_listing() {
    let uow = AppUnitOfWork::in_memory();
    let services = Services::new(&uow);

    let ana = services.users().create(user("ana")).await.expect("user");
    services.users().create(user("bea")).await.expect("user");
    services.users().deactivate(ana.id).await.expect("deactivate");

    let active = services
        .users()
        .list(PageRequest::default(), false)
        .await
        .expect("list");
    let everyone = services
        .users()
        .list(PageRequest::default(), true)
        .await
        .expect("list all");

    assert_eq!(active.total_elements, 1);
    assert_eq!(everyone.total_elements, 2);
    assert!(!services.users().get(ana.id).await.expect("still readable").is_active);
}
