#[path = "support/mod.rs"]
mod support;

use anyhow::Result;
use axum::http::StatusCode;
use critica_core::api::routes::{HEALTH, utils::with_query, v1};
use critica_server::infra::config::Config;
use serde_json::{Value, json};

use support::{build_test_app, build_test_app_with, create, id_of, item};

#[tokio::test]
async fn health_reports_memory_storage() -> Result<()> {
    let app = build_test_app()?;

    let response = app.server.get(HEALTH).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
    Ok(())
}

#[tokio::test]
async fn platform_names_are_unique_ignoring_case() -> Result<()> {
    let app = build_test_app()?;

    let platform = create(&app.server, v1::platforms::COLLECTION, json!({ "name": " PS5 " })).await?;
    assert_eq!(platform["name"], "ps5");

    let fetched = app
        .server
        .get(&item(v1::platforms::ITEM, id_of(&platform)))
        .await;
    fetched.assert_status_ok();
    assert_eq!(fetched.json::<Value>()["data"]["name"], "ps5");

    let duplicate = app
        .server
        .post(v1::platforms::COLLECTION)
        .json(&json!({ "name": "Ps5" }))
        .await;
    duplicate.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = duplicate.json();
    assert_eq!(body["message"], "Platform already exists: ps5");
    assert_eq!(body["path"], v1::platforms::COLLECTION);
    assert_eq!(body["method"], "POST");
    assert_eq!(body["status"], 400);
    assert!(body["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn game_is_created_with_its_relations() -> Result<()> {
    let app = build_test_app()?;
    let server = &app.server;

    let developer = create(
        server,
        v1::developers::COLLECTION,
        json!({ "name": "Nintendo", "social_links": ["https://nintendo.com"] }),
    )
    .await?;
    let genre = create(server, v1::genres::COLLECTION, json!({ "name": "Action" })).await?;
    let platform = create(server, v1::platforms::COLLECTION, json!({ "name": "Switch" })).await?;

    let game = create(
        server,
        v1::games::COLLECTION,
        json!({
            "title": "Zelda",
            "release_date": "2017-03-03",
            "price": "59.99",
            "developer_id": id_of(&developer),
            "genre_ids": [id_of(&genre)],
            "platform_ids": [id_of(&platform)],
        }),
    )
    .await?;
    let game_id = id_of(&game);
    assert_eq!(game["kind"], "GAME");

    let fetched: Value = server.get(&item(v1::games::ITEM, game_id)).await.json();
    let data = &fetched["data"];
    assert_eq!(data["title"], "Zelda");
    assert_eq!(data["price"], "59.99");
    assert_eq!(data["developer"]["name"], "nintendo");
    assert_eq!(data["genres"][0]["name"], "action");
    assert_eq!(data["platforms"][0]["name"], "switch");
    assert_eq!(data["like_count"], 0);

    let media: Value = server.get(&item(v1::media::ITEM, game_id)).await.json();
    assert_eq!(media["data"]["kind"], "GAME");

    let as_movie = server.get(&item(v1::movies::ITEM, game_id)).await;
    as_movie.assert_status_not_found();
    assert_eq!(
        as_movie.json::<Value>()["message"],
        format!("Movie not found with id: {game_id}")
    );
    Ok(())
}

#[tokio::test]
async fn game_with_unknown_genre_is_rejected() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .post(v1::games::COLLECTION)
        .json(&json!({ "title": "Orphan", "price": 10, "genre_ids": [404] }))
        .await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["message"], "Genre not found with id: 404");
    Ok(())
}

#[tokio::test]
async fn price_must_fit_two_decimal_places() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .post(v1::games::COLLECTION)
        .json(&json!({ "title": "Tetris", "price": "19.999" }))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["field"], "price");
    assert_eq!(
        body["errors"][0]["message"],
        "Price must have at most 2 decimal places"
    );

    let game = create(
        &app.server,
        v1::games::COLLECTION,
        json!({ "title": "Tetris", "price": "20" }),
    )
    .await?;
    assert_eq!(game["price"], "20.00");
    Ok(())
}

#[tokio::test]
async fn missing_developer_renders_error_envelope() -> Result<()> {
    let app = build_test_app()?;

    let response = app.server.get(&item(v1::developers::ITEM, 99)).await;
    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["message"], "Developer not found with id: 99");
    assert_eq!(body["path"], "/api/v1/developer/99");
    assert_eq!(body["method"], "GET");
    assert_eq!(body["status"], 404);
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .post(v1::genres::COLLECTION)
        .content_type("application/json")
        .text("{\"name\": ")
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.starts_with("Malformed request body"), "{message}");
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_a_bad_request() -> Result<()> {
    let app = build_test_app()?;

    let response = app.server.get(&item(v1::games::ITEM, "abc")).await;
    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["status"], 400);
    Ok(())
}

#[tokio::test]
async fn missing_required_field_is_listed() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .post(v1::movies::COLLECTION)
        .json(&json!({ "title": "Heat" }))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["field"], "producer");
    assert_eq!(body["errors"][0]["message"], "producer is required");
    Ok(())
}

#[tokio::test]
async fn listing_is_paged() -> Result<()> {
    let app = build_test_app()?;
    for name in ["action", "puzzle", "racing"] {
        create(&app.server, v1::genres::COLLECTION, json!({ "name": name })).await?;
    }

    let first: Value = app
        .server
        .get(&with_query(v1::genres::COLLECTION, &[("size", "2")]))
        .await
        .json();
    assert_eq!(first["data"]["content"].as_array().map(Vec::len), Some(2));
    assert_eq!(first["data"]["total_elements"], 3);
    assert_eq!(first["data"]["total_pages"], 2);

    let second: Value = app
        .server
        .get(&with_query(
            v1::genres::COLLECTION,
            &[("page", "1"), ("size", "2")],
        ))
        .await
        .json();
    assert_eq!(second["data"]["content"].as_array().map(Vec::len), Some(1));
    assert_eq!(second["data"]["page"], 1);
    Ok(())
}

#[tokio::test]
async fn zero_page_size_is_rejected() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .get(&with_query(v1::genres::COLLECTION, &[("size", "0")]))
        .await;
    response.assert_status_bad_request();
    Ok(())
}

async fn seed_games(app: &support::TestApp) -> Result<()> {
    let server = &app.server;
    let action = create(server, v1::genres::COLLECTION, json!({ "name": "Action" })).await?;
    let puzzle = create(server, v1::genres::COLLECTION, json!({ "name": "Puzzle" })).await?;

    for (title, genre) in [
        ("Zelda", &action),
        ("Zelda Picross", &puzzle),
        ("Metroid", &action),
    ] {
        create(
            server,
            v1::games::COLLECTION,
            json!({ "title": title, "price": "19.99", "genre_ids": [id_of(genre)] }),
        )
        .await?;
    }
    Ok(())
}

#[tokio::test]
async fn game_search_combines_criteria() -> Result<()> {
    let app = build_test_app()?;
    seed_games(&app).await?;

    let body: Value = app
        .server
        .get(&with_query(
            v1::games::SEARCH,
            &[("genre", "Action"), ("title", "zel")],
        ))
        .await
        .json();
    let titles: Vec<&str> = body["data"]["content"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|game| game["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Zelda"]);
    Ok(())
}

#[tokio::test]
async fn unknown_search_key_is_ignored_unless_strict() -> Result<()> {
    let app = build_test_app()?;
    seed_games(&app).await?;

    let lenient: Value = app
        .server
        .get(&with_query(v1::games::SEARCH, &[("colour", "red")]))
        .await
        .json();
    assert_eq!(lenient["data"]["total_elements"], 3);

    let mut config = Config::in_memory();
    config.filters.strict_keys = true;
    let strict = build_test_app_with(config)?;
    let response = strict
        .server
        .get(&with_query(v1::games::SEARCH, &[("colour", "red")]))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["message"], "Unknown search key: colour");
    Ok(())
}

#[tokio::test]
async fn crew_roles_are_assigned_and_removed() -> Result<()> {
    let app = build_test_app()?;
    let server = &app.server;

    let movie = create(
        server,
        v1::movies::COLLECTION,
        json!({ "title": "Heat", "producer": "Art Linson", "actors": ["Al Pacino"] }),
    )
    .await?;
    let movie_id = id_of(&movie);
    let crew = create(
        server,
        v1::crew::COLLECTION,
        json!({ "name": "Robert De Niro", "birth_date": "1943-08-17" }),
    )
    .await?;
    let crew_id = id_of(&crew);
    let crew_route = item(v1::movies::CREW, movie_id);

    let missing_character = server
        .post(&crew_route)
        .json(&json!({ "crew_id": crew_id, "role": "ACTOR" }))
        .await;
    missing_character.assert_status_bad_request();
    assert_eq!(
        missing_character.json::<Value>()["errors"][0]["message"],
        "Actors must have a character name"
    );

    let role = create(
        server,
        &crew_route,
        json!({ "crew_id": crew_id, "role": "ACTOR", "character_name": "Neil McCauley" }),
    )
    .await?;
    assert_eq!(role["crew_name"], "Robert De Niro");
    assert_eq!(role["role"], "ACTOR");

    let movie: Value = server.get(&item(v1::movies::ITEM, movie_id)).await.json();
    assert_eq!(movie["data"]["crew"][0]["character_name"], "Neil McCauley");

    let search: Value = server
        .get(&with_query(
            v1::movies::SEARCH,
            &[("crewId", &crew_id.to_string())],
        ))
        .await
        .json();
    assert_eq!(search["data"]["total_elements"], 1);

    let role_route = critica_core::api::routes::utils::replace_params(
        v1::movies::CREW_ITEM,
        &[("{id}", movie_id.to_string()), ("{crew_id}", crew_id.to_string())],
    );
    server.delete(&role_route).await.assert_status(StatusCode::NO_CONTENT);
    server.delete(&role_route).await.assert_status_not_found();
    Ok(())
}

#[tokio::test]
async fn unknown_route_and_method_use_the_envelope() -> Result<()> {
    let app = build_test_app()?;

    let missing = app.server.get("/api/v1/nothing-here").await;
    missing.assert_status_not_found();
    let body: Value = missing.json();
    assert_eq!(body["path"], "/api/v1/nothing-here");
    assert_eq!(body["status"], 404);

    let wrong_method = app.server.put(v1::developers::COLLECTION).await;
    wrong_method.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = wrong_method.json();
    assert_eq!(body["method"], "PUT");
    assert_eq!(body["status"], 405);
    Ok(())
}
