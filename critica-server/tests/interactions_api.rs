#[path = "support/mod.rs"]
mod support;

use anyhow::Result;
use axum::http::StatusCode;
use critica_core::api::routes::{utils::with_query, v1};
use serde_json::{Value, json};

use support::{TestApp, build_test_app, create, id_of, item};

struct Seeded {
    user_id: i64,
    game_id: i64,
    genre_id: i64,
    developer_id: i64,
}

async fn seed(app: &TestApp) -> Result<Seeded> {
    let server = &app.server;
    let user = create(
        server,
        v1::users::COLLECTION,
        json!({ "username": "ana_r", "email": "ana@example.com" }),
    )
    .await?;
    let developer = create(server, v1::developers::COLLECTION, json!({ "name": "FromSoftware" })).await?;
    let genre = create(server, v1::genres::COLLECTION, json!({ "name": "Souls" })).await?;
    let game = create(
        server,
        v1::games::COLLECTION,
        json!({
            "title": "Elden Ring",
            "price": "49.99",
            "developer_id": id_of(&developer),
            "genre_ids": [id_of(&genre)],
        }),
    )
    .await?;

    Ok(Seeded {
        user_id: id_of(&user),
        game_id: id_of(&game),
        genre_id: id_of(&genre),
        developer_id: id_of(&developer),
    })
}

#[tokio::test]
async fn user_may_like_media_once() -> Result<()> {
    let app = build_test_app()?;
    let seeded = seed(&app).await?;
    let body = json!({ "user_id": seeded.user_id, "media_id": seeded.game_id });

    let like = create(&app.server, v1::likes::COLLECTION, body.clone()).await?;
    assert_eq!(like["user"]["username"], "ana_r");
    assert_eq!(like["media"]["title"], "Elden Ring");
    assert_eq!(like["media"]["kind"], "GAME");

    let duplicate = app.server.post(v1::likes::COLLECTION).json(&body).await;
    duplicate.assert_status_bad_request();
    assert_eq!(
        duplicate.json::<Value>()["message"],
        format!(
            "User {} already liked media {}",
            seeded.user_id, seeded.game_id
        )
    );

    let game: Value = app.server.get(&item(v1::games::ITEM, seeded.game_id)).await.json();
    assert_eq!(game["data"]["like_count"], 1);

    app.server
        .delete(&item(v1::likes::ITEM, id_of(&like)))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    create(&app.server, v1::likes::COLLECTION, body).await?;
    Ok(())
}

#[tokio::test]
async fn like_for_unknown_media_is_not_found() -> Result<()> {
    let app = build_test_app()?;
    let seeded = seed(&app).await?;

    let response = app
        .server
        .post(v1::likes::COLLECTION)
        .json(&json!({ "user_id": seeded.user_id, "media_id": 777 }))
        .await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["message"], "Media not found with id: 777");
    Ok(())
}

#[tokio::test]
async fn review_violations_are_reported_together() -> Result<()> {
    let app = build_test_app()?;
    let seeded = seed(&app).await?;

    let response = app
        .server
        .post(v1::reviews::COLLECTION)
        .json(&json!({
            "user_id": seeded.user_id,
            "media_id": seeded.game_id,
            "score": 11,
            "text": "x".repeat(1025),
        }))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    let messages: Vec<&str> = body["errors"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|error| error["message"].as_str())
        .collect();
    assert_eq!(
        messages,
        vec![
            "Score must be between 1 and 10",
            "text must be at most 1024 characters",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn review_replace_and_patch() -> Result<()> {
    let app = build_test_app()?;
    let seeded = seed(&app).await?;
    let server = &app.server;

    let review = create(
        server,
        v1::reviews::COLLECTION,
        json!({
            "user_id": seeded.user_id,
            "media_id": seeded.game_id,
            "score": 7,
            "text": "Hard but fair",
        }),
    )
    .await?;
    let route = item(v1::reviews::ITEM, id_of(&review));

    let second = server
        .post(v1::reviews::COLLECTION)
        .json(&json!({
            "user_id": seeded.user_id,
            "media_id": seeded.game_id,
            "score": 3,
            "text": "Changed my mind",
        }))
        .await;
    second.assert_status_bad_request();

    let incomplete = server.put(&route).json(&json!({ "score": 9 })).await;
    incomplete.assert_status_bad_request();
    assert_eq!(
        incomplete.json::<Value>()["errors"][0]["message"],
        "text is required"
    );

    let replaced: Value = server
        .put(&route)
        .json(&json!({ "score": 9, "text": "A masterpiece" }))
        .await
        .json();
    assert_eq!(replaced["data"]["score"], 9);
    assert_eq!(replaced["data"]["text"], "A masterpiece");

    let patched: Value = server
        .patch(&route)
        .json(&json!({ "score": 8 }))
        .await
        .json();
    assert_eq!(patched["data"]["score"], 8);
    assert_eq!(patched["data"]["text"], "A masterpiece");

    let by_user: Value = server
        .get(&with_query(
            v1::reviews::SEARCH,
            &[("userId", &seeded.user_id.to_string())],
        ))
        .await
        .json();
    assert_eq!(by_user["data"]["total_elements"], 1);

    server
        .patch(&item(v1::reviews::ITEM, 4040))
        .json(&json!({ "score": 5 }))
        .await
        .assert_status_not_found();
    Ok(())
}

#[tokio::test]
async fn deleting_media_takes_interactions_with_it() -> Result<()> {
    let app = build_test_app()?;
    let seeded = seed(&app).await?;
    let server = &app.server;

    let like = create(
        server,
        v1::likes::COLLECTION,
        json!({ "user_id": seeded.user_id, "media_id": seeded.game_id }),
    )
    .await?;
    let review = create(
        server,
        v1::reviews::COLLECTION,
        json!({
            "user_id": seeded.user_id,
            "media_id": seeded.game_id,
            "score": 6,
            "text": "Fine",
        }),
    )
    .await?;

    let by_media: Value = server
        .get(&item(v1::likes::BY_MEDIA, seeded.game_id))
        .await
        .json();
    assert_eq!(by_media["data"]["total_elements"], 1);

    server
        .delete(&item(v1::games::ITEM, seeded.game_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let likes_after = server.get(&item(v1::likes::BY_MEDIA, seeded.game_id)).await;
    likes_after.assert_status_ok();
    let likes_after: Value = likes_after.json();
    assert_eq!(likes_after["data"]["content"], json!([]));
    assert_eq!(likes_after["data"]["total_elements"], 0);

    let reviews_after = server
        .get(&with_query(
            v1::reviews::SEARCH,
            &[("mediaId", &seeded.game_id.to_string())],
        ))
        .await;
    reviews_after.assert_status_ok();
    let reviews_after: Value = reviews_after.json();
    assert_eq!(reviews_after["data"]["content"], json!([]));
    assert_eq!(reviews_after["data"]["total_elements"], 0);
    server
        .get(&item(v1::likes::ITEM, id_of(&like)))
        .await
        .assert_status_not_found();
    server
        .get(&item(v1::reviews::ITEM, id_of(&review)))
        .await
        .assert_status_not_found();

    server
        .get(&item(v1::developers::ITEM, seeded.developer_id))
        .await
        .assert_status_ok();
    server
        .get(&item(v1::genres::ITEM, seeded.genre_id))
        .await
        .assert_status_ok();

    let by_user: Value = server
        .get(&item(v1::likes::BY_USER, seeded.user_id))
        .await
        .json();
    assert_eq!(by_user["data"]["total_elements"], 0);
    Ok(())
}

#[tokio::test]
async fn deactivated_user_is_hidden_from_listing() -> Result<()> {
    let app = build_test_app()?;
    let seeded = seed(&app).await?;
    let server = &app.server;

    server
        .delete(&item(v1::users::ITEM, seeded.user_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let active: Value = server.get(v1::users::COLLECTION).await.json();
    assert_eq!(active["data"]["total_elements"], 0);

    let all: Value = server
        .get(&with_query(v1::users::COLLECTION, &[("include_inactive", "true")]))
        .await
        .json();
    assert_eq!(all["data"]["total_elements"], 1);
    assert_eq!(all["data"]["content"][0]["is_active"], false);

    let user: Value = server.get(&item(v1::users::ITEM, seeded.user_id)).await.json();
    assert_eq!(user["data"]["is_active"], false);
    Ok(())
}

#[tokio::test]
async fn invalid_user_fields_are_rejected() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .post(v1::users::COLLECTION)
        .json(&json!({ "username": "a b", "email": "nope" }))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn non_numeric_identity_search_key_is_rejected() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .get(&with_query(v1::reviews::SEARCH, &[("userId", "abc")]))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["field"], "userId");
    Ok(())
}
