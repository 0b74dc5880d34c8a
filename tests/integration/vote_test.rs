//! Integration tests for the vote ledger.
//!
//! The principal property: after any sequence of cast/remove calls,
//! `posts.rating` equals the sum of active vote values.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_rating_tracks_vote_sum() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let (author, author_password) = app.register_user().await;
    let author_cookies = app.login(&author, &author_password).await;
    let post_id = app.create_public_post(&author_cookies).await;

    // Three users vote +1, +1, -1.
    let mut sessions = Vec::new();
    for value in [1, 1, -1] {
        let (username, password) = app.register_user().await;
        let cookies = app.login(&username, &password).await;

        let response = app
            .request(
                "POST",
                "/posts/rate/",
                Some(json!({ "post_id": post_id, "value": value })),
                Some(&cookies),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        app.assert_rating_invariant(post_id).await;

        sessions.push(cookies);
    }

    assert_eq!(app.post_rating(post_id).await, 1);

    // One upvoter withdraws; the rating and the ledger move together.
    let response = app
        .request(
            "DELETE",
            "/posts/delete_post_rating/",
            Some(json!({ "post_id": post_id })),
            Some(&sessions[0]),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["rating"].as_i64().unwrap(), 0);
    app.assert_rating_invariant(post_id).await;
}

#[tokio::test]
async fn test_double_vote_rejected_rating_changes_once() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let (author, author_password) = app.register_user().await;
    let author_cookies = app.login(&author, &author_password).await;
    let post_id = app.create_public_post(&author_cookies).await;

    let (voter, voter_password) = app.register_user().await;
    let cookies = app.login(&voter, &voter_password).await;

    let response = app
        .request(
            "POST",
            "/posts/rate/",
            Some(json!({ "post_id": post_id, "value": 1 })),
            Some(&cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["rating"].as_i64().unwrap(), 1);

    // Voting again, even with the opposite value, must fail: changing
    // a vote requires an explicit removal first.
    let response = app
        .request(
            "POST",
            "/posts/rate/",
            Some(json!({ "post_id": post_id, "value": -1 })),
            Some(&cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"].as_str().unwrap(), "ALREADY_VOTED");

    // The rating reflects only the first vote.
    assert_eq!(app.post_rating(post_id).await, 1);
    app.assert_rating_invariant(post_id).await;
}

#[tokio::test]
async fn test_remove_without_vote_rejected() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let (author, author_password) = app.register_user().await;
    let author_cookies = app.login(&author, &author_password).await;
    let post_id = app.create_public_post(&author_cookies).await;

    let (voter, voter_password) = app.register_user().await;
    let cookies = app.login(&voter, &voter_password).await;

    let response = app
        .request(
            "DELETE",
            "/posts/delete_post_rating/",
            Some(json!({ "post_id": post_id })),
            Some(&cookies),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"].as_str().unwrap(),
        "NO_EXISTING_VOTE"
    );
    assert_eq!(app.post_rating(post_id).await, 0);
    app.assert_rating_invariant(post_id).await;
}

#[tokio::test]
async fn test_vote_change_via_remove_then_recast() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let (author, author_password) = app.register_user().await;
    let author_cookies = app.login(&author, &author_password).await;
    let post_id = app.create_public_post(&author_cookies).await;

    let (voter, voter_password) = app.register_user().await;
    let cookies = app.login(&voter, &voter_password).await;

    let response = app
        .request(
            "POST",
            "/posts/rate/",
            Some(json!({ "post_id": post_id, "value": 1 })),
            Some(&cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "DELETE",
            "/posts/delete_post_rating/",
            Some(json!({ "post_id": post_id })),
            Some(&cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["rating"].as_i64().unwrap(), 0);

    let response = app
        .request(
            "POST",
            "/posts/rate/",
            Some(json!({ "post_id": post_id, "value": -1 })),
            Some(&cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["rating"].as_i64().unwrap(), -1);

    app.assert_rating_invariant(post_id).await;
}

#[tokio::test]
async fn test_vote_on_missing_post() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let (voter, voter_password) = app.register_user().await;
    let cookies = app.login(&voter, &voter_password).await;

    let response = app
        .request(
            "POST",
            "/posts/rate/",
            Some(json!({
                "post_id": "00000000-0000-0000-0000-000000000000",
                "value": 1,
            })),
            Some(&cookies),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_vote_value_rejected() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let (author, author_password) = app.register_user().await;
    let author_cookies = app.login(&author, &author_password).await;
    let post_id = app.create_public_post(&author_cookies).await;

    let response = app
        .request(
            "POST",
            "/posts/rate/",
            Some(json!({ "post_id": post_id, "value": 5 })),
            Some(&author_cookies),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.post_rating(post_id).await, 0);
}

#[tokio::test]
async fn test_voting_requires_authentication() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let (author, author_password) = app.register_user().await;
    let author_cookies = app.login(&author, &author_password).await;
    let post_id = app.create_public_post(&author_cookies).await;

    let response = app
        .request(
            "POST",
            "/posts/rate/",
            Some(json!({ "post_id": post_id, "value": 1 })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
