//! Integration tests for the authentication and authorization flow.

use http::StatusCode;

use crate::helpers::{self, TestApp, extract_cookie};

#[tokio::test]
async fn test_register_sets_both_cookies() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let username = helpers::unique("reguser");
    let response = app
        .request(
            "POST",
            "/user/register/",
            Some(serde_json::json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "password123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(extract_cookie(&response.set_cookies, "access_token").is_some());
    assert!(extract_cookie(&response.set_cookies, "refresh_token").is_some());
    assert_eq!(response.body["username"].as_str().unwrap(), username);
    // The password hash must never appear in a response.
    assert!(response.body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let (username, _) = app.register_user().await;
    let response = app
        .request(
            "POST",
            "/user/register/",
            Some(serde_json::json!({
                "username": username,
                "email": format!("{username}.other@example.com"),
                "password": "password123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let (username, _) = app.register_user().await;

    let wrong_password = app
        .request_form(
            "POST",
            "/user/login",
            &format!("username={username}&password=wrongpassword"),
            None,
        )
        .await;
    let unknown_user = app
        .request_form(
            "POST",
            "/user/login",
            "username=nobody-here&password=whatever",
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    // Identical bodies: no hint about which part was wrong.
    assert_eq!(wrong_password.body, unknown_user.body);
}

#[tokio::test]
async fn test_protected_route_without_credentials() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let response = app.request("GET", "/user/profile/", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_with_access_cookie() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let (username, password) = app.register_user().await;
    let cookies = app.login(&username, &password).await;

    let response = app
        .request("GET", "/user/profile/", None, Some(&cookies))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["user"]["username"].as_str().unwrap(),
        username
    );
}

#[tokio::test]
async fn test_silent_refresh_flow() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let (username, password) = app.register_user().await;
    let cookies = app.login(&username, &password).await;

    // Keep only the refresh cookie, simulating an expired/evicted
    // access cookie.
    let refresh_only = cookies
        .split("; ")
        .find(|c| c.starts_with("refresh_token="))
        .unwrap()
        .to_string();

    // Step 1: the protected route answers with one redirect hop to the
    // refresh endpoint, preserving the original target.
    let response = app
        .request("GET", "/user/profile/", None, Some(&refresh_only))
        .await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    let location = response.location.expect("redirect must carry Location");
    assert!(location.starts_with("/user/refresh/?redirect_url="));
    assert!(location.contains("profile"));

    // Step 2: the refresh endpoint mints a new access cookie and
    // redirects back to the original target.
    let response = app
        .request("GET", &location, None, Some(&refresh_only))
        .await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location.as_deref(), Some("/user/profile/"));
    let new_access =
        extract_cookie(&response.set_cookies, "access_token").expect("new access cookie");

    // Step 3: retrying the original request with the fresh access
    // cookie succeeds.
    let retry_cookies = format!("{new_access}; {refresh_only}");
    let response = app
        .request("GET", "/user/profile/", None, Some(&retry_cookies))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_refresh_token_is_terminal() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    // A garbage refresh token at the refresh endpoint must produce a
    // 401, never another redirect (no refresh loop).
    let response = app
        .request(
            "GET",
            "/user/refresh/?redirect_url=/user/profile/",
            None,
            Some("refresh_token=garbage"),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.location, None);
}

#[tokio::test]
async fn test_refresh_token_never_accepted_as_access_token() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let (username, password) = app.register_user().await;
    let cookies = app.login(&username, &password).await;

    let refresh_value = cookies
        .split("; ")
        .find(|c| c.starts_with("refresh_token="))
        .unwrap()
        .trim_start_matches("refresh_token=")
        .to_string();

    // Present the refresh token in the access slot, with no refresh
    // cookie: the type discriminant must cause a hard 401.
    let forged = format!("access_token={refresh_value}");
    let response = app
        .request("GET", "/user/profile/", None, Some(&forged))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookies() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let (username, password) = app.register_user().await;
    let cookies = app.login(&username, &password).await;

    let response = app
        .request("POST", "/user/logout/", None, Some(&cookies))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    // Both cookies come back emptied with Max-Age=0.
    let access = extract_cookie(&response.set_cookies, "access_token").unwrap();
    let refresh = extract_cookie(&response.set_cookies, "refresh_token").unwrap();
    assert_eq!(access, "access_token=");
    assert_eq!(refresh, "refresh_token=");
}

#[tokio::test]
async fn test_admin_prefix_is_gated() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    // No credentials: structured 401, no redirect.
    let response = app.request("GET", "/admin/users", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.location, None);

    // Plain user: 403.
    let (username, password) = app.register_user().await;
    let cookies = app.login(&username, &password).await;
    let response = app
        .request("GET", "/admin/users", None, Some(&cookies))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // Moderator and above pass the gate.
    let (mod_name, mod_password) = app.register_user().await;
    app.set_role(&mod_name, "moderator").await;
    let mod_cookies = app.login(&mod_name, &mod_password).await;
    let response = app
        .request("GET", "/admin/users", None, Some(&mod_cookies))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_user_deletion_requires_admin_and_password() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let (target, _) = app.register_user().await;
    let target_id = app.user_id(&target).await;

    // A plain user cannot delete accounts.
    let (plain, plain_password) = app.register_user().await;
    let plain_cookies = app.login(&plain, &plain_password).await;
    let response = app
        .request(
            "DELETE",
            "/user/delete/",
            Some(serde_json::json!({ "user_id": target_id, "password": plain_password })),
            Some(&plain_cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // An admin with a wrong password confirmation is refused.
    let (admin, admin_password) = app.register_user().await;
    app.set_role(&admin, "admin").await;
    let admin_cookies = app.login(&admin, &admin_password).await;
    let response = app
        .request(
            "DELETE",
            "/user/delete/",
            Some(serde_json::json!({ "user_id": target_id, "password": "not-my-password" })),
            Some(&admin_cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // With the right confirmation the account is gone.
    let response = app
        .request(
            "DELETE",
            "/user/delete/",
            Some(serde_json::json!({ "user_id": target_id, "password": admin_password })),
            Some(&admin_cookies),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request("GET", &format!("/user/get_user/{target}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
