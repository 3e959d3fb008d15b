mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

use common::{
    body_json, create_test_member, create_user_without_profile, get, location, login_token, send,
    setup_test_app,
};
use shoky_access::{PROTECTED_ROUTES, visible_for_role};
use shoky_models::Role;

#[sqlx::test(migrations = "./migrations")]
async fn test_developer_allowed_and_denied_routes(pool: PgPool) {
    let member = create_test_member(&pool, Role::Developer).await;
    let app = setup_test_app(pool.clone());
    let token = login_token(&app, &member).await;

    let response = get(&app, "/tasks", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Task Management");
    assert_eq!(body["content"]["message"], "Coming soon...");

    let response = get(&app, "/users", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_gate_matches_route_table_for_every_role(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    for role in Role::ALL {
        let member = create_test_member(&pool, role).await;
        let token = login_token(&app, &member).await;

        for route in PROTECTED_ROUTES {
            let response = get(&app, route.path, Some(&token)).await;
            if route.guard.admits(role) {
                assert_eq!(response.status(), StatusCode::OK, "{role} {}", route.path);
            } else {
                assert_eq!(response.status(), StatusCode::SEE_OTHER, "{role} {}", route.path);
                assert_eq!(location(&response), "/dashboard");
            }
        }
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_dashboard_greets_by_role(pool: PgPool) {
    let member = create_test_member(&pool, Role::HrAdmin).await;
    let app = setup_test_app(pool.clone());
    let token = login_token(&app, &member).await;

    let response = get(&app, "/dashboard", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["badge"]["label"], "HR Admin");
    assert_eq!(body["content"]["greeting"]["title"], "HR Admin Dashboard");

    let active: Vec<_> = body["navigation"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|entry| entry["active"] == true)
        .map(|entry| entry["href"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(active, vec!["/dashboard"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_profile_is_sent_to_login(pool: PgPool) {
    let member = create_user_without_profile(&pool).await;
    let app = setup_test_app(pool.clone());
    let token = login_token(&app, &member).await;

    let response = get(&app, "/dashboard", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth");

    // The login page itself must not bounce a profile-less session back.
    let response = get(&app, "/auth", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, "/api/profiles/me", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_signed_in_member_skips_landing(pool: PgPool) {
    let member = create_test_member(&pool, Role::Developer).await;
    let app = setup_test_app(pool.clone());
    let token = login_token(&app, &member).await;

    for path in ["/", "/auth"] {
        let response = get(&app, path, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/dashboard");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_navigation_filtered_by_role(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    for role in Role::ALL {
        let member = create_test_member(&pool, role).await;
        let token = login_token(&app, &member).await;

        let response = get(&app, "/api/navigation?active=/assets", Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let hrefs: Vec<_> = body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["href"].as_str().unwrap().to_string())
            .collect();
        let expected: Vec<_> = visible_for_role(role).map(|item| item.href.to_string()).collect();

        assert_eq!(hrefs, expected, "{role}");
        assert_eq!(body["badge"]["role"], role.as_str());
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upgrade_to_super_admin(pool: PgPool) {
    let member = create_test_member(&pool, Role::Developer).await;
    let app = setup_test_app(pool.clone());
    let token = login_token(&app, &member).await;

    let response = get(&app, "/analytics", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = send(&app, "POST", "/api/profiles/me/upgrade", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["upgraded"], true);
    assert_eq!(body["profile"]["role"], "super_admin");

    // Same session, freshly resolved profile.
    let response = get(&app, "/analytics", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "POST", "/api/profiles/me/upgrade", Some(&token)).await;
    let body = body_json(response).await;
    assert_eq!(body["upgraded"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_my_profile(pool: PgPool) {
    let member = create_test_member(&pool, Role::SocialMediaAdmin).await;
    let app = setup_test_app(pool.clone());
    let token = login_token(&app, &member).await;

    let response = get(&app, "/api/profiles/me", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["email"], member.email);
    assert_eq!(body["role"], "social_media_admin");
    assert_eq!(body["status"], "active");
}
