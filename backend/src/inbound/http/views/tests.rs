//! Tests for the grid, profile and pricing views.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockAccountQuery, MockProfileQuery, UserRepository};
use crate::domain::{Credits, Login};
use crate::inbound::http::test_utils::{
    CookieJar, get, location, memory_state, post_form, sign_up, test_app,
};
use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::Value;

#[rstest]
#[actix_web::test]
async fn anonymous_grid_lists_every_cell_free() {
    let (state, _store) = memory_state().await;
    let app = test::init_service(test_app(state)).await;
    let mut jar = CookieJar::new();

    let res = get(&app, &mut jar, "/").await;
    assert_eq!(res.status(), StatusCode::OK);
    let view: Value = test::read_body_json(res).await;
    assert_eq!(view["rows"], 10);
    assert_eq!(view["columns"], 10);
    let cells = view["cells"].as_array().expect("cells array");
    assert_eq!(cells.len(), 100);
    assert_eq!(cells[0]["id"], 1);
    assert_eq!(cells[99]["id"], 100);
    assert!(cells.iter().all(|cell| cell["occupied"] == false));
    assert!(view["currentUser"].is_null());
    assert!(view["balance"].is_null());
    assert!(view["newBuilding"].is_null());
}

#[rstest]
#[actix_web::test]
async fn grid_echoes_highlights() {
    let (state, _store) = memory_state().await;
    let app = test::init_service(test_app(state)).await;
    let mut jar = CookieJar::new();

    let res = get(&app, &mut jar, "/?removed_cell=42").await;
    let view: Value = test::read_body_json(res).await;
    assert_eq!(view["removedCell"], 42);
    assert!(view["newBuilding"].is_null());
}

#[rstest]
#[actix_web::test]
async fn grid_refreshes_balance_from_store() {
    let (state, store) = memory_state().await;
    let app = test::init_service(test_app(state)).await;
    let mut jar = CookieJar::new();
    sign_up(&app, &mut jar, "alice", "pw").await;

    let stored = store
        .find_credentials(&Login::new("alice").expect("valid login"))
        .await
        .expect("lookup")
        .expect("registered");
    store
        .credit(stored.user.id(), Credits::new(500))
        .await
        .expect("credit");

    let res = get(&app, &mut jar, "/").await;
    let view: Value = test::read_body_json(res).await;
    assert_eq!(view["currentUser"], "ALICE");
    assert_eq!(view["balance"], 1500);
}

#[rstest]
#[actix_web::test]
async fn anonymous_profile_redirects_to_sign_in() {
    let (state, _store) = memory_state().await;
    let app = test::init_service(test_app(state)).await;
    let mut jar = CookieJar::new();

    let res = get(&app, &mut jar, "/profile").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login");

    let res = get(&app, &mut jar, "/login").await;
    let view: Value = test::read_body_json(res).await;
    assert_eq!(view["flashes"][0]["level"], "error");
    assert_eq!(view["flashes"][0]["message"], SIGN_IN_FIRST);
}

#[rstest]
#[actix_web::test]
async fn profile_lists_held_cells_in_order() {
    let (state, _store) = memory_state().await;
    let app = test::init_service(test_app(state)).await;
    let mut jar = CookieJar::new();
    sign_up(&app, &mut jar, "alice", "pw").await;
    post_form(&app, &mut jar, "/cell/9/build/5", &[]).await;
    post_form(&app, &mut jar, "/cell/2/build/4", &[]).await;

    let res = get(&app, &mut jar, "/profile").await;
    assert_eq!(res.status(), StatusCode::OK);
    let view: Value = test::read_body_json(res).await;
    assert_eq!(view["name"], "ALICE");
    assert_eq!(view["login"], "alice");
    assert_eq!(view["balance"], 700);
    assert_eq!(view["cells"][0]["id"], 2);
    assert_eq!(view["cells"][0]["buildingLabel"], "Post office");
    assert_eq!(view["cells"][1]["id"], 9);
    assert_eq!(view["cells"][1]["buildingType"], 5);
    assert_eq!(view["flashes"].as_array().map(Vec::len), Some(2));
}

#[rstest]
#[actix_web::test]
async fn pricing_lists_every_building() {
    let (state, _store) = memory_state().await;
    let app = test::init_service(test_app(state)).await;
    let mut jar = CookieJar::new();

    let res = get(&app, &mut jar, "/pricing").await;
    assert_eq!(res.status(), StatusCode::OK);
    let view: Value = test::read_body_json(res).await;
    let prices: Vec<(i64, i64)> = view["buildings"]
        .as_array()
        .expect("buildings array")
        .iter()
        .map(|row| {
            (
                row["code"].as_i64().unwrap_or_default(),
                row["price"].as_i64().unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(prices, vec![(1, 100), (2, 150), (3, 200), (4, 120), (5, 180)]);
    assert_eq!(view["buildings"][0]["label"], "Shop");
    assert!(view["currentUser"].is_null());
}

#[rstest]
#[actix_web::test]
async fn grid_clears_session_of_missing_account() {
    let (mut state, _store) = memory_state().await;
    let mut accounts = MockAccountQuery::new();
    accounts.expect_find_user().returning(|_| Ok(None));
    state.account_query = Arc::new(accounts);
    let app = test::init_service(test_app(state)).await;
    let mut jar = CookieJar::new();
    post_form(
        &app,
        &mut jar,
        "/register",
        &[
            ("name", "Alice"),
            ("login", "alice"),
            ("password", "pw"),
            ("password_confirm", "pw"),
        ],
    )
    .await;
    post_form(
        &app,
        &mut jar,
        "/login",
        &[("login", "alice"), ("password", "pw")],
    )
    .await;

    let res = get(&app, &mut jar, "/").await;
    let view: Value = test::read_body_json(res).await;
    assert!(view["currentUser"].is_null());

    let res = get(&app, &mut jar, "/pricing").await;
    let view: Value = test::read_body_json(res).await;
    assert!(view["currentUser"].is_null(), "session was cleared");
}

#[rstest]
#[actix_web::test]
async fn profile_of_missing_account_signs_out() {
    let (mut state, _store) = memory_state().await;
    let mut profiles = MockProfileQuery::new();
    profiles.expect_profile().times(1).returning(|_| Ok(None));
    state.profiles = Arc::new(profiles);
    let app = test::init_service(test_app(state)).await;
    let mut jar = CookieJar::new();
    sign_up(&app, &mut jar, "alice", "pw").await;

    let res = get(&app, &mut jar, "/profile").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login");

    let res = get(&app, &mut jar, "/login").await;
    let view: Value = test::read_body_json(res).await;
    assert!(view["currentUser"].is_null());
    assert_eq!(view["flashes"][0]["message"], ACCOUNT_GONE);
}
