//! Router-level tests: each one drives the full application through
//! `tower::ServiceExt::oneshot` against a fresh in-memory database.

use crate::auth;
use crate::context::{AppContext, AppState};
use crate::db;
use crate::models::{NewBlog, NewCategory, NewRecipe};
use crate::schema::{blogs, categories, recipes, saved_recipes, users};
use crate::storage::ImageStore;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use chrono::Utc;
use diesel::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

const BOUNDARY: &str = "test-multipart-boundary";
const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

async fn setup() -> (Router, AppState) {
    std::env::set_var("INSECURE_PASSWORD_HASHING", "1");

    let pool = db::create_test_pool();
    let images = ImageStore::new(
        std::env::temp_dir().join(format!("sufuria-api-test-{}", Uuid::new_v4())),
    );
    images.init().await.unwrap();

    let state: AppState = Arc::new(AppContext { pool, images });
    (crate::build_app(state.clone()), state)
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn form_request(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_request(path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn multipart_request(
    path: &str,
    token: &str,
    fields: &[(&str, &str)],
    image: Option<&[u8]>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(data) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; \
                 filename=\"upload.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn register_and_login(app: &Router, username: &str, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(form_request(
            "/register",
            &format!("username={username}&email={email}&password={password}"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(form_request(
            "/login",
            &format!("email={email}&password={password}"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    body_json(response).await["token"].as_str().unwrap().to_string()
}

async fn admin_token(app: &Router, state: &AppState) -> String {
    {
        let mut conn = state.pool.get().unwrap();
        auth::ensure_admin(&mut conn, "admin", "correct horse");
    }

    let response = app
        .clone()
        .oneshot(form_request(
            "/admin/login",
            "username=admin&password=correct+horse",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    body_json(response).await["token"].as_str().unwrap().to_string()
}

fn seed_category(state: &AppState, name: &str) -> i32 {
    let mut conn = state.pool.get().unwrap();
    diesel::insert_into(categories::table)
        .values(&NewCategory { name })
        .returning(categories::id)
        .get_result(&mut conn)
        .unwrap()
}

fn seed_recipe(state: &AppState, title: &str, ingredients: &str, category_id: i32) -> i32 {
    let mut conn = state.pool.get().unwrap();
    diesel::insert_into(recipes::table)
        .values(&NewRecipe {
            title,
            description: "A test recipe",
            ingredients,
            instructions: "Combine and cook.",
            cuisine: None,
            diet_type: None,
            prep_time: None,
            image: None,
            category_id,
        })
        .returning(recipes::id)
        .get_result(&mut conn)
        .unwrap()
}

fn seed_blog(state: &AppState, title: &str) -> i32 {
    let mut conn = state.pool.get().unwrap();
    diesel::insert_into(blogs::table)
        .values(&NewBlog {
            title,
            content: "Some content",
            author: "Admin",
            date_posted: Utc::now().naive_utc(),
            image: None,
            category: None,
        })
        .returning(blogs::id)
        .get_result(&mut conn)
        .unwrap()
}

#[tokio::test]
async fn duplicate_registration_is_rejected_and_creates_one_row() {
    let (app, state) = setup().await;

    let body = "username=alice&email=alice%40example.com&password=hunter2";
    let response = app.clone().oneshot(form_request("/register", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.clone().oneshot(form_request("/register", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["error"],
        "Username or email already exists"
    );

    let mut conn = state.pool.get().unwrap();
    let count: i64 = users::table.count().get_result(&mut conn).unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn login_establishes_identity_visible_to_check() {
    let (app, _state) = setup().await;
    let token = register_and_login(&app, "bob", "bob@example.com", "hunter2").await;

    let response = app
        .clone()
        .oneshot(get_request("/check", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["authenticated"], true);
    assert_eq!(json["role"], "user");
    assert_eq!(json["username"], "bob");

    // Anonymous requests still get a 200, just unauthenticated.
    let response = app.clone().oneshot(get_request("/check", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["authenticated"], false);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let (app, _state) = setup().await;
    register_and_login(&app, "carol", "carol@example.com", "hunter2").await;

    let response = app
        .clone()
        .oneshot(form_request(
            "/login",
            "email=carol%40example.com&password=wrong",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid email or password");
}

#[tokio::test]
async fn session_cookie_works_like_the_bearer_header() {
    let (app, _state) = setup().await;
    let token = register_and_login(&app, "dave", "dave@example.com", "hunter2").await;

    let request = Request::builder()
        .method("GET")
        .uri("/check")
        .header(header::COOKIE, format!("session={token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json["authenticated"], true);
    assert_eq!(json["username"], "dave");
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let (app, _state) = setup().await;
    let token = register_and_login(&app, "erin", "erin@example.com", "hunter2").await;

    let response = app
        .clone()
        .oneshot(get_request("/logout", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/check", Some(&token)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["authenticated"], false);
}

#[tokio::test]
async fn saving_a_recipe_twice_keeps_one_row() {
    let (app, state) = setup().await;
    let category_id = seed_category(&state, "Soups");
    let recipe_id = seed_recipe(&state, "Tomato Soup", "tomatoes, stock", category_id);
    let token = register_and_login(&app, "frank", "frank@example.com", "hunter2").await;

    let response = app
        .clone()
        .oneshot(post_request(&format!("/save_recipe/{recipe_id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Recipe saved successfully!"
    );

    let response = app
        .clone()
        .oneshot(post_request(&format!("/save_recipe/{recipe_id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "You already saved this recipe!"
    );

    let mut conn = state.pool.get().unwrap();
    let count: i64 = saved_recipes::table.count().get_result(&mut conn).unwrap();
    assert_eq!(count, 1);
    drop(conn);

    let response = app
        .clone()
        .oneshot(get_request("/saved_recipes", Some(&token)))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["title"], "Tomato Soup");
}

#[tokio::test]
async fn saving_an_unknown_recipe_is_a_404() {
    let (app, _state) = setup().await;
    let token = register_and_login(&app, "gina", "gina@example.com", "hunter2").await;

    let response = app
        .clone()
        .oneshot(post_request("/save_recipe/9999", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn saving_requires_a_user_session() {
    let (app, state) = setup().await;
    let category_id = seed_category(&state, "Soups");
    let recipe_id = seed_recipe(&state, "Tomato Soup", "tomatoes", category_id);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/save_recipe/{recipe_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Admins moderate content; they have no saved-recipes list.
    let token = admin_token(&app, &state).await;
    let response = app
        .clone()
        .oneshot(post_request(&format!("/save_recipe/{recipe_id}"), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn search_matches_title_and_ingredients_case_insensitively() {
    let (app, state) = setup().await;
    let category_id = seed_category(&state, "Mains");
    seed_recipe(&state, "Tomato Soup", "tomatoes, stock", category_id);
    seed_recipe(&state, "Chicken Curry", "chicken, spices", category_id);
    seed_recipe(&state, "Green Salad", "lettuce, TOMATO, cucumber", category_id);

    // No query returns everything.
    let response = app.clone().oneshot(get_request("/search_recipes", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 3);

    let response = app
        .clone()
        .oneshot(get_request("/search_recipes?q=ToMaTo", None))
        .await
        .unwrap();
    let json = body_json(response).await;
    let titles: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles.len(), 2);
    assert!(titles.contains(&"Tomato Soup"));
    assert!(titles.contains(&"Green Salad"));

    let response = app
        .clone()
        .oneshot(get_request("/search_recipes?q=nothing+matches+this", None))
        .await
        .unwrap();
    assert!(body_json(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn comment_moves_from_pending_to_replied_exactly_once() {
    let (app, state) = setup().await;

    let response = app
        .clone()
        .oneshot(form_request(
            "/submit_comment",
            "name=Visitor&email=visitor%40example.com&message=Loved+the+curry",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let token = admin_token(&app, &state).await;

    let response = app
        .clone()
        .oneshot(get_request("/admin/comments", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json[0]["status"], "Pending");
    let comment_id = json[0]["id"].as_i64().unwrap();

    let reply = |body: &str| {
        let mut request = form_request(&format!("/admin/reply_comment/{comment_id}"), body);
        request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        request
    };

    let response = app
        .clone()
        .oneshot(reply("reply=Thanks+for+reading!"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request("/admin/comments", Some(&token)))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json[0]["status"], "Replied");
    assert_eq!(json[0]["reply"], "Thanks for reading!");

    // The Pending -> Replied transition happens once.
    let response = app.clone().oneshot(reply("reply=Second+reply")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await["error"],
        "Comment has already been replied to"
    );
}

#[tokio::test]
async fn blank_comment_fields_are_rejected() {
    let (app, _state) = setup().await;

    let response = app
        .clone()
        .oneshot(form_request(
            "/submit_comment",
            "name=Visitor&email=visitor%40example.com&message=+",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleted_blog_post_is_gone() {
    let (app, state) = setup().await;
    let blog_id = seed_blog(&state, "Kitchen notes");
    let user = register_and_login(&app, "hana", "hana@example.com", "hunter2").await;
    let admin = admin_token(&app, &state).await;

    let response = app
        .clone()
        .oneshot(get_request(&format!("/blog/{blog_id}"), Some(&user)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_request(&format!("/admin/delete_blog/{blog_id}"), &admin))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/blog/{blog_id}"), Some(&user)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blog_detail_requires_a_session() {
    let (app, state) = setup().await;
    let blog_id = seed_blog(&state, "Kitchen notes");

    let response = app
        .clone()
        .oneshot(get_request(&format!("/blog/{blog_id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_anonymous_and_user_sessions() {
    let (app, state) = setup().await;
    let user = register_and_login(&app, "ivan", "ivan@example.com", "hunter2").await;

    let response = app
        .clone()
        .oneshot(get_request("/admin/dashboard", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get_request("/admin/dashboard", Some(&user)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = admin_token(&app, &state).await;
    let response = app
        .clone()
        .oneshot(get_request("/admin/dashboard", Some(&admin)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn category_flow_from_creation_to_listing() {
    let (app, state) = setup().await;
    let admin = admin_token(&app, &state).await;

    let mut request = form_request("/admin/add_category", "name=Dinner");
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {admin}").parse().unwrap(),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let category_id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/admin/add_recipe",
            &admin,
            &[
                ("title", "Shepherd's Pie"),
                ("description", "A hearty classic"),
                ("ingredients", "lamb, potatoes"),
                ("instructions", "Layer and bake."),
                ("category_id", &category_id.to_string()),
            ],
            Some(PNG_HEADER),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/category/{category_id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["category"]["name"], "Dinner");
    assert_eq!(json["recipes"].as_array().unwrap().len(), 1);
    assert_eq!(json["recipes"][0]["title"], "Shepherd's Pie");

    // The stored key is generated, never the client filename.
    let key = json["recipes"][0]["image"].as_str().unwrap();
    assert_ne!(key, "upload.png");
    assert!(key.ends_with(".png"));
    assert!(state.images.dir().join(key).exists());
}

#[tokio::test]
async fn unknown_category_is_a_404() {
    let (app, _state) = setup().await;
    let response = app.clone().oneshot(get_request("/category/9999", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recipe_creation_rejects_unknown_category_and_missing_fields() {
    let (app, state) = setup().await;
    let admin = admin_token(&app, &state).await;

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/admin/add_recipe",
            &admin,
            &[
                ("title", "Orphan"),
                ("description", "No category"),
                ("ingredients", "air"),
                ("instructions", "None."),
                ("category_id", "9999"),
            ],
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/admin/add_recipe",
            &admin,
            &[("title", "Incomplete")],
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recipe_edit_replaces_fields_and_keeps_the_image() {
    let (app, state) = setup().await;
    let admin = admin_token(&app, &state).await;
    let category_id = seed_category(&state, "Mains");

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/admin/add_recipe",
            &admin,
            &[
                ("title", "Ratatouille"),
                ("description", "Stewed vegetables"),
                ("ingredients", "aubergine, courgette"),
                ("instructions", "Stew."),
                ("cuisine", "French"),
                ("category_id", &category_id.to_string()),
            ],
            Some(PNG_HEADER),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let recipe_id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/recipe/{recipe_id}"), None))
        .await
        .unwrap();
    let before = body_json(response).await;
    assert_eq!(before["cuisine"], "French");
    let image_key = before["image"].as_str().unwrap().to_string();

    // Edit with cuisine omitted and no new file.
    let response = app
        .clone()
        .oneshot(multipart_request(
            &format!("/admin/edit_recipe/{recipe_id}"),
            &admin,
            &[
                ("title", "Ratatouille Confit"),
                ("description", "Stewed vegetables"),
                ("ingredients", "aubergine, courgette"),
                ("instructions", "Stew slowly."),
                ("category_id", &category_id.to_string()),
            ],
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/recipe/{recipe_id}"), None))
        .await
        .unwrap();
    let after = body_json(response).await;
    assert_eq!(after["title"], "Ratatouille Confit");
    // Omitted optional fields are cleared, not carried over.
    assert!(after["cuisine"].is_null());
    // The stored file is only replaced when a new upload arrives.
    assert_eq!(after["image"].as_str().unwrap(), image_key);
    assert!(state.images.dir().join(&image_key).exists());
}

#[tokio::test]
async fn blog_edit_keeps_author_and_date_posted() {
    let (app, state) = setup().await;
    let admin = admin_token(&app, &state).await;

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/admin/add_blog",
            &admin,
            &[
                ("title", "Knife care"),
                ("content", "Hone often."),
                ("category", "Tips"),
            ],
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let blog_id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/blog/{blog_id}"), Some(&admin)))
        .await
        .unwrap();
    let before = body_json(response).await;
    assert_eq!(before["category"], "Tips");

    let response = app
        .clone()
        .oneshot(multipart_request(
            &format!("/admin/edit_blog/{blog_id}"),
            &admin,
            &[
                ("title", "Knife care, revisited"),
                ("content", "Hone often, sharpen rarely."),
            ],
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/blog/{blog_id}"), Some(&admin)))
        .await
        .unwrap();
    let after = body_json(response).await;
    assert_eq!(after["title"], "Knife care, revisited");
    assert_eq!(after["author"], before["author"]);
    assert_eq!(after["date_posted"], before["date_posted"]);
    // Category is full-replacement like the rest of the form.
    assert!(after["category"].is_null());
}

#[tokio::test]
async fn recipe_delete_removes_row_and_detail() {
    let (app, state) = setup().await;
    let category_id = seed_category(&state, "Bakes");
    let recipe_id = seed_recipe(&state, "Banana Bread", "bananas, flour", category_id);
    let admin = admin_token(&app, &state).await;

    let response = app
        .clone()
        .oneshot(get_request(&format!("/recipe/{recipe_id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_request(&format!("/admin/delete_recipe/{recipe_id}"), &admin))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/recipe/{recipe_id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
