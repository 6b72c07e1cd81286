mod common;

use axum::http::{header, StatusCode};
use common::{TestApp, PASSWORD};
use yatube::entities::User;

#[tokio::test]
async fn signup_then_login_and_logout() {
    let app = TestApp::new().await;
    let mut client = app.client();

    assert_eq!(client.get("/auth/signup/").await.status, StatusCode::OK);

    let signup = client
        .post_form(
            "/auth/signup/",
            &[
                ("first_name", "Leo"),
                ("last_name", "Tolstoy"),
                ("username", "leo"),
                ("email", "leo@example.com"),
                ("password1", PASSWORD),
                ("password2", PASSWORD),
            ],
        )
        .await;
    assert_eq!(signup.location.as_deref(), Some("/auth/login/"));
    let user = User::gen_by_username(&app.state.db, "leo").await.unwrap().unwrap();
    assert_eq!(user.full_name(), "Leo Tolstoy");

    let login = client
        .post_form(
            "/auth/login/",
            &[("username", "leo"), ("password", PASSWORD), ("next", "/new/")],
        )
        .await;
    assert_eq!(login.location.as_deref(), Some("/new/"));
    assert_eq!(client.get("/new/").await.status, StatusCode::OK);

    let logout = client.get("/auth/logout/").await;
    assert_eq!(logout.status, StatusCode::OK);
    assert!(client.get("/new/").await.status.is_redirection());
}

#[tokio::test]
async fn signup_rejects_taken_username() {
    let app = TestApp::new().await;
    app.create_user("leo").await;

    let response = app
        .client()
        .post_form(
            "/auth/signup/",
            &[("username", "leo"), ("password1", PASSWORD), ("password2", PASSWORD)],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.contains("A user with that username already exists."));
}

#[tokio::test]
async fn login_rejects_bad_password_and_foreign_next() {
    let app = TestApp::new().await;
    app.create_user("leo").await;
    let mut client = app.client();

    let wrong = client
        .post_form("/auth/login/", &[("username", "leo"), ("password", "nope")])
        .await;
    assert_eq!(wrong.status, StatusCode::OK);
    assert!(wrong.contains("Please enter a correct username and password."));

    let login = client
        .post_form(
            "/auth/login/",
            &[("username", "leo"), ("password", PASSWORD), ("next", "//evil.example/")],
        )
        .await;
    assert_eq!(login.location.as_deref(), Some("/"));
}

#[tokio::test]
async fn flat_pages_are_served() {
    let app = TestApp::new().await;
    let mut client = app.client();

    for (url, title) in [
        ("/about-us/", "About us"),
        ("/terms/", "Terms"),
        ("/about-author/", "About the author"),
        ("/about-spec/", "Technologies"),
        ("/about/about-us/", "About us"),
    ] {
        let page = client.get(url).await;
        assert_eq!(page.status, StatusCode::OK, "{}", url);
        assert!(page.contains(title), "{}", url);
    }

    assert_eq!(client.get("/about/missing/").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_pages_render_custom_404() {
    let app = TestApp::new().await;
    let mut client = app.client();

    for url in ["/no-such-user/", "/group/no-such-group/", "/deeply/nested/unknown/route/"] {
        let page = client.get(url).await;
        assert_eq!(page.status, StatusCode::NOT_FOUND, "{}", url);
        assert!(page.contains("Page not found"), "{}", url);
        assert_eq!(
            page.headers.get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
    }

    assert!(client.get("/no-such-user/").await.contains("no-such-user"));
}

#[tokio::test]
async fn failed_viewer_lookup_renders_the_500_page() {
    let app = TestApp::new().await;
    let (_, mut client) = app.logged_in("leo").await;

    // Resolving the session user now fails before any handler runs.
    app.state.db.close().await;
    let page = client.get("/").await;

    assert_eq!(page.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(page.contains("Something went wrong"));
    assert_eq!(
        page.headers.get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let app = TestApp::new().await;
    let page = app.client().get("/").await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
    assert_eq!(page.headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
}
