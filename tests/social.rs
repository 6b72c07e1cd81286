mod common;

use axum::http::StatusCode;
use common::{Part, TestApp};
use yatube::{
    entities::{Comment, Entity, Follow},
    AppError,
};

#[tokio::test]
async fn follow_and_unfollow_change_follower_count() {
    let app = TestApp::new().await;
    let (_, mut client) = app.logged_in("StasBasov").await;
    let author = app.create_user("Stas").await;

    let followers = Follow::count_followers(&app.state.db, author.id).await.unwrap();
    let response = client.get("/Stas/follow/").await;
    assert_eq!(response.location.as_deref(), Some("/Stas/"));
    assert_eq!(Follow::count_followers(&app.state.db, author.id).await.unwrap(), followers + 1);

    // Following twice keeps a single edge.
    client.get("/Stas/follow/").await;
    assert_eq!(Follow::count_followers(&app.state.db, author.id).await.unwrap(), followers + 1);

    let profile = client.get("/Stas/").await;
    assert!(profile.contains("Followers: 1"));
    assert!(profile.contains("Unfollow"));

    client.get("/Stas/unfollow/").await;
    assert_eq!(Follow::count_followers(&app.state.db, author.id).await.unwrap(), followers);
}

#[tokio::test]
async fn following_yourself_does_nothing() {
    let app = TestApp::new().await;
    let (user, mut client) = app.logged_in("narcissus").await;

    let response = client.get("/narcissus/follow/").await;
    assert_eq!(response.location.as_deref(), Some("/narcissus/"));
    assert_eq!(Follow::count_followers(&app.state.db, user.id).await.unwrap(), 0);
    assert_eq!(Follow::count_all(&app.state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn following_unknown_user_is_not_found() {
    let app = TestApp::new().await;
    let (_, mut client) = app.logged_in("reader").await;
    assert_eq!(client.get("/ghost/follow/").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn feed_shows_only_followed_authors() {
    let app = TestApp::new().await;
    let (_, mut follower) = app.logged_in("StasBasov").await;
    let (_, mut author) = app.logged_in("Stas").await;

    follower.get("/Stas/follow/").await;
    author
        .post_multipart("/new/", &[Part::Text("text", "text for followers")])
        .await;
    follower
        .post_multipart("/new/", &[Part::Text("text", "text not for followers")])
        .await;

    let feed = follower.get("/follow/").await;
    assert_eq!(feed.status, StatusCode::OK);
    assert!(feed.contains("text for followers"));
    assert!(!feed.contains("text not for followers"));

    let other_feed = author.get("/follow/").await;
    assert!(!other_feed.contains("text not for followers"));
}

#[tokio::test]
async fn comments_require_login() {
    let app = TestApp::new().await;
    let author = app.create_user("author").await;
    let post = app.create_post(&author, "text", None).await;
    let url = format!("/author/{}/comment/", post.id);

    let response = app.client().post_form(&url, &[("text", "text")]).await;
    assert!(response.status.is_redirection());
    assert_eq!(response.location.as_deref(), Some(AppError::login_url(&url).as_str()));
    assert_eq!(Comment::count_all(&app.state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn comment_appears_with_flash_message() {
    let app = TestApp::new().await;
    let (user, mut client) = app.logged_in("author").await;
    let post = app.create_post(&user, "text", None).await;
    let detail = format!("/author/{}/", post.id);

    let response = client
        .post_form(&format!("{}comment/", detail), &[("text", "comment for post")])
        .await;
    assert_eq!(response.location.as_deref(), Some(detail.as_str()));

    let page = client.get(&detail).await;
    assert!(page.contains("comment for post"));
    assert!(page.contains("Comment added"));

    // The message is shown once.
    assert!(!client.get(&detail).await.contains("Comment added"));
}

#[tokio::test]
async fn blank_comment_is_dropped() {
    let app = TestApp::new().await;
    let (user, mut client) = app.logged_in("author").await;
    let post = app.create_post(&user, "text", None).await;

    client
        .post_form(&format!("/author/{}/comment/", post.id), &[("text", "  ")])
        .await;
    assert_eq!(Comment::count_all(&app.state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn comment_owner_can_edit_and_delete() {
    let app = TestApp::new().await;
    let author = app.create_user("author").await;
    let post = app.create_post(&author, "text", None).await;
    let (commenter, mut client) = app.logged_in("commenter").await;
    let comment = Comment::create(&app.state.db, post.id, commenter.id, "first draft")
        .await
        .unwrap();
    let base = format!("/author/{}/comment/{}/", post.id, comment.id);
    let detail = format!("/author/{}/", post.id);

    let form = client.get(&format!("{}edit/", base)).await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.contains("first draft"));

    let edited = client
        .post_form(&format!("{}edit/", base), &[("text", "second draft")])
        .await;
    assert_eq!(edited.location.as_deref(), Some(detail.as_str()));
    assert_eq!(
        Comment::gen_enforce(&app.state.db, comment.id).await.unwrap().text,
        "second draft"
    );
    assert!(client.get(&detail).await.contains("Comment updated"));

    let deleted = client.get(&format!("{}delete/", base)).await;
    assert_eq!(deleted.location.as_deref(), Some(detail.as_str()));
    assert!(Comment::gen_nullable(&app.state.db, comment.id).await.unwrap().is_none());
    assert!(client.get(&detail).await.contains("Comment deleted"));
}

#[tokio::test]
async fn others_cannot_touch_a_comment() {
    let app = TestApp::new().await;
    let author = app.create_user("author").await;
    let post = app.create_post(&author, "text", None).await;
    let comment = Comment::create(&app.state.db, post.id, author.id, "mine")
        .await
        .unwrap();
    let (_, mut intruder) = app.logged_in("intruder").await;
    let base = format!("/author/{}/comment/{}/", post.id, comment.id);

    intruder
        .post_form(&format!("{}edit/", base), &[("text", "yours now")])
        .await;
    intruder.post_form(&format!("{}delete/", base), &[]).await;

    let stored = Comment::gen_enforce(&app.state.db, comment.id).await.unwrap();
    assert_eq!(stored.text, "mine");
}
