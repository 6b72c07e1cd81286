#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use image::{ImageOutputFormat, RgbImage};
use std::io::Cursor;
use tempfile::TempDir;
use tower::ServiceExt;

use yatube::{
    config::Config,
    create_router,
    entities::{ent_post::PostFields, ent_user::NewUser, Group, Post, User},
    AppState,
};

pub const PASSWORD: &str = "correct-horse-battery";
const BOUNDARY: &str = "yatube-test-boundary";

pub struct TestApp {
    pub state: AppState,
    router: Router,
    _media: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let media = tempfile::tempdir().unwrap();
        let mut config = Config::in_memory(media.path());
        adjust(&mut config);
        let state = AppState::new(config).await.unwrap();
        let router = create_router(state.clone());
        Self {
            state,
            router,
            _media: media,
        }
    }

    pub fn client(&self) -> Client {
        Client {
            router: self.router.clone(),
            cookie: None,
        }
    }

    pub async fn create_user(&self, username: &str) -> User {
        User::create(
            &self.state.db,
            NewUser {
                username,
                password: PASSWORD,
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    /// A client whose session belongs to a freshly created user.
    pub async fn logged_in(&self, username: &str) -> (User, Client) {
        let user = self.create_user(username).await;
        let mut client = self.client();
        let response = client
            .post_form("/auth/login/", &[("username", username), ("password", PASSWORD)])
            .await;
        assert!(response.status.is_redirection(), "login failed: {}", response.body);
        (user, client)
    }

    pub async fn create_group(&self, title: &str, slug: &str) -> Group {
        Group::create(&self.state.db, title, slug, "").await.unwrap()
    }

    pub async fn create_post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        Post::create(
            &self.state.db,
            author.id,
            &PostFields {
                text: text.to_string(),
                group_id: group.map(|g| g.id),
                image: None,
            },
        )
        .await
        .unwrap()
    }
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn contains(&self, text: &str) -> bool {
        self.body.contains(text)
    }
}

/// A browser stand-in that keeps the session cookie between requests.
pub struct Client {
    router: Router,
    cookie: Option<String>,
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

impl Client {
    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap().to_string();
            self.cookie = Some(pair);
        }

        let status = response.status();
        let headers = response.headers().clone();
        let location = headers
            .get(header::LOCATION)
            .map(|l| l.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            location,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_multipart(&mut self, uri: &str, parts: &[Part<'_>]) -> TestResponse {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    file_name,
                    content_type,
                    data,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                            name, file_name, content_type
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        let request = Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }
}

pub fn png_bytes() -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(RgbImage::new(1, 1))
        .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
        .unwrap();
    buf
}

/// A photo-sized PNG: pseudo-random pixels keep it from compressing.
pub fn noisy_png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut seed: u32 = 0x9e37_79b9;
    let image = RgbImage::from_fn(width, height, |_, _| {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        let [r, g, b, _] = seed.to_le_bytes();
        image::Rgb([r, g, b])
    });
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
        .unwrap();
    buf
}
