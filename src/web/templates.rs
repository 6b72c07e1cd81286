//! Askama templates for the yatube pages

use askama::Template;
use axum::response::Html;
use tower_sessions::Session;

use crate::entities::{Comment, FlatPage, Group, Post, User};
use crate::error::AppResult;
use crate::forms::{CommentForm, GroupChoice, LoginForm, PostForm, SignupForm};
use crate::framework::{flash, Flash, Page};
use crate::infrastructure::ViewerContext;

/// Per-request data every page extends `base.html` with.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub is_authenticated: bool,
    pub user_id: Option<i64>,
    pub username: String,
    pub messages: Vec<Flash>,
}

impl PageContext {
    pub fn from_viewer(vc: &ViewerContext) -> Self {
        Self {
            is_authenticated: vc.is_authenticated(),
            user_id: vc.user_id(),
            username: vc.username().unwrap_or_default().to_string(),
            messages: Vec::new(),
        }
    }

    /// Viewer context plus any flash messages waiting in the session.
    pub async fn load(vc: &ViewerContext, session: &Session) -> AppResult<Self> {
        let mut ctx = Self::from_viewer(vc);
        ctx.messages = flash::take(session).await?;
        Ok(ctx)
    }

    pub fn is_viewer(&self, user_id: &i64) -> bool {
        self.user_id == Some(*user_id)
    }

    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }
}

/// Search box state shared by the listing pages.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    /// Appended to paginator links, already url-encoded.
    pub link_suffix: String,
}

impl SearchState {
    pub fn new(search: Option<&str>) -> Self {
        let query = search.map(str::trim).unwrap_or_default().to_string();
        let link_suffix = if query.is_empty() {
            String::new()
        } else {
            format!("&search={}", urlencoding::encode(&query))
        };
        Self { query, link_suffix }
    }

    pub fn as_option(&self) -> Option<&str> {
        Some(self.query.as_str()).filter(|q| !q.is_empty())
    }
}

/// Author header shown on the profile and post pages.
#[derive(Debug, Clone)]
pub struct AuthorCard {
    pub user: User,
    pub post_count: i64,
    pub followers: i64,
    pub following_count: i64,
    /// The viewer follows this author.
    pub following: bool,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub ctx: PageContext,
    pub page: Page<Post>,
    pub search: SearchState,
}

#[derive(Template)]
#[template(path = "follow.html")]
pub struct FollowTemplate {
    pub ctx: PageContext,
    pub page: Page<Post>,
    pub search: SearchState,
}

#[derive(Template)]
#[template(path = "group.html")]
pub struct GroupTemplate {
    pub ctx: PageContext,
    pub group: Group,
    pub page: Page<Post>,
    pub search: SearchState,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub ctx: PageContext,
    pub author: AuthorCard,
    pub page: Page<Post>,
    pub search: SearchState,
}

/// Post detail. Doubles as the comment edit page when `editing` is set.
#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub ctx: PageContext,
    pub author: AuthorCard,
    pub post: Post,
    pub comments: Vec<Comment>,
    pub form: CommentForm,
    pub editing: bool,
    pub form_action: String,
}

#[derive(Template)]
#[template(path = "new_post.html")]
pub struct PostFormTemplate {
    pub ctx: PageContext,
    pub form: PostForm,
    pub groups: Vec<GroupChoice>,
    pub editing: bool,
    pub form_action: String,
    /// Image already attached to the post being edited.
    pub current_image: String,
}

#[derive(Template)]
#[template(path = "post_delete.html")]
pub struct PostDeleteTemplate {
    pub ctx: PageContext,
    pub post: Post,
}

#[derive(Template)]
#[template(path = "flatpage.html")]
pub struct FlatPageTemplate {
    pub ctx: PageContext,
    pub page: FlatPage,
}

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
    pub form: LoginForm,
    pub next: String,
}

#[derive(Template)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub ctx: PageContext,
    pub form: SignupForm,
}

#[derive(Template)]
#[template(path = "auth/logged_out.html")]
pub struct LoggedOutTemplate {
    pub ctx: PageContext,
}

#[derive(Template)]
#[template(path = "misc/404.html")]
pub struct NotFoundTemplate {
    pub ctx: PageContext,
    pub path: String,
}

#[derive(Template)]
#[template(path = "misc/500.html")]
pub struct ServerErrorTemplate {
    pub ctx: PageContext,
}

pub fn render<T: Template>(template: &T) -> AppResult<Html<String>> {
    Ok(Html(template.render()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::Paginator;
    use chrono::Utc;

    fn post_by(author_id: i64) -> Post {
        Post {
            id: 5,
            text: "Morning notes".to_string(),
            pub_date: Utc::now(),
            author_id,
            author_username: "leo".to_string(),
            group_id: None,
            group_slug: None,
            group_title: None,
            image: None,
            comment_count: 0,
        }
    }

    fn index_for(ctx: PageContext) -> String {
        IndexTemplate {
            ctx,
            page: Page::new(vec![post_by(3)], 1, &Paginator::new(1, 10)),
            search: SearchState::default(),
        }
        .render()
        .unwrap()
    }

    #[test]
    fn test_edit_links_only_for_author() {
        let author = PageContext {
            is_authenticated: true,
            user_id: Some(3),
            username: "leo".to_string(),
            messages: Vec::new(),
        };
        assert!(author.is_viewer(&3));
        assert!(index_for(author).contains("/5/edit/"));

        let other = PageContext {
            is_authenticated: true,
            user_id: Some(4),
            username: "mia".to_string(),
            messages: Vec::new(),
        };
        assert!(!index_for(other).contains("/5/edit/"));
        assert!(!index_for(PageContext::default()).contains("/5/edit/"));
    }

    #[test]
    fn test_search_state_suffix() {
        let empty = SearchState::new(Some("   "));
        assert_eq!(empty.as_option(), None);
        assert_eq!(empty.link_suffix, "");

        let search = SearchState::new(Some("war & peace"));
        assert_eq!(search.as_option(), Some("war & peace"));
        assert_eq!(search.link_suffix, "&search=war%20%26%20peace");
    }

    #[test]
    fn test_not_found_page_shows_path() {
        let html = NotFoundTemplate {
            ctx: PageContext::default(),
            path: "/missing-<page>/".to_string(),
        }
        .render()
        .unwrap();
        assert!(html.contains("missing-&lt;page&gt;"));
        assert!(!html.contains("<page>"));
    }
}
