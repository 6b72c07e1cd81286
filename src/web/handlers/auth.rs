// Signup, login and logout backed by the session

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::entities::ent_user::NewUser;
use crate::entities::User;
use crate::error::{AppError, AppResult};
use crate::forms::auth_forms::safe_next;
use crate::forms::{LoginForm, SignupForm};
use crate::infrastructure::middleware::{login, logout, Vc};
use crate::infrastructure::ViewerContext;
use crate::web::templates::{render, LoggedOutTemplate, LoginTemplate, PageContext, SignupTemplate};

#[derive(Debug, Default, Deserialize)]
pub struct NextParam {
    pub next: Option<String>,
}

pub async fn signup_form(vc: Vc, session: Session) -> AppResult<Html<String>> {
    render(&SignupTemplate {
        ctx: PageContext::load(&vc, &session).await?,
        form: SignupForm::default(),
    })
}

pub async fn signup(
    State(state): State<AppState>,
    vc: Vc,
    session: Session,
    Form(mut form): Form<SignupForm>,
) -> AppResult<Response> {
    if form.clean() {
        let new_user = NewUser {
            username: &form.username,
            password: &form.password1,
            first_name: &form.first_name,
            last_name: &form.last_name,
            email: form.email(),
        };
        match User::create(&state.db, new_user).await {
            Ok(user) => {
                info!("New account {} signed up", user.username);
                return Ok(Redirect::to("/auth/login/").into_response());
            }
            Err(AppError::Validation(_)) => {
                form.errors
                    .add("username", "A user with that username already exists.");
            }
            Err(err) => return Err(err),
        }
    }

    Ok(render(&SignupTemplate {
        ctx: PageContext::load(&vc, &session).await?,
        form,
    })?
    .into_response())
}

pub async fn login_form(
    vc: Vc,
    session: Session,
    Query(params): Query<NextParam>,
) -> AppResult<Html<String>> {
    render(&LoginTemplate {
        ctx: PageContext::load(&vc, &session).await?,
        form: LoginForm::default(),
        next: safe_next(params.next.as_deref()).unwrap_or_default(),
    })
}

pub async fn login_submit(
    State(state): State<AppState>,
    vc: Vc,
    session: Session,
    Form(mut form): Form<LoginForm>,
) -> AppResult<Response> {
    let next = safe_next(form.next.as_deref());

    if form.clean() {
        match User::authenticate(&state.db, &form.username, &form.password).await? {
            Some(user) => {
                login(&session, &user).await?;
                info!("User {} logged in", user.username);
                let target = next.unwrap_or_else(|| "/".to_string());
                return Ok(Redirect::to(&target).into_response());
            }
            None => {
                warn!("Failed login for {}", form.username);
                form.reject_credentials();
            }
        }
    }

    Ok(render(&LoginTemplate {
        ctx: PageContext::load(&vc, &session).await?,
        form,
        next: next.unwrap_or_default(),
    })?
    .into_response())
}

pub async fn logout_view(vc: Vc, session: Session) -> AppResult<Html<String>> {
    if let Some(username) = vc.username() {
        info!("User {} logged out", username);
    }
    logout(&session).await?;

    let anonymous = ViewerContext::anonymous(vc.request_id.clone());
    render(&LoggedOutTemplate {
        ctx: PageContext::from_viewer(&anonymous),
    })
}
