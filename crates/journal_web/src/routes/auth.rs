//! Signup, login and logout.

use crate::context::{RequestContext, USER_ID_KEY};
use crate::error::{RedirectOnError, WebError};
use crate::flash::{self, redirect_with, Notice};
use crate::state::AppState;
use crate::views::Page;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use log::info;
use serde::Deserialize;
use tower_sessions::Session;

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `GET /`: dashboard for members, login form for everyone else.
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    ctx: RequestContext,
) -> Result<Response, WebError> {
    if ctx.current_user()?.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }
    let notices = flash::take(&session).await?;
    Ok(state
        .views
        .render(Page::new("login", "Log in").notices(notices))?
        .into_response())
}

pub async fn signup_page(
    State(state): State<AppState>,
    session: Session,
    ctx: RequestContext,
) -> Result<Html<String>, WebError> {
    let notices = flash::take(&session).await?;
    state.views.render(
        Page::new("signup", "Sign up")
            .user(ctx.current_user()?)
            .notices(notices),
    )
}

pub async fn signup(
    ctx: RequestContext,
    Form(form): Form<SignupForm>,
) -> Result<Response, WebError> {
    ctx.auth_service()?
        .signup(&form.email, &form.password, form.name.as_deref())
        .or_redirect("/signup")?;
    Ok(redirect_with(
        Notice::success("Account created. Please log in."),
        "/login",
    ))
}

pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
    ctx: RequestContext,
) -> Result<Html<String>, WebError> {
    let notices = flash::take(&session).await?;
    state.views.render(
        Page::new("login", "Log in")
            .user(ctx.current_user()?)
            .notices(notices),
    )
}

pub async fn login(
    session: Session,
    ctx: RequestContext,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    let user_id = ctx
        .auth_service()?
        .login(&form.email, &form.password)
        .or_redirect("/login")?
        .id;
    drop(ctx);

    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user_id).await?;
    Ok(redirect_with(Notice::success("Logged in."), "/dashboard"))
}

pub async fn logout(session: Session) -> Result<Response, WebError> {
    let user_id = session.get::<i64>(USER_ID_KEY).await?;
    session.flush().await?;
    if let Some(user_id) = user_id {
        info!("event=logout module=web status=ok user_id={user_id}");
    }
    Ok(redirect_with(Notice::info("You have been logged out."), "/login"))
}
