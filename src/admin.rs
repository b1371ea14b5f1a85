// src/admin.rs

use crate::db;
use crate::error::{DiaryError, Result};
use crate::listing::{parse_int_param, Catalog};
use crate::models::NewEntry;
use crate::render::{self, AdminPage, FormValues};
use crate::server::AppState;
use crate::session::{self, SessionHandle};
use crate::tags::trim_blank;
use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use tracing::{info, warn};

const MSG_WRONG_PASSWORD: &str = "パスワードが違います。";
const MSG_REQUIRED: &str = "タイトルと本文は必須です。";
const MSG_BAD_DATETIME: &str = "日付/時刻の形式が不正です。";
const MSG_UPDATE_FAILED: &str = "更新できませんでした（必須項目 or ID不正）。";

#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
    id: Option<String>,
    mode: Option<String>,
    cat: Option<String>,
    logout: Option<String>,
}

impl AdminQuery {
    fn selected_id(&self) -> i64 {
        self.id.as_deref().map(parse_int_param).unwrap_or(0)
    }

    fn selected_tag(&self) -> String {
        self.cat.as_deref().map(trim_blank).unwrap_or_default().to_string()
    }

    fn editing(&self) -> bool {
        self.mode.as_deref() == Some("edit")
    }
}

/// Fields posted by the login, create, update and delete forms.
#[derive(Debug, Default, Deserialize)]
pub struct AdminForm {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub csrf: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub entry_date: String,
    #[serde(default)]
    pub entry_time: String,
}

/// 解析表单中的日期和时间，空日期为今天，空时间为 00:00
pub fn parse_created_at(
    date: &str,
    time: &str,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> Option<DateTime<FixedOffset>> {
    let date = date.trim();
    let time = time.trim();
    let today = now.with_timezone(&offset).format("%Y-%m-%d").to_string();
    let date = if date.is_empty() { today.as_str() } else { date };
    let time = if time.is_empty() { "00:00" } else { time };

    let naive = NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M").ok()?;
    offset.from_local_datetime(&naive).single()
}

/// Validate a create or update form into a [`NewEntry`].
pub fn parse_entry_form(
    form: &AdminForm,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> Result<NewEntry> {
    let title = trim_blank(&form.title);
    let body = trim_blank(&form.body);
    if title.is_empty() || body.is_empty() {
        return Err(DiaryError::InvalidInput(MSG_REQUIRED.to_string()));
    }
    let created_at = parse_created_at(&form.entry_date, &form.entry_time, offset, now)
        .ok_or_else(|| DiaryError::InvalidInput(MSG_BAD_DATETIME.to_string()))?;
    Ok(NewEntry {
        title: title.to_string(),
        body: body.to_string(),
        created_at,
    })
}

/// Date and time shown in the edit form.
pub fn split_local_date_time(
    stored: &str,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> (String, String) {
    match DateTime::parse_from_rfc3339(stored) {
        Ok(dt) => {
            let local = dt.with_timezone(&offset);
            (local.format("%Y-%m-%d").to_string(), local.format("%H:%M").to_string())
        }
        Err(_) => (
            now.with_timezone(&offset).format("%Y-%m-%d").to_string(),
            "00:00".to_string(),
        ),
    }
}

fn with_cookie(cookie: Option<String>, response: impl IntoResponse) -> Response {
    match cookie {
        Some(c) => ([(SET_COOKIE, c)], response).into_response(),
        None => response.into_response(),
    }
}

fn fresh_cookie(handle: &SessionHandle) -> Option<String> {
    handle.fresh.then(|| session::session_cookie(&handle.id))
}

/// `GET /admin`
pub async fn admin_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(q): Query<AdminQuery>,
) -> Result<Response> {
    let handle = state.sessions.load_or_create(&headers);

    if q.logout.is_some() {
        state.sessions.destroy(&handle.id);
        info!("admin logged out");
        return Ok(with_cookie(Some(session::expired_cookie()), Redirect::to("/admin")));
    }

    if !handle.session.is_admin {
        let page = render::login_page(&handle.session.csrf, None);
        return Ok(with_cookie(fresh_cookie(&handle), Html(page)));
    }

    let page = admin_screen(&state, &handle, &q, None).await?;
    Ok(with_cookie(fresh_cookie(&handle), page))
}

/// `POST /admin`
pub async fn admin_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(q): Query<AdminQuery>,
    Form(form): Form<AdminForm>,
) -> Result<Response> {
    let handle = state.sessions.load_or_create(&headers);

    if !session::csrf_matches(&handle.session, &form.csrf) {
        warn!(action = %form.action, "CSRF token mismatch");
        return Ok(with_cookie(
            fresh_cookie(&handle),
            (StatusCode::FORBIDDEN, "CSRF token mismatch"),
        ));
    }

    if form.action == "login" {
        let expected = state.settings.admin_password_hash.as_deref();
        if session::verify_password(&form.password, expected) {
            let new_id = state.sessions.promote(&handle.id);
            info!("admin logged in");
            return Ok(with_cookie(
                Some(session::session_cookie(&new_id)),
                Redirect::to("/admin"),
            ));
        }
        warn!("admin login failed");
        if !handle.session.is_admin {
            let page = render::login_page(&handle.session.csrf, Some(MSG_WRONG_PASSWORD));
            return Ok(with_cookie(fresh_cookie(&handle), Html(page)));
        }
        let page = admin_screen(&state, &handle, &q, Some(MSG_WRONG_PASSWORD)).await?;
        return Ok(page.into_response());
    }

    if !handle.session.is_admin {
        return Ok(with_cookie(fresh_cookie(&handle), Redirect::to("/admin")));
    }

    let offset = state.settings.utc_offset;
    let now = Utc::now();
    let now_local = now.with_timezone(&offset);

    let flash = match form.action.as_str() {
        "create" => match parse_entry_form(&form, offset, now) {
            Ok(entry) => {
                let conn = state.conn.lock().await;
                let id = db::create_entry(&conn, &entry, &now_local)?;
                info!(id, "entry created");
                return Ok(Redirect::to(&format!("/admin?id={id}")).into_response());
            }
            Err(DiaryError::InvalidInput(msg)) => msg,
            Err(e) => return Err(e),
        },
        "update" => {
            let id = parse_int_param(&form.id);
            if id <= 0 {
                MSG_UPDATE_FAILED.to_string()
            } else {
                match parse_entry_form(&form, offset, now) {
                    Ok(entry) => {
                        let conn = state.conn.lock().await;
                        db::update_entry(&conn, id, &entry, &now_local)?;
                        info!(id, "entry updated");
                        return Ok(Redirect::to(&format!("/admin?id={id}")).into_response());
                    }
                    Err(DiaryError::InvalidInput(msg)) if msg == MSG_REQUIRED => {
                        MSG_UPDATE_FAILED.to_string()
                    }
                    Err(DiaryError::InvalidInput(msg)) => msg,
                    Err(e) => return Err(e),
                }
            }
        }
        "delete" => {
            let id = parse_int_param(&form.id);
            if id > 0 {
                let conn = state.conn.lock().await;
                let removed = db::delete_entry(&conn, id)?;
                info!(id, removed, "entry deleted");
            }
            let target = render::build_url("/admin", &[("cat", q.selected_tag())]);
            return Ok(Redirect::to(&target).into_response());
        }
        _ => return Ok((StatusCode::BAD_REQUEST, "Bad Request").into_response()),
    };

    let page = admin_screen(&state, &handle, &q, Some(&flash)).await?;
    Ok(page.into_response())
}

/// Render the logged-in admin screen for the given query.
async fn admin_screen(
    state: &AppState,
    handle: &SessionHandle,
    q: &AdminQuery,
    flash: Option<&str>,
) -> Result<Html<String>> {
    let selected_id = q.selected_id();
    let selected_tag = q.selected_tag();

    let conn = state.conn.lock().await;
    let catalog = Catalog::build(db::list_entries(&conn)?, &selected_tag);
    let active = if selected_id > 0 {
        db::get_entry(&conn, selected_id)?
    } else {
        None
    };
    drop(conn);

    let offset = state.settings.utc_offset;
    let now = Utc::now();
    let editing = q.editing() && active.is_some();
    let form = match (&active, editing) {
        (Some(entry), true) => {
            let (date, time) = split_local_date_time(&entry.created_at, offset, now);
            FormValues {
                date,
                time,
                title: entry.title.clone(),
                body: entry.body.clone(),
            }
        }
        _ => FormValues {
            date: now.with_timezone(&offset).format("%Y-%m-%d").to_string(),
            time: String::new(),
            title: String::new(),
            body: String::new(),
        },
    };

    Ok(Html(render::admin_page(&AdminPage {
        catalog: &catalog,
        selected_tag: &selected_tag,
        selected_id,
        active: active.as_ref(),
        editing,
        form,
        flash,
        csrf: &handle.session.csrf,
    })))
}
