//! In-memory stand-ins for the database and the demo post API, plus request helpers.

use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use time::OffsetDateTime;
use tower::ServiceExt;

use crate::{
    db::StoreError,
    dummy::client::{DummyPostApi, UpstreamError},
    posts::{repo::PostStore, repo_types::Post},
    state::AppState,
    users::{
        repo::UserStore,
        repo_types::{NewUser, User},
    },
};

/// Mirrors the UNIQUE(username) and UNIQUE(email) constraints of the real table.
#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    fn taken(rows: &[User], username: &str, email: &str, exclude_id: Option<i32>) -> usize {
        rows.iter()
            .filter(|u| Some(u.id) != exclude_id)
            .filter(|u| u.username == username || u.email == email)
            .count()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn count_taken(
        &self,
        username: &str,
        email: &str,
        exclude_id: Option<i32>,
    ) -> Result<i64, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(Self::taken(&rows, username, email, exclude_id) as i64)
    }

    async fn create(&self, user: &NewUser) -> Result<User, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if Self::taken(&rows, &user.username, &user.email, None) > 0 {
            return Err(StoreError::UniqueViolation);
        }
        let now = OffsetDateTime::now_utc();
        let row = User {
            id: rows.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            is_active: user.is_active,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn update(&self, id: i32, user: &NewUser) -> Result<u64, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if Self::taken(&rows, &user.username, &user.email, Some(id)) > 0 {
            return Err(StoreError::UniqueViolation);
        }
        let Some(row) = rows.iter_mut().find(|u| u.id == id) else {
            return Ok(0);
        };
        row.username = user.username.clone();
        row.email = user.email.clone();
        row.password_hash = user.password_hash.clone();
        row.is_active = user.is_active;
        row.updated_at = OffsetDateTime::now_utc();
        Ok(1)
    }

    async fn delete(&self, id: i32) -> Result<u64, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        Ok((before - rows.len()) as u64)
    }
}

/// A user store whose pre-insert check never sees the competing row, as when
/// two requests race; only the UNIQUE constraints catch the duplicate.
#[derive(Default)]
pub struct RacingUserStore(MemoryUserStore);

#[async_trait]
impl UserStore for RacingUserStore {
    async fn count_taken(&self, _: &str, _: &str, _: Option<i32>) -> Result<i64, StoreError> {
        Ok(0)
    }

    async fn create(&self, user: &NewUser) -> Result<User, StoreError> {
        self.0.create(user).await
    }

    async fn find(&self, id: i32) -> Result<Option<User>, StoreError> {
        self.0.find(id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.0.find_by_username(username).await
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.0.list().await
    }

    async fn update(&self, id: i32, user: &NewUser) -> Result<u64, StoreError> {
        self.0.update(id, user).await
    }

    async fn delete(&self, id: i32) -> Result<u64, StoreError> {
        self.0.delete(id).await
    }
}

#[derive(Default)]
pub struct MemoryPostStore {
    rows: Mutex<Vec<Post>>,
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn create(&self, post: &Post) -> Result<Post, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let row = Post {
            id: rows.iter().map(|p| p.id).max().unwrap_or(0) + 1,
            ..post.clone()
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find(&self, id: i32) -> Result<Option<Post>, StoreError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }

    async fn update(&self, post: &Post) -> Result<u64, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|p| p.id == post.id) {
            Some(row) => {
                *row = post.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: i32) -> Result<u64, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok((before - rows.len()) as u64)
    }
}

/// Serves two canned posts; id 500 simulates an unreachable upstream.
#[derive(Default)]
pub struct FakeDummyApi;

pub const UNREACHABLE_DUMMY_ID: i32 = 500;

fn canned_posts() -> Vec<Post> {
    vec![
        Post {
            id: 1,
            title: "sunt aut facere".into(),
            body: "quia et suscipit".into(),
            user_id: 1,
        },
        Post {
            id: 2,
            title: "qui est esse".into(),
            body: "est rerum tempore".into(),
            user_id: 1,
        },
    ]
}

#[async_trait]
impl DummyPostApi for FakeDummyApi {
    async fn list(&self) -> Result<Vec<Post>, UpstreamError> {
        Ok(canned_posts())
    }

    async fn get(&self, id: i32) -> Result<Option<Post>, UpstreamError> {
        if id == UNREACHABLE_DUMMY_ID {
            return Err(UpstreamError::Status(StatusCode::SERVICE_UNAVAILABLE));
        }
        Ok(canned_posts().into_iter().find(|p| p.id == id))
    }

    async fn create(&self, post: &Post) -> Result<Post, UpstreamError> {
        Ok(Post {
            id: 252,
            ..post.clone()
        })
    }
}

/// An upstream that answers far later than any request timeout used in tests.
pub struct SlowDummyApi;

#[async_trait]
impl DummyPostApi for SlowDummyApi {
    async fn list(&self) -> Result<Vec<Post>, UpstreamError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(canned_posts())
    }

    async fn get(&self, id: i32) -> Result<Option<Post>, UpstreamError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(canned_posts().into_iter().find(|p| p.id == id))
    }

    async fn create(&self, post: &Post) -> Result<Post, UpstreamError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(post.clone())
    }
}

/// Sends one request through `app` and returns the status and the decoded JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// A token the fake state accepts.
pub fn token_for(state: &AppState, username: &str) -> String {
    state.keys.sign(username).unwrap()
}
