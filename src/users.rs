//! The user resource: model, validation, and the two route handlers.

use std::sync::Arc;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::request::Request;
use crate::response::Response;
use crate::store::UserStore;

/// A registered user. `id` is assigned by the server on creation and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub email: String,
    pub height: f64,
}

/// The creation payload. Field presence and types are enforced by serde;
/// unknown fields — including a client-supplied `id` — are discarded, never
/// trusted.
#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub email: String,
    pub height: f64,
}

impl NewUser {
    /// Domain checks serde cannot express. Runs before any store mutation.
    fn validate(&self) -> Result<(), ApiError> {
        if self.first_name.is_empty() {
            return Err(ApiError::validation("first_name must not be empty"));
        }
        if self.last_name.is_empty() {
            return Err(ApiError::validation("last_name must not be empty"));
        }
        Ok(())
    }

    /// Promotes the payload to a full record under a fresh random id.
    /// Random v4 ids are collision-free without any shared counter.
    fn into_user(self) -> User {
        User {
            id: Uuid::new_v4(),
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            email: self.email,
            height: self.height,
        }
    }
}

/// `POST /users/` — validate, assign an id, append, answer `201` with the
/// full record.
pub async fn create_user(req: Request, store: Arc<UserStore>) -> Result<Response, ApiError> {
    let input: NewUser = serde_json::from_slice(req.body()).map_err(ApiError::validation)?;
    input.validate()?;

    let user = input.into_user();
    store.append(user.clone());
    info!(user = ?user, "user created");

    let body = serde_json::to_vec(&user).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Response::builder().status(StatusCode::CREATED).json(body))
}

/// `GET /users/` — every stored record, insertion order. An empty roster is
/// an empty array, not an error.
pub async fn list_users(_req: Request, store: Arc<UserStore>) -> Result<Response, ApiError> {
    let users = store.list_all();
    info!(count = users.len(), "users retrieved");

    let body = serde_json::to_vec(&users).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Response::json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::Method;

    fn post(body: &str) -> Request {
        let (parts, ()) = http::Request::builder()
            .method(Method::POST)
            .uri("/users/")
            .header("content-type", "application/json")
            .body(())
            .unwrap()
            .into_parts();
        Request::new(parts, Bytes::copy_from_slice(body.as_bytes()))
    }

    fn get() -> Request {
        let (parts, ()) = http::Request::builder()
            .method(Method::GET)
            .uri("/users/")
            .body(())
            .unwrap()
            .into_parts();
        Request::new(parts, Bytes::new())
    }

    const ADA: &str = r#"{"first_name":"Ada","last_name":"Lovelace","age":36,"email":"ada@example.com","height":1.65}"#;

    #[tokio::test]
    async fn create_assigns_an_id_and_stores_the_record() {
        let store = Arc::new(UserStore::new());
        let response = create_user(post(ADA), Arc::clone(&store)).await.unwrap();

        assert_eq!(response.status_code(), StatusCode::CREATED);
        let created: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert!(created["id"].as_str().unwrap().parse::<Uuid>().is_ok());
        assert_eq!(created["first_name"], "Ada");
        assert_eq!(created["age"], 36);
        assert_eq!(created["height"], 1.65);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn client_supplied_id_is_discarded() {
        let store = Arc::new(UserStore::new());
        let forged = r#"{"id":"00000000-0000-0000-0000-000000000000","first_name":"Ada","last_name":"Lovelace","age":36,"email":"ada@example.com","height":1.65}"#;
        let response = create_user(post(forged), Arc::clone(&store)).await.unwrap();

        let created: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_ne!(created["id"], "00000000-0000-0000-0000-000000000000");
    }

    #[tokio::test]
    async fn missing_field_is_a_validation_error_and_nothing_is_stored() {
        let store = Arc::new(UserStore::new());
        let no_email = r#"{"first_name":"Ada","last_name":"Lovelace","age":36,"height":1.65}"#;
        let err = create_user(post(no_email), Arc::clone(&store))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn wrong_type_is_a_validation_error() {
        let store = Arc::new(UserStore::new());
        let age_as_text = r#"{"first_name":"Ada","last_name":"Lovelace","age":"36","email":"a@b.c","height":1.65}"#;
        let err = create_user(post(age_as_text), Arc::clone(&store))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let store = Arc::new(UserStore::new());
        let blank = r#"{"first_name":"","last_name":"Lovelace","age":36,"email":"a@b.c","height":1.65}"#;
        let err = create_user(post(blank), Arc::clone(&store)).await.unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn list_is_empty_and_ok_on_a_fresh_store() {
        let store = Arc::new(UserStore::new());
        let response = list_users(get(), store).await.unwrap();

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.body(), b"[]");
    }

    #[tokio::test]
    async fn list_returns_creates_in_order() {
        let store = Arc::new(UserStore::new());
        for name in ["Ada", "Grace", "Edsger"] {
            let body = format!(
                r#"{{"first_name":"{name}","last_name":"X","age":1,"email":"{name}@x","height":1.0}}"#
            );
            create_user(post(&body), Arc::clone(&store)).await.unwrap();
        }

        let response = list_users(get(), store).await.unwrap();
        let listed: Vec<serde_json::Value> = serde_json::from_slice(response.body()).unwrap();
        let names: Vec<_> = listed.iter().map(|u| u["first_name"].clone()).collect();
        assert_eq!(names, ["Ada", "Grace", "Edsger"]);
    }

    #[tokio::test]
    async fn list_twice_is_identical_without_intervening_creates() {
        let store = Arc::new(UserStore::new());
        create_user(post(ADA), Arc::clone(&store)).await.unwrap();

        let first = list_users(get(), Arc::clone(&store)).await.unwrap();
        let second = list_users(get(), store).await.unwrap();
        assert_eq!(first.body(), second.body());
    }
}
