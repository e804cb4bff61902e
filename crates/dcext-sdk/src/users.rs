//! Identity lookups against the auth API.
//!
//! `current_user` chains two calls: the permissions document names the
//! principal, then the user is fetched by id. Every operation wraps the
//! failure beneath it with its own prefix, so a permissions failure during
//! `current_user` reads
//! `Unable to get current user: Unable to get permissions: ...`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, UsersError};
use crate::http::{HttpClient, HttpRequest, HttpRequester};

pub const USERS_URL: &str = "https://auth.amplience.net/users";
pub const PERMISSIONS_URL: &str = "https://auth.amplience.net/permissions";

pub fn user_url(id: &str) -> String {
    format!("{USERS_URL}/{id}")
}

/// Normalized user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    attributes: AuthUserAttributes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct AuthUserAttributes {
    email: String,
    first_name: String,
    last_name: String,
}

impl From<AuthUser> for User {
    fn from(user: AuthUser) -> Self {
        Self {
            id: user.id,
            first_name: user.attributes.first_name,
            last_name: user.attributes.last_name,
            email: user.attributes.email,
        }
    }
}

/// Body of a by-id lookup: the bare record, or the record under `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UserDocument {
    Bare(AuthUser),
    Wrapped { data: AuthUser },
}

impl From<UserDocument> for User {
    fn from(document: UserDocument) -> Self {
        match document {
            UserDocument::Bare(user) | UserDocument::Wrapped { data: user } => user.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserCollection {
    #[serde(default)]
    data: Option<Vec<AuthUser>>,
}

/// Permissions document for the authenticated principal.
///
/// Fetched fresh on every call; the expiry fields change each time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permissions {
    pub data: PermissionsData,
    pub meta: PermissionsMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionsData {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PermissionsMeta {
    pub principal: Principal,
    #[serde(default)]
    pub default_bucket: Option<String>,
    #[serde(flatten)]
    pub token_expiries: TokenExpiries,
    #[serde(default)]
    pub is_client: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Principal {
    pub user_id: String,
    #[serde(default)]
    pub company_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TokenExpiries {
    #[serde(default)]
    pub access_token_expires: Option<Value>,
    #[serde(default)]
    pub refresh_token_expires: Option<Value>,
}

/// Resolves users through an [`HttpRequester`], by default the host bridge.
#[derive(Debug, Clone)]
pub struct Users<C = HttpClient> {
    client: C,
}

impl<C: HttpRequester> Users<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Every user visible to the principal. An empty collection is `Ok(vec![])`.
    pub async fn list(&self) -> Result<Vec<User>, UsersError> {
        self.fetch_users().await.map_err(UsersError::List)
    }

    /// The permissions document for the authenticated principal.
    pub async fn permissions(&self) -> Result<Permissions, UsersError> {
        self.fetch_permissions()
            .await
            .map_err(UsersError::Permissions)
    }

    /// The authenticated user: permissions first, then the principal by id.
    pub async fn current_user(&self) -> Result<User, UsersError> {
        let permissions = self
            .permissions()
            .await
            .map_err(|err| UsersError::CurrentUser(Box::new(err)))?;
        let user_id = &permissions.meta.principal.user_id;

        self.fetch_user(user_id)
            .await
            .map_err(|err| UsersError::CurrentUser(Box::new(UsersError::Api(err))))
    }

    async fn get(&self, url: &str) -> Result<Value, ApiError> {
        self.client.request(HttpRequest::get(url)).await?.into_ok()
    }

    async fn fetch_users(&self) -> Result<Vec<User>, ApiError> {
        let body = self.get(USERS_URL).await?;
        if body.is_null() {
            return Ok(Vec::new());
        }
        let document: UserCollection = serde_json::from_value(body)?;
        let users: Vec<User> = document
            .data
            .unwrap_or_default()
            .into_iter()
            .map(User::from)
            .collect();
        tracing::debug!(count = users.len(), "listed users");
        Ok(users)
    }

    async fn fetch_permissions(&self) -> Result<Permissions, ApiError> {
        let body = self.get(PERMISSIONS_URL).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn fetch_user(&self, id: &str) -> Result<User, ApiError> {
        let body = self.get(&user_url(id)).await?;
        let document: UserDocument = serde_json::from_value(body)?;
        Ok(document.into())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use dcext_channel::ChannelError;
    use serde_json::json;

    use super::*;
    use crate::http::{HttpMethod, HttpResponse};

    /// Answers requests from a queue and records what it was asked.
    #[derive(Default)]
    struct Scripted {
        answers: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn answering(answers: impl IntoIterator<Item = Result<HttpResponse, ApiError>>) -> Self {
            Self {
                answers: Mutex::new(answers.into_iter().collect()),
                seen: Mutex::default(),
            }
        }

        fn urls(&self) -> Vec<String> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.url.clone())
                .collect()
        }
    }

    impl HttpRequester for Scripted {
        async fn request(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            assert_eq!(request.method, HttpMethod::Get);
            self.seen.lock().unwrap().push(request);
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected request")
        }
    }

    fn ok(data: Value) -> Result<HttpResponse, ApiError> {
        Ok(HttpResponse { status: 200, data })
    }

    fn status(status: u16) -> Result<HttpResponse, ApiError> {
        Ok(HttpResponse {
            status,
            data: Value::Null,
        })
    }

    fn permissions_body() -> Value {
        json!({
            "data": {
                "type": "permissions",
                "attributes": { "permissions": [] }
            },
            "meta": {
                "principal": {
                    "user-id": "d12ac106-5f27-0000-0000-000000000000",
                    "company-id": "9462ee13-5f3f-0000-0000-000000000000"
                },
                "default-bucket": "639f1a61-e5fd-0000-0000-000000000000",
                "refresh-token-expires": "28796",
                "access-token-expires": "356",
                "is-client": false
            }
        })
    }

    fn user_record(id: &str) -> Value {
        json!({
            "id": id,
            "type": "users",
            "attributes": {
                "email": "testuser@bigcontent.io",
                "first-name": "Test",
                "last-name": "User",
                "status": "ACTIVE"
            },
            "links": { "self": format!("{{AUTH}}/users/{id}") }
        })
    }

    #[tokio::test]
    async fn list_normalizes_hyphenated_attributes() {
        let users = Users::new(Scripted::answering([ok(json!({
            "data": [user_record("U1")],
            "links": { "self": "{AUTH}/users" }
        }))]));

        let listed = users.list().await.unwrap();
        assert_eq!(
            listed,
            vec![User {
                id: "U1".to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: "testuser@bigcontent.io".to_string(),
            }]
        );
        assert_eq!(users.client.urls(), vec![USERS_URL.to_string()]);
    }

    #[tokio::test]
    async fn list_empty_collection_is_empty() {
        let users = Users::new(Scripted::answering([ok(json!({ "data": [] }))]));
        assert_eq!(users.list().await.unwrap(), Vec::<User>::new());
    }

    #[tokio::test]
    async fn list_missing_data_is_empty() {
        let users = Users::new(Scripted::answering([ok(Value::Null), ok(json!({}))]));
        assert!(users.list().await.unwrap().is_empty());
        assert!(users.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_non_200_is_prefixed() {
        let users = Users::new(Scripted::answering([status(401)]));
        let err = users.list().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to get users: API responded with a non 200 status code. Error: status code 401"
        );
    }

    #[tokio::test]
    async fn list_non_200_uses_body_when_present() {
        let users = Users::new(Scripted::answering([Ok(HttpResponse {
            status: 403,
            data: json!("Forbidden"),
        })]));
        let err = users.list().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to get users: API responded with a non 200 status code. Error: Forbidden"
        );
    }

    #[tokio::test]
    async fn list_channel_failure_is_prefixed() {
        let users = Users::new(Scripted::answering([Err(ApiError::Channel(
            ChannelError::NotConnected("disconnected"),
        ))]));
        let err = users.list().await.unwrap_err();
        assert!(err.to_string().starts_with("Unable to get users: request failed"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn permissions_decoded() {
        let users = Users::new(Scripted::answering([ok(permissions_body())]));
        let permissions = users.permissions().await.unwrap();

        assert_eq!(permissions.data.kind, "permissions");
        assert_eq!(
            permissions.meta.principal.user_id,
            "d12ac106-5f27-0000-0000-000000000000"
        );
        assert_eq!(
            permissions.meta.principal.company_id.as_deref(),
            Some("9462ee13-5f3f-0000-0000-000000000000")
        );
        assert_eq!(
            permissions.meta.default_bucket.as_deref(),
            Some("639f1a61-e5fd-0000-0000-000000000000")
        );
        assert_eq!(
            permissions.meta.token_expiries.access_token_expires,
            Some(json!("356"))
        );
        assert!(!permissions.meta.is_client);
        assert_eq!(users.client.urls(), vec![PERMISSIONS_URL.to_string()]);
    }

    #[tokio::test]
    async fn permissions_non_200_is_prefixed() {
        let users = Users::new(Scripted::answering([status(401)]));
        let err = users.permissions().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to get permissions: API responded with a non 200 status code. Error: status code 401"
        );
    }

    #[tokio::test]
    async fn permissions_without_principal_is_malformed() {
        let users = Users::new(Scripted::answering([ok(json!({
            "data": { "type": "permissions" },
            "meta": {}
        }))]));
        let err = users.permissions().await.unwrap_err();
        assert!(matches!(err, UsersError::Permissions(ApiError::Malformed(_))));
    }

    #[tokio::test]
    async fn current_user_chains_permissions_then_user() {
        let id = "d12ac106-5f27-0000-0000-000000000000";
        let users = Users::new(Scripted::answering([
            ok(permissions_body()),
            ok(user_record(id)),
        ]));

        let user = users.current_user().await.unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.first_name, "Test");
        assert_eq!(user.last_name, "User");
        assert_eq!(user.email, "testuser@bigcontent.io");
        assert_eq!(
            users.client.urls(),
            vec![PERMISSIONS_URL.to_string(), user_url(id)]
        );
    }

    #[tokio::test]
    async fn current_user_permissions_failure_chains_messages() {
        let users = Users::new(Scripted::answering([status(401)]));
        let err = users.current_user().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to get current user: Unable to get permissions: API responded with a non 200 status code. Error: status code 401"
        );
        // Only the permissions call was attempted.
        assert_eq!(users.client.urls(), vec![PERMISSIONS_URL.to_string()]);
    }

    #[tokio::test]
    async fn current_user_lookup_failure_is_prefixed() {
        let users = Users::new(Scripted::answering([ok(permissions_body()), status(401)]));
        let err = users.current_user().await.unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Unable to get current user: "));
        assert!(message.contains("status code 401"));
        assert!(matches!(err, UsersError::CurrentUser(ref inner) if matches!(**inner, UsersError::Api(ApiError::Status { status: 401, .. }))));
    }

    #[tokio::test]
    async fn permissions_fetched_fresh_each_time() {
        let id = "d12ac106-5f27-0000-0000-000000000000";
        let users = Users::new(Scripted::answering([
            ok(permissions_body()),
            ok(user_record(id)),
            ok(permissions_body()),
            ok(user_record(id)),
        ]));

        users.current_user().await.unwrap();
        users.current_user().await.unwrap();
        let permission_calls = users
            .client
            .urls()
            .into_iter()
            .filter(|url| url == PERMISSIONS_URL)
            .count();
        assert_eq!(permission_calls, 2);
    }

    #[tokio::test]
    async fn by_id_and_list_records_normalize_alike() {
        let id = "d12ac106-5f27-0000-0000-000000000000";
        let users = Users::new(Scripted::answering([
            ok(json!({ "data": [user_record(id)] })),
            ok(permissions_body()),
            ok(user_record(id)),
            ok(permissions_body()),
            ok(json!({ "data": user_record(id) })),
        ]));

        let listed = users.list().await.unwrap();
        let bare = users.current_user().await.unwrap();
        let wrapped = users.current_user().await.unwrap();
        assert_eq!(listed, vec![bare.clone()]);
        assert_eq!(bare, wrapped);
    }

    #[tokio::test]
    async fn by_id_record_without_attributes_is_malformed() {
        let users = Users::new(Scripted::answering([
            ok(permissions_body()),
            ok(json!({ "id": "U1", "type": "users" })),
        ]));
        let err = users.current_user().await.unwrap_err();
        assert!(matches!(err, UsersError::CurrentUser(ref inner) if matches!(**inner, UsersError::Api(ApiError::Malformed(_)))));
    }

    #[test]
    fn user_serializes_camel_case() {
        let user = User {
            id: "U1".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: "testuser@x.io".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({ "id": "U1", "firstName": "Test", "lastName": "User", "email": "testuser@x.io" })
        );
    }
}
