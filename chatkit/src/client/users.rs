//! User operations.

use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{ApiCall, Auth, ChatKit, MAX_PAGE_SIZE, check_limit, path_id, require_ids, to_body};
use crate::endpoint::{Query, Service};
use crate::error::{Error, Result};
use crate::transport::Backend;
use crate::types::{ListUsersOptions, NewUser, UserUpdate};

impl<B: Backend> ChatKit<B> {
    /// Create a user.
    pub fn create_user(&self, user: &NewUser) -> B::Response {
        self.submit(|| {
            path_id("user id", &user.id)?;
            Ok(ApiCall::post(Service::Api, "/users", Auth::Superuser).json(to_body(user)?))
        })
    }

    /// Create several users in one request.
    ///
    /// An empty batch is rejected without a request.
    pub fn batch_create_users(&self, users: &[NewUser]) -> B::Response {
        self.submit(|| {
            if users.is_empty() {
                return Err(Error::InvalidArgument("batch must contain at least one user".into()));
            }
            for user in users {
                path_id("user id", &user.id)?;
            }
            Ok(ApiCall::post(Service::Api, "/batch_users", Auth::Superuser).json(to_body(users)?))
        })
    }

    /// Change fields on a user. Only the fields that are set are sent; an
    /// update with nothing set is rejected.
    pub fn update_user(&self, user_id: &str, update: &UserUpdate) -> B::Response {
        self.submit(|| {
            let id = path_id("user id", user_id)?;
            if update.is_empty() {
                return Err(Error::InvalidArgument("user update sets no fields".into()));
            }
            Ok(ApiCall::put(Service::Api, format!("/users/{id}"), Auth::Superuser)
                .json(to_body(update)?))
        })
    }

    /// Delete a user.
    pub fn delete_user(&self, user_id: &str) -> B::Response {
        self.submit(|| {
            let id = path_id("user id", user_id)?;
            Ok(ApiCall::delete(Service::Api, format!("/users/{id}"), Auth::Superuser))
        })
    }

    /// Fetch one user.
    pub fn get_user(&self, user_id: &str) -> B::Response {
        self.submit(|| {
            let id = path_id("user id", user_id)?;
            Ok(ApiCall::get(Service::Api, format!("/users/{id}"), Auth::Superuser))
        })
    }

    /// List users, oldest first.
    pub fn get_users(&self, options: &ListUsersOptions) -> B::Response {
        self.submit(|| {
            check_limit(options.limit)?;
            let query = Query::new()
                .with_opt("from_ts", options.from_ts.as_deref())
                .with_opt("limit", options.limit);
            Ok(ApiCall::get(Service::Api, "/users", Auth::Superuser).query(query))
        })
    }

    /// Fetch several users by id. Each id is sent as a repeated `id` parameter.
    pub fn get_users_by_ids(&self, user_ids: &[&str]) -> B::Response {
        self.submit(|| {
            let ids = require_ids("user ids", user_ids)?;
            Ok(ApiCall::get(Service::Api, "/users_by_ids", Auth::Superuser)
                .query(Query::new().with("id", ids)))
        })
    }
}

#[derive(Deserialize)]
struct ListedUser {
    id: String,
}

// The page already passed the 2xx table, so its exact status is gone.
fn listed_ids(batch: Value) -> Result<Vec<String>> {
    let body = batch.to_string();
    serde_json::from_value::<Vec<ListedUser>>(batch)
        .map(|users| users.into_iter().map(|u| u.id).collect())
        .map_err(|source| Error::Decode {
            status: 200,
            source,
            body,
        })
}

fn full_page() -> ListUsersOptions {
    ListUsersOptions {
        from_ts: None,
        limit: Some(MAX_PAGE_SIZE),
    }
}

#[cfg(feature = "blocking")]
impl ChatKit<crate::transport::BlockingBackend> {
    /// Delete every user on the instance, a page at a time.
    ///
    /// Returns how many users were deleted. Stops at the first failure.
    pub fn delete_all_users(&self) -> Result<usize> {
        let mut deleted = 0;
        loop {
            let ids = listed_ids(self.get_users(&full_page())?)?;
            if ids.is_empty() {
                info!(deleted, "all users deleted");
                return Ok(deleted);
            }
            for id in ids {
                self.delete_user(&id)?;
                deleted += 1;
            }
        }
    }
}

#[cfg(feature = "async")]
impl ChatKit<crate::transport::AsyncBackend> {
    /// Delete every user on the instance, a page at a time.
    ///
    /// Returns how many users were deleted. Stops at the first failure.
    pub async fn delete_all_users(&self) -> Result<usize> {
        let mut deleted = 0;
        loop {
            let ids = listed_ids(self.get_users(&full_page()).await?)?;
            if ids.is_empty() {
                info!(deleted, "all users deleted");
                return Ok(deleted);
            }
            for id in ids {
                self.delete_user(&id).await?;
                deleted += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn listed_ids_reads_id_fields() {
        let ids = listed_ids(json!([{"id": "a", "name": "A"}, {"id": "b"}])).unwrap();
        assert_eq!(ids, ["a", "b"]);
        assert!(listed_ids(json!([])).unwrap().is_empty());
    }

    #[test]
    fn unexpected_listing_shape_is_decode_error() {
        let err = listed_ids(json!({"users": []})).unwrap_err();
        assert_eq!(err.status(), Some(200));
        assert!(matches!(err, Error::Decode { body, .. } if body == r#"{"users":[]}"#));
    }
}
