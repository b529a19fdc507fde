//! Room operations.

use serde_json::json;

use super::{ApiCall, Auth, ChatKit, check_limit, path_id, require_ids, to_body};
use crate::endpoint::{Query, Service};
use crate::error::Error;
use crate::transport::Backend;
use crate::types::{Direction, ListRoomsOptions, NewRoom, RoomMessagesOptions, RoomUpdate};

impl<B: Backend> ChatKit<B> {
    /// Create a room on behalf of `creator_id`.
    ///
    /// The request carries a token acting as the creator, not a superuser token.
    pub fn create_room(&self, creator_id: &str, room: &NewRoom) -> B::Response {
        self.submit(|| {
            path_id("creator id", creator_id)?;
            Ok(
                ApiCall::post(Service::Api, "/rooms", Auth::Subject(creator_id.to_owned()))
                    .json(to_body(room)?),
            )
        })
    }

    /// Change fields on a room. Only the fields that are set are sent; an
    /// update with nothing set is rejected.
    pub fn update_room(&self, room_id: &str, update: &RoomUpdate) -> B::Response {
        self.submit(|| {
            let id = path_id("room id", room_id)?;
            if update.is_empty() {
                return Err(Error::InvalidArgument("room update sets no fields".into()));
            }
            Ok(ApiCall::put(Service::Api, format!("/rooms/{id}"), Auth::Superuser)
                .json(to_body(update)?))
        })
    }

    /// Delete a room.
    pub fn delete_room(&self, room_id: &str) -> B::Response {
        self.submit(|| {
            let id = path_id("room id", room_id)?;
            Ok(ApiCall::delete(Service::Api, format!("/rooms/{id}"), Auth::Superuser))
        })
    }

    /// Fetch one room.
    pub fn get_room(&self, room_id: &str) -> B::Response {
        self.submit(|| {
            let id = path_id("room id", room_id)?;
            Ok(ApiCall::get(Service::Api, format!("/rooms/{id}"), Auth::Superuser))
        })
    }

    /// List rooms.
    pub fn get_rooms(&self, options: &ListRoomsOptions) -> B::Response {
        let query = Query::new()
            .with_opt("from_id", options.from_id.as_deref())
            .with_opt("include_private", options.include_private.then_some(true));
        self.submit(|| Ok(ApiCall::get(Service::Api, "/rooms", Auth::Superuser).query(query)))
    }

    /// Rooms the user is a member of.
    pub fn get_user_rooms(&self, user_id: &str) -> B::Response {
        self.submit(|| {
            let id = path_id("user id", user_id)?;
            Ok(ApiCall::get(Service::Api, format!("/users/{id}/rooms"), Auth::Superuser))
        })
    }

    /// Rooms the user could join.
    pub fn get_user_joinable_rooms(&self, user_id: &str) -> B::Response {
        self.submit(|| {
            let id = path_id("user id", user_id)?;
            Ok(
                ApiCall::get(Service::Api, format!("/users/{id}/rooms"), Auth::Superuser)
                    .query(Query::new().with("joinable", true)),
            )
        })
    }

    /// Add members to a room.
    pub fn add_users_to_room(&self, room_id: &str, user_ids: &[&str]) -> B::Response {
        self.change_members(room_id, user_ids, "add")
    }

    /// Remove members from a room.
    pub fn remove_users_from_room(&self, room_id: &str, user_ids: &[&str]) -> B::Response {
        self.change_members(room_id, user_ids, "remove")
    }

    fn change_members(&self, room_id: &str, user_ids: &[&str], action: &str) -> B::Response {
        self.submit(|| {
            let id = path_id("room id", room_id)?;
            let ids = require_ids("user ids", user_ids)?;
            Ok(ApiCall::put(
                Service::Api,
                format!("/rooms/{id}/users/{action}"),
                Auth::Superuser,
            )
            .json(json!({ "user_ids": ids })))
        })
    }

    /// Fetch a page of a room's messages.
    pub fn get_room_messages(&self, room_id: &str, options: &RoomMessagesOptions) -> B::Response {
        self.submit(|| {
            let id = path_id("room id", room_id)?;
            check_limit(options.limit)?;
            let query = Query::new()
                .with_opt("initial_id", options.initial_id)
                .with_opt("limit", options.limit)
                .with_opt("direction", options.direction.map(Direction::as_str));
            Ok(ApiCall::get(Service::Api, format!("/rooms/{id}/messages"), Auth::Superuser)
                .query(query))
        })
    }
}
