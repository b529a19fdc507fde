//! Read cursors. Cursor type `0` is the read cursor.

use serde_json::json;

use super::{ApiCall, Auth, ChatKit, path_id};
use crate::endpoint::Service;
use crate::transport::Backend;

const READ: u8 = 0;

impl<B: Backend> ChatKit<B> {
    /// Fetch a user's read cursor in a room.
    pub fn get_read_cursor(&self, user_id: &str, room_id: &str) -> B::Response {
        self.submit(|| {
            let user = path_id("user id", user_id)?;
            let room = path_id("room id", room_id)?;
            Ok(ApiCall::get(
                Service::Cursors,
                format!("/cursors/{READ}/rooms/{room}/users/{user}"),
                Auth::Superuser,
            ))
        })
    }

    /// Move a user's read cursor in a room to `position` (a message id).
    pub fn set_read_cursor(&self, user_id: &str, room_id: &str, position: u64) -> B::Response {
        self.submit(|| {
            let user = path_id("user id", user_id)?;
            let room = path_id("room id", room_id)?;
            Ok(ApiCall::put(
                Service::Cursors,
                format!("/cursors/{READ}/rooms/{room}/users/{user}"),
                Auth::Superuser,
            )
            .json(json!({ "position": position })))
        })
    }

    /// All users' read cursors in a room.
    pub fn get_room_read_cursors(&self, room_id: &str) -> B::Response {
        self.submit(|| {
            let room = path_id("room id", room_id)?;
            Ok(ApiCall::get(
                Service::Cursors,
                format!("/cursors/{READ}/rooms/{room}"),
                Auth::Superuser,
            ))
        })
    }

    /// A user's read cursors across rooms.
    pub fn get_user_read_cursors(&self, user_id: &str) -> B::Response {
        self.submit(|| {
            let user = path_id("user id", user_id)?;
            Ok(ApiCall::get(
                Service::Cursors,
                format!("/cursors/{READ}/users/{user}"),
                Auth::Superuser,
            ))
        })
    }
}
