//! Message operations.

use serde_json::json;

use super::{ApiCall, Auth, ChatKit, path_id, to_body};
use crate::endpoint::Service;
use crate::error::Error;
use crate::transport::Backend;
use crate::types::{MessagePart, NewMessage};

impl<B: Backend> ChatKit<B> {
    /// Send a text message, with an optional attachment, into a room.
    pub fn send_message(&self, room_id: &str, message: &NewMessage) -> B::Response {
        self.submit(|| {
            let id = path_id("room id", room_id)?;
            path_id("sender id", &message.sender_id)?;
            Ok(
                ApiCall::post(Service::Api, format!("/rooms/{id}/messages"), Auth::Superuser)
                    .json(to_body(message)?),
            )
        })
    }

    /// Send a message made of typed parts.
    pub fn send_multipart_message(
        &self,
        room_id: &str,
        sender_id: &str,
        parts: &[MessagePart],
    ) -> B::Response {
        self.submit(|| {
            let id = path_id("room id", room_id)?;
            path_id("sender id", sender_id)?;
            if parts.is_empty() {
                return Err(Error::InvalidArgument("message must have at least one part".into()));
            }
            let body = json!({ "sender_id": sender_id, "parts": to_body(parts)? });
            Ok(ApiCall::post(Service::Api, format!("/rooms/{id}/messages"), Auth::Superuser).json(body))
        })
    }

    /// Delete a message.
    pub fn delete_message(&self, message_id: &str) -> B::Response {
        self.submit(|| {
            let id = path_id("message id", message_id)?;
            Ok(ApiCall::delete(Service::Api, format!("/messages/{id}"), Auth::Superuser))
        })
    }
}
