//! Request payloads and option sets for the resource operations.
//!
//! Optional fields left as `None` (or empty lists) are omitted from the
//! serialized body rather than sent as `null`.

use serde::Serialize;
use serde_json::Value;

/// Role scope on the authorizer service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleScope {
    /// Applies inside a single room.
    Room,
    /// Applies across the instance.
    Global,
}

impl RoleScope {
    /// Wire name used in paths and bodies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::Global => "global",
        }
    }
}

/// Message listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Newer than the initial id.
    Newer,
    /// Older than the initial id.
    Older,
}

impl Direction {
    /// Wire name used in query strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newer => "newer",
            Self::Older => "older",
        }
    }
}

/// A user to create.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewUser {
    /// Id assigned by your application. Must not be empty.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Link to the user's avatar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Arbitrary JSON stored with the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Value>,
}

impl NewUser {
    /// A user with only the required fields.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Fields to change on an existing user.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New avatar link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Replacement custom data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Value>,
}

impl UserUpdate {
    /// Whether nothing would be sent.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.avatar_url.is_none() && self.custom_data.is_none()
    }
}

/// Options for listing users.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUsersOptions {
    /// Only users created at or after this timestamp.
    pub from_ts: Option<String>,
    /// Page size, 1 to 100. `None` = server default (20).
    pub limit: Option<u32>,
}

/// A room to create.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewRoom {
    /// Room name.
    pub name: String,
    /// Private rooms are hidden from non-members.
    pub private: bool,
    /// Members to add at creation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub user_ids: Vec<String>,
    /// Arbitrary JSON stored with the room.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Value>,
}

impl NewRoom {
    /// A public room with no initial members.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Fields to change on an existing room.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoomUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    /// Replacement custom data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<Value>,
}

impl RoomUpdate {
    /// Whether nothing would be sent.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.private.is_none() && self.custom_data.is_none()
    }
}

/// Options for listing rooms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRoomsOptions {
    /// Only rooms with ids greater than this.
    pub from_id: Option<String>,
    /// Include private rooms.
    pub include_private: bool,
}

/// Options for fetching a room's messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomMessagesOptions {
    /// Start of the range (exclusive).
    pub initial_id: Option<u64>,
    /// Page size, 1 to 100. `None` = server default (20).
    pub limit: Option<u32>,
    /// Listing order. `None` = server default.
    pub direction: Option<Direction>,
}

/// Kind of resource an attachment links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    /// Image.
    Image,
    /// Video.
    Video,
    /// Audio.
    Audio,
    /// Any other file.
    File,
}

/// A link-based message attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    /// URL of the resource.
    pub resource_link: String,
    /// Resource kind.
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
}

/// A plain-text message to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMessage {
    /// User sending the message.
    pub sender_id: String,
    /// Message text.
    pub text: String,
    /// Optional attachment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

/// Payload of one part in a multipart message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartPayload {
    /// Inline content.
    Content(String),
    /// A link to external content.
    Url(String),
    /// An uploaded attachment descriptor.
    Attachment(Value),
}

/// One part of a multipart message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagePart {
    /// MIME type, e.g. `text/plain`.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// The part's payload, flattened into the part object.
    #[serde(flatten)]
    pub payload: PartPayload,
}

impl MessagePart {
    /// An inline `text/plain` part.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            mime_type: "text/plain".into(),
            payload: PartPayload::Content(content.into()),
        }
    }

    /// A part referencing a URL.
    #[must_use]
    pub fn url(mime_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload: PartPayload::Url(url.into()),
        }
    }

    /// A part carrying an attachment descriptor.
    #[must_use]
    pub fn attachment(mime_type: impl Into<String>, attachment: Value) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload: PartPayload::Attachment(attachment),
        }
    }
}

/// Permission changes for a role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermissionsUpdate {
    /// Permissions to grant.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permissions_to_add: Vec<String>,
    /// Permissions to revoke.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permissions_to_remove: Vec<String>,
}
