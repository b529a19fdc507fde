#![doc = include_str!("../README.md")]

pub mod client;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod response;
pub mod token;
pub mod transport;
pub mod types;

// Re-export core public API at crate root.
pub use client::{ApiCall, Auth, ChatKit, ChatKitBuilder, MAX_PAGE_SIZE};
pub use credentials::{ApiKey, InstanceLocator};
pub use endpoint::{Endpoints, Query, QueryValue, Service};
pub use error::{Error, Result};
pub use response::map_response;
pub use token::{AuthenticationResponse, Claims, TOKEN_TTL_SECS, Token, TokenGenerator};
#[cfg(feature = "blocking")]
pub use transport::BlockingBackend;
pub use transport::{Backend, Method, REQUEST_TIMEOUT, Request};
#[cfg(feature = "async")]
pub use transport::{AsyncBackend, PendingResponse};
pub use types::{
    Attachment, AttachmentKind, Direction, ListRoomsOptions, ListUsersOptions, MessagePart,
    NewMessage, NewRoom, NewUser, PartPayload, PermissionsUpdate, RoleScope, RoomMessagesOptions,
    RoomUpdate, UserUpdate,
};

// Re-export standalone functions.
pub use client::init_logger;
