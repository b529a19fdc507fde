//! The status → outcome table shared by every backend.

use serde_json::Value;

use crate::error::{Error, Result};

/// Map a raw HTTP status and body to a decoded value or a typed error.
///
/// | status      | outcome                                   |
/// |-------------|-------------------------------------------|
/// | 200–299     | body parsed as JSON, else [`Error::Decode`] |
/// | 400         | [`Error::BadRequest`]                     |
/// | 401         | [`Error::BadAuth`]                        |
/// | 403         | [`Error::Forbidden`]                      |
/// | otherwise   | [`Error::UnexpectedStatus`]               |
pub fn map_response(status: u16, body: &str) -> Result<Value> {
    match status {
        200..=299 => serde_json::from_str(body).map_err(|source| Error::Decode {
            status,
            source,
            body: body.to_owned(),
        }),
        400 => Err(Error::BadRequest(body.to_owned())),
        401 => Err(Error::BadAuth(body.to_owned())),
        403 => Err(Error::Forbidden(body.to_owned())),
        _ => Err(Error::UnexpectedStatus {
            status,
            body: body.to_owned(),
        }),
    }
}
