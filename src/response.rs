use actix_web::{http::StatusCode, HttpResponse};
use serde::{Deserialize, Serialize};

/// The uniform body of every response, successful or not.
///
/// `status` repeats the HTTP status code so clients that only look at the body still see it.
/// `data` is `null` when there is nothing to return.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data,
        }
    }

    /// Builds an `HttpResponse` carrying `data`.
    pub fn respond(status: StatusCode, message: impl Into<String>, data: T) -> HttpResponse {
        HttpResponse::build(status).json(Self::new(status, message, Some(data)))
    }

    /// Builds an `HttpResponse` whose `data` is `null`.
    pub fn empty(status: StatusCode, message: impl Into<String>) -> HttpResponse {
        HttpResponse::build(status).json(Self::new(status, message, None))
    }
}
