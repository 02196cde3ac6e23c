//! Response helpers shared by the handlers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Serialize)]
pub struct MessageWithData<T> {
    pub message: String,
    pub data: T,
}

pub fn message(text: impl Into<String>) -> (StatusCode, Json<MessageBody>) {
    (
        StatusCode::OK,
        Json(MessageBody {
            message: text.into(),
        }),
    )
}

pub fn message_with_data<T: Serialize>(
    text: impl Into<String>,
    data: T,
) -> (StatusCode, Json<MessageWithData<T>>) {
    (
        StatusCode::OK,
        Json(MessageWithData {
            message: text.into(),
            data,
        }),
    )
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}
