//! The uniform response envelope shared by every endpoint.

use serde::Serialize;

use crate::context::RequestContext;
use crate::forms::FieldErrors;
use crate::pagination::Meta;
use crate::services::ServiceError;

/// Error details: a field → message map for validation failures, otherwise a
/// single description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Fields(FieldErrors),
    Message(String),
}

/// `{code, status, message?, data?, meta?, errors?, trace_id}`.
///
/// `trace_id` is always serialized; it is empty when the request carried no
/// trace id.
#[derive(Debug, Clone, Serialize)]
pub struct Response<T = ()> {
    pub code: u16,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorDetail>,
    pub trace_id: String,
}

/// Upper-case status label paired with an HTTP code.
pub const fn status_label(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "CREATED",
        400 => "BAD REQUEST",
        404 => "NOT FOUND",
        _ => "INTERNAL SERVER ERROR",
    }
}

impl<T> Response<T> {
    fn with_code(code: u16) -> Self {
        Self {
            code,
            status: status_label(code),
            message: None,
            data: None,
            meta: None,
            errors: None,
            trace_id: String::new(),
        }
    }

    pub fn ok(data: T) -> Self {
        Self::with_code(200).with_data(data)
    }

    pub fn created(data: T) -> Self {
        Self::with_code(201).with_data(data)
    }

    #[must_use]
    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Option<Meta>) -> Self {
        self.meta = meta;
        self
    }

    /// Completes the envelope with the trace id of `ctx`.
    #[must_use]
    pub fn finish(mut self, ctx: &RequestContext) -> Self {
        attach_trace(ctx, &mut self);
        self
    }
}

impl Response<()> {
    /// Error envelope: `message` carries the error kind, `errors` the details.
    pub fn from_error(err: &ServiceError) -> Self {
        let errors = match err.field_errors() {
            Some(fields) => ErrorDetail::Fields(fields),
            None => ErrorDetail::Message(err.to_string()),
        };
        let mut response = Self::with_code(err.http_status()).with_message(err.kind());
        response.errors = Some(errors);
        response
    }
}

/// Populates `response.trace_id` from `ctx`, or the empty string.
pub fn attach_trace<T>(ctx: &RequestContext, response: &mut Response<T>) {
    response.trace_id = ctx.trace_id().unwrap_or_default().to_string();
}
