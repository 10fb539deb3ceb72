use crate::model::{
    Acknowledgement, Envelope, LogEntry, PushRequest, ReceivedData, ReplyBody,
    Variant,
};
use crate::repository::request_log::RequestLog;
use actix_web::http::{Method, StatusCode};
use anyhow::{Context, Result};
use chrono::{Local, Utc};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

pub const INVALID_JSON: &str = "invalid JSON";
pub const INTERNAL_ERROR: &str = "internal server error";
pub const INCOMPLETE_BODY: &str = "incomplete request body";

/// Status and body of a reply, shaped after the configured [Variant].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub body:   ReplyBody,
}

#[derive(Debug)]
pub struct PushService {
    request_log: Arc<RequestLog>,
    variant:     Variant,
}

impl PushService {
    pub fn new(request_log: Arc<RequestLog>, variant: Variant) -> Self {
        Self { request_log, variant }
    }

    pub fn variant(&self) -> Variant { self.variant }

    /// Persist the request in the request log.
    #[instrument(level = "trace", skip(self))]
    pub async fn record(&self, request: PushRequest) -> Result<PushRequest> {
        let entry = LogEntry::new(Local::now(), request, self.variant);
        self.request_log.append(&entry).await.with_context(|| {
            format!(
                "Failed to record the push of order {:?}",
                entry.request.order_number
            )
        })?;
        Ok(entry.request)
    }

    pub fn success(&self, request: &PushRequest) -> Reply {
        let body = match self.variant {
            Variant::A => ReplyBody::Envelope(Envelope {
                code:      StatusCode::OK.as_u16(),
                msg:       "succeed".to_string(),
                data:      None,
                timestamp: unix_timestamp(),
                trace_id:  None,
            }),
            Variant::B => ReplyBody::Acknowledgement(Acknowledgement {
                code:          StatusCode::OK.as_u16(),
                message:       "success".to_string(),
                received_data: Some(ReceivedData::from(request)),
            }),
        };
        Reply { status: StatusCode::OK, body }
    }

    pub fn bad_request(&self) -> Reply {
        self.failure(StatusCode::BAD_REQUEST, INVALID_JSON.to_string(), None)
    }

    /// The body stream broke before it was fully received.
    pub fn incomplete_body(&self) -> Reply {
        self.failure(StatusCode::BAD_REQUEST, INCOMPLETE_BODY.to_string(), None)
    }

    /// The error itself stays in the logs, only its correlation id leaves.
    pub fn internal_error(&self, trace_id: Uuid) -> Reply {
        self.failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_ERROR.to_string(),
            Some(trace_id),
        )
    }

    pub fn unsupported(&self, method: &Method) -> Reply {
        self.failure(
            StatusCode::NOT_IMPLEMENTED,
            format!("unsupported method ('{method}')"),
            None,
        )
    }

    fn failure(
        &self,
        status: StatusCode,
        message: String,
        trace_id: Option<Uuid>,
    ) -> Reply {
        let body = match self.variant {
            Variant::A => ReplyBody::Envelope(Envelope {
                code:      status.as_u16(),
                msg:       message,
                data:      None,
                timestamp: unix_timestamp(),
                trace_id:  trace_id.map(|id| id.to_string()),
            }),
            Variant::B => ReplyBody::Acknowledgement(Acknowledgement {
                code:          status.as_u16(),
                message:       match trace_id {
                    Some(id) => format!("{message} (trace {id})"),
                    None => message,
                },
                received_data: None,
            }),
        };
        Reply { status, body }
    }
}

fn unix_timestamp() -> String { Utc::now().timestamp().to_string() }
