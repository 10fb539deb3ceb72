use crate::model::{PushRequest, ReplyStatus, Variant};
use reqwest::header::ACCEPT;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;
use tracing::{debug, instrument};

/// How long the order-fulfilment side waits for API2.
pub const PUSH_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Failed to build the HTTP client")]
    Build(#[from] reqwest::Error),
    #[error("Failed to push to {url}")]
    Transport {
        url:    String,
        #[source]
        source: reqwest_middleware::Error,
    },
    #[error("API2 answered with something else than its JSON reply: {body:?}")]
    UnexpectedReply {
        body:   String,
        #[source]
        source: serde_json::Error,
    },
    #[error("API2 answered with code {code}: {message}")]
    Rejected { code: u16, message: String, body: String },
}

/// A reply with code 200, along with its raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReply {
    pub code:    u16,
    pub message: String,
    pub body:    String,
}

/// Pushes order numbers and file URLs to an API2 endpoint.
#[derive(Debug, Clone)]
pub struct Api2Client {
    http:    ClientWithMiddleware,
    url:     String,
    variant: Variant,
}

impl Api2Client {
    pub fn new(
        url: impl Into<String>,
        variant: Variant,
    ) -> Result<Self, ClientError> {
        let http = ClientBuilder::new(
            reqwest::Client::builder().timeout(PUSH_TIMEOUT).build()?,
        )
        .with(TracingMiddleware::default())
        .build();

        Ok(Self { http, url: url.into(), variant })
    }

    #[instrument(level = "debug", skip(self), fields(url = self.url))]
    pub async fn push(
        &self,
        order_number: &str,
        file_url: &str,
    ) -> Result<PushReply, ClientError> {
        let request = PushRequest {
            order_number: order_number.to_string(),
            file_url:     file_url.to_string(),
        };

        let transport = |source| ClientError::Transport {
            url: self.url.clone(),
            source,
        };
        let response = self
            .http
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .json(&request.wire(self.variant))
            .send()
            .await
            .map_err(transport)?;
        let body = response
            .text()
            .await
            .map_err(|err| transport(reqwest_middleware::Error::from(err)))?;
        debug!("API2 answered {}", body);

        let status: ReplyStatus = match serde_json::from_str(&body) {
            Ok(status) => status,
            Err(source) => {
                return Err(ClientError::UnexpectedReply { body, source })
            }
        };
        if status.code != 200 {
            return Err(ClientError::Rejected {
                code: status.code,
                message: status.msg,
                body,
            });
        }

        Ok(PushReply { code: status.code, message: status.msg, body })
    }
}
