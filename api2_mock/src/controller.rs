use crate::model::PushRequest;
use crate::service::push::PushService;
use serde_json::Value;
use tracing::{info, trace};

#[derive(thiserror::Error, Debug)]
pub enum ControllerError {
    #[error("The body is not valid UTF-8 JSON")]
    MalformedPayload(#[from] serde_json::Error),
    #[error(transparent)]
    InternalFailure(#[from] anyhow::Error),
}

/// Decode a push body, log what it carries and record it.
pub async fn receive_push(
    body: &[u8],
    push: &PushService,
) -> Result<PushRequest, ControllerError> {
    let document: Value = serde_json::from_slice(body)?;
    info!(
        "Request body: {}",
        serde_json::to_string_pretty(&document)
            .unwrap_or_else(|_| document.to_string())
    );

    let request = PushRequest::from_json(&document, push.variant())?;
    info!("Order number: {}", request.order_number);
    info!("File URL: {}", request.file_url);

    let request = push.record(request).await?;
    trace!("Recorded push of order {:?}", request.order_number);
    Ok(request)
}
