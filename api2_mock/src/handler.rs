use crate::controller::{self, ControllerError};
use crate::service::push::{PushService, Reply};
use actix_web::http::header::ContentType;
use actix_web::http::Method;
use actix_web::middleware::DefaultHeaders;
use actix_web::error::PayloadError;
use actix_web::web::{self, BytesMut, Data, Payload};
use actix_web::{HttpRequest, HttpResponse};
use futures::StreamExt;
use tracing::{error, info, warn};
use uuid::Uuid;

/// CORS headers sent with every response.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "POST, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type"))
}

/// Every path answers POST and OPTIONS, other methods get a 501.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{tail:.*}")
            .route(web::post().to(post_push))
            .route(web::method(Method::OPTIONS).to(preflight))
            .default_service(web::to(unsupported)),
    );
}

fn respond(reply: Reply) -> HttpResponse {
    HttpResponse::build(reply.status).json(reply.body)
}

/// Collect the whole body, however large it is.
async fn read_body(
    mut payload: Payload,
) -> Result<BytesMut, PayloadError> {
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        body.extend_from_slice(&chunk?);
    }
    Ok(body)
}

/// Receive the order number and file URL of a push request.
pub async fn post_push(
    req: HttpRequest,
    payload: Payload,
    push: Data<PushService>,
) -> HttpResponse {
    info!("Received POST request: {}", req.path());

    let body = match read_body(payload).await {
        Ok(body) => body,
        Err(err) => {
            warn!("Failed to read the request body: {}", err);
            return respond(push.incomplete_body());
        }
    };

    let reply = match controller::receive_push(&body, &push).await {
        Ok(request) => push.success(&request),
        Err(ControllerError::MalformedPayload(err)) => {
            warn!("Invalid JSON payload: {}", err);
            push.bad_request()
        }
        Err(ControllerError::InternalFailure(err)) => {
            let trace_id = Uuid::new_v4();
            error!(
                "Failed to handle the push request ({}): {:?}",
                trace_id, err
            );
            push.internal_error(trace_id)
        }
    };

    respond(reply)
}

/// CORS preflight.
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::json()).finish()
}

pub async fn unsupported(
    req: HttpRequest,
    push: Data<PushService>,
) -> HttpResponse {
    warn!("Unsupported {} request on {}", req.method(), req.path());
    respond(push.unsupported(req.method()))
}
