use axum::{
    Extension,
    extract::{MatchedPath, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use super::{ApiError, AppState};
use crate::domain::{Caller, Capability, authorize};

/// GET /metrics
/// Prometheus text exposition (staff only)
pub async fn get_metrics(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<String, ApiError> {
    authorize(&caller, Capability::ViewMetrics)?;

    Ok(state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    ))
}

const REQUEST_ID_HEADER: &str = "x-request-id";

/// How a finished request is reported. Refusals from the access gate are
/// counted apart from other client errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestOutcome {
    Success,
    Denied,
    ClientError,
    ServerError,
}

impl RequestOutcome {
    fn from_status(status: StatusCode) -> Self {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Self::Denied
        } else if status.is_server_error() {
            Self::ServerError
        } else if status.is_client_error() {
            Self::ClientError
        } else {
            Self::Success
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Denied => "denied",
            Self::ClientError => "client_error",
            Self::ServerError => "error",
        }
    }
}

/// Keep a caller-supplied request id when it is short printable ASCII,
/// otherwise mint one.
fn request_id_for(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= 64 && id.bytes().all(|b| b.is_ascii_graphic()))
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string)
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = request_id_for(req.headers());
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string());

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        route = route.clone(),
        user_id = tracing::field::Empty,
    );

    async move {
        let mut response = next.run(req).await;

        let elapsed = start.elapsed();
        let status = response.status();
        let outcome = RequestOutcome::from_status(status);

        // Label by route template; raw paths carry loan and user ids
        let labels = [
            ("method", method.to_string()),
            ("path", route.unwrap_or(path)),
            ("status", status.as_u16().to_string()),
            ("outcome", outcome.as_str().to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(elapsed.as_secs_f64());

        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        if outcome == RequestOutcome::ServerError {
            warn!(
                duration_ms,
                status_code = status.as_u16(),
                outcome = outcome.as_str(),
                "Request failed"
            );
        } else {
            info!(
                duration_ms,
                status_code = status.as_u16(),
                outcome = outcome.as_str(),
                "Request finished"
            );
        }

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        response
    }
    .instrument(span)
    .await
}

pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert("cache-control", HeaderValue::from_static("no-store"));

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_separates_denials() {
        assert_eq!(
            RequestOutcome::from_status(StatusCode::CREATED),
            RequestOutcome::Success
        );
        assert_eq!(
            RequestOutcome::from_status(StatusCode::FORBIDDEN),
            RequestOutcome::Denied
        );
        assert_eq!(
            RequestOutcome::from_status(StatusCode::UNAUTHORIZED),
            RequestOutcome::Denied
        );
        assert_eq!(
            RequestOutcome::from_status(StatusCode::NOT_FOUND),
            RequestOutcome::ClientError
        );
        assert_eq!(
            RequestOutcome::from_status(StatusCode::INTERNAL_SERVER_ERROR).as_str(),
            "error"
        );
    }

    #[test]
    fn test_request_id_reuses_clean_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(request_id_for(&headers), "abc-123");

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("has space"));
        let minted = request_id_for(&headers);
        assert!(Uuid::parse_str(&minted).is_ok());

        assert!(Uuid::parse_str(&request_id_for(&HeaderMap::new())).is_ok());
    }
}
