//! HTTP Middleware
//!
//! Layers shared by every router:
//! - CORS from a [`CorsConfig`]
//! - Request logging that stays quiet on health checks ([`TraceConfig`])
//! - A [`RequestStart`] timestamp handlers can extract
//!
//! [`standard_layers`] applies all three.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::body::Body;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, Method, Request, Response};
use axum::middleware::Next;
use kernel::error::app_error::AppError;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::{HttpMakeClassifier, MakeSpan, OnRequest, OnResponse, TraceLayer};
use tracing::Span;

const WILDCARD: &str = "*";

// =============================================================================
// CORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Allowed origins; `"*"` allows any origin
    pub origins: Vec<String>,
    pub methods: Vec<Method>,
    pub allow_credentials: bool,
    /// How long browsers may cache a preflight answer
    pub max_age: Duration,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            methods: vec![Method::GET, Method::POST, Method::OPTIONS],
            allow_credentials: true,
            max_age: Duration::from_secs(600),
        }
    }
}

impl CorsConfig {
    /// Config for a comma-separated origin list such as `FRONTEND_ORIGINS`
    pub fn from_origins(origins: &str) -> Self {
        Self {
            origins: origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            ..Self::default()
        }
    }

    fn allows_any_origin(&self) -> bool {
        self.origins.iter().any(|origin| origin == WILDCARD)
    }

    /// Build the layer.
    ///
    /// Browsers refuse `*` together with credentials, so a wildcard config
    /// that allows credentials echoes the caller's origin and headers instead.
    pub fn layer(&self) -> CorsLayer {
        let origin = match (self.allows_any_origin(), self.allow_credentials) {
            (true, true) => AllowOrigin::mirror_request(),
            (true, false) => AllowOrigin::any(),
            (false, _) => {
                let allowed: Vec<HeaderValue> = self
                    .origins
                    .iter()
                    .filter_map(|origin| match origin.parse() {
                        Ok(value) => Some(value),
                        Err(_) => {
                            tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                            None
                        }
                    })
                    .collect();
                AllowOrigin::list(allowed)
            }
        };

        let headers = if self.allow_credentials {
            AllowHeaders::mirror_request()
        } else {
            AllowHeaders::any()
        };

        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(AllowMethods::list(self.methods.iter().cloned()))
            .allow_headers(headers)
            .allow_credentials(self.allow_credentials)
            .max_age(self.max_age)
    }
}

// =============================================================================
// Request logging
// =============================================================================

#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// Path prefixes that are never logged
    pub quiet_prefixes: Vec<String>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            quiet_prefixes: vec!["/status".to_string()],
        }
    }
}

impl TraceConfig {
    pub fn is_quiet(&self, path: &str) -> bool {
        self.quiet_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub fn layer(&self) -> RequestTraceLayer {
        let config = Arc::new(self.clone());
        TraceLayer::new_for_http()
            .make_span_with(RequestSpan {
                config: config.clone(),
            })
            .on_request(LogRequest { config })
            .on_response(LogResponse)
    }
}

pub type RequestTraceLayer = TraceLayer<HttpMakeClassifier, RequestSpan, LogRequest, LogResponse>;

/// One `request` span per call; quiet paths get no span at all.
#[derive(Debug, Clone)]
pub struct RequestSpan {
    config: Arc<TraceConfig>,
}

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        if self.config.is_quiet(request.uri().path()) {
            return Span::none();
        }
        tracing::info_span!("request", method = %request.method(), uri = %request.uri())
    }
}

#[derive(Debug, Clone)]
pub struct LogRequest {
    config: Arc<TraceConfig>,
}

impl<B> OnRequest<B> for LogRequest {
    fn on_request(&mut self, request: &Request<B>, _span: &Span) {
        if self.config.is_quiet(request.uri().path()) {
            return;
        }
        let direct = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());
        let ip = client_ip(request.headers(), direct);

        tracing::info!(
            method = %request.method(),
            client_ip = ?ip,
            uri = %request.uri(),
            "Request"
        );
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LogResponse;

impl<B> OnResponse<B> for LogResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        if span.is_none() {
            return;
        }
        tracing::debug!(
            status = response.status().as_u16(),
            latency_ms = latency.as_millis() as u64,
            "Response"
        );
    }
}

/// Best guess at the caller's address.
///
/// Precedence: first `X-Forwarded-For` entry, then `X-Real-IP`, then the
/// socket peer.
pub fn client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse().ok());
    if forwarded.is_some() {
        return forwarded;
    }

    let real = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|ip| ip.trim().parse().ok());
    real.or(direct_ip)
}

// =============================================================================
// Request start time
// =============================================================================

/// When the request entered the stack.
#[derive(Debug, Clone, Copy)]
pub struct RequestStart(pub Instant);

impl RequestStart {
    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// Stamp the request with a [`RequestStart`]. Use with `axum::middleware::from_fn`.
pub async fn record_request_start(mut req: Request<Body>, next: Next) -> axum::response::Response {
    req.extensions_mut().insert(RequestStart(Instant::now()));
    next.run(req).await
}

impl<S> FromRequestParts<S> for RequestStart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<RequestStart>().copied().ok_or_else(|| {
            tracing::error!("RequestStart missing; record_request_start is not layered");
            AppError::internal("Request start time was not recorded")
        })
    }
}

// =============================================================================
// Composition
// =============================================================================

/// Start time innermost, then logging, then CORS on the outside so preflights
/// are answered before anything else runs.
pub fn standard_layers<S>(router: Router<S>, cors: &CorsConfig, trace: &TraceConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(axum::middleware::from_fn(record_request_start))
        .layer(trace.layer())
        .layer(cors.layer())
}
