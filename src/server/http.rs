//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo, one task per connection. Routing is a plain
//! match on method and path; the router is generic over the request body so it
//! can be driven without a socket.

use bytes::Bytes;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Body;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW,
};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::Args;
use crate::routes::{self, error_response, json_response};
use crate::services::FishService;
use crate::store::CatalogStore;
use crate::types::{FishdexError, Result};

/// Largest accepted request body; catch photos may arrive as data URIs
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub fish: FishService,
    pub started_at: Instant,
}

impl AppState {
    /// Build state around an already-opened store
    pub fn new(args: Args, store: Arc<dyn CatalogStore>) -> Self {
        let fish = FishService::new(store)
            .with_list_limit(args.list_limit)
            .with_strict_unlock(args.strict_unlock);

        Self {
            args,
            fish,
            started_at: Instant::now(),
        }
    }
}

/// Start the HTTP server and serve until `shutdown` resolves
pub async fn run(state: Arc<AppState>, shutdown: impl Future<Output = ()>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "fishdex listening on {} (storage: {})",
        state.args.listen,
        state.fish.backend()
    );

    if state.args.dev_mode {
        warn!("Development mode enabled");
    }

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    let state = Arc::clone(&state);
                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);

                        let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                            let state = Arc::clone(&state);
                            async move {
                                info!("[{}] {} {}", addr, req.method(), req.uri().path());
                                Ok::<_, Infallible>(route(&state, req).await)
                            }
                        });

                        if let Err(err) = http1::Builder::new()
                            .serve_connection(io, service)
                            .await
                        {
                            error!("Error serving connection from {}: {:?}", addr, err);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {:?}", e);
                }
            },
            _ = &mut shutdown => {
                info!("Stopped accepting connections");
                break;
            }
        }
    }

    Ok(())
}

/// Parsed `/api/fish...` route
#[derive(Debug, PartialEq, Eq)]
enum FishRoute<'a> {
    List,
    One(&'a str),
    Unlock(&'a str),
    Catches(&'a str),
}

impl<'a> FishRoute<'a> {
    fn parse(path: &'a str) -> Option<Self> {
        let rest = path.strip_prefix("/api/fish")?;
        let rest = match rest {
            "" | "/" => return Some(Self::List),
            r => r.strip_prefix('/')?,
        };

        let mut parts = rest.trim_end_matches('/').splitn(2, '/');
        let id = parts.next().filter(|s| !s.is_empty())?;

        match parts.next() {
            None => Some(Self::One(id)),
            Some("unlock") => Some(Self::Unlock(id)),
            Some("catches") => Some(Self::Catches(id)),
            Some(_) => None,
        }
    }
}

/// Route one request to its handler
pub async fn route<B>(state: &AppState, req: Request<B>) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let fish = &state.fish;

    match (method, FishRoute::parse(&path)) {
        (Method::OPTIONS, _) => preflight_response(),

        (Method::GET, Some(FishRoute::List)) => routes::handle_list_fish(fish).await,
        (Method::GET, Some(FishRoute::One(id))) => routes::handle_get_fish(fish, id).await,
        (Method::GET, Some(FishRoute::Catches(id))) => routes::handle_catches(fish, id).await,
        (Method::POST, Some(FishRoute::Unlock(id))) => {
            let body = match read_body(req.into_body()).await {
                Ok(b) => b,
                Err(e) => return error_response(&e),
            };
            routes::handle_unlock(fish, id, &body).await
        }

        (Method::GET, None) => match path.as_str() {
            "/api/stats" => routes::handle_stats(fish).await,
            "/health" | "/healthz" => routes::health_check(state),
            _ => not_found_response(&path),
        },

        (method, parsed) if parsed.is_some() || is_read_only_path(&path) => {
            debug!("{} not allowed on {}", method, path);
            method_not_allowed_response()
        }

        _ => not_found_response(&path),
    }
}

/// Paths that only answer GET
fn is_read_only_path(path: &str) -> bool {
    matches!(path, "/api/stats" | "/health" | "/healthz")
}

async fn read_body<B>(body: B) -> Result<Bytes>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Limited::new(body, MAX_BODY_BYTES)
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|e| FishdexError::BadRequest(format!("Failed to read request body: {}", e)))
}

/// CORS preflight response
fn preflight_response() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
    response
}

/// Not found response
fn not_found_response(path: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": "Not Found",
        "code": "NOT_FOUND",
        "path": path,
    });
    json_response(StatusCode::NOT_FOUND, &body)
}

fn method_not_allowed_response() -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": "Method Not Allowed",
        "code": "METHOD_NOT_ALLOWED",
    });
    let mut response = json_response(StatusCode::METHOD_NOT_ALLOWED, &body);
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    response
}
