//! Serving loop: bridges hyper connections to the router.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use gee_router::{Context, ResponseWriter, Router};
use gee_telemetry::{log_connection_error, log_listening, log_request_completed};
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

/// Dispatch one request through the router.
pub async fn handle_request(
    router: Arc<Router>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            log_connection_error!(path = %parts.uri.path(), error = %e, "failed to read request body");
            return Ok(bad_request("failed to read request body"));
        }
    };

    let mut ctx = Context::new(Request::from_parts(parts, body));
    router.handle(&mut ctx);

    log_request_completed!(
        method = %ctx.method,
        path = %ctx.path,
        status = ctx.status_code().unwrap_or(StatusCode::OK).as_u16(),
        duration_us = micros(started.elapsed())
    );
    Ok(ctx.into_response())
}

/// Whole microseconds, saturating at `u64::MAX`.
fn micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

fn bad_request(message: &str) -> Response<Full<Bytes>> {
    let mut writer = ResponseWriter::new();
    writer.set_header(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    writer.write_header(StatusCode::BAD_REQUEST);
    writer.write(message.as_bytes());
    writer.into_response()
}

/// Accept connections on `addr` until ctrl-c.
pub async fn run(router: Arc<Router>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    log_listening!(address = %addr);

    loop {
        let (stream, remote) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    log_connection_error!(error = %e, "accept failed");
                    continue;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                return Ok(());
            }
        };

        let router = Arc::clone(&router);
        let io = TokioIo::new(stream);

        tokio::spawn(async move {
            let service = service_fn(move |req| handle_request(Arc::clone(&router), req));

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                log_connection_error!(remote = %remote, error = %e, "connection error");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn micros_saturates() {
        assert_eq!(micros(Duration::from_millis(3)), 3_000);
        assert_eq!(micros(Duration::MAX), u64::MAX);
    }

    #[test]
    fn bad_request_is_plain_text() {
        let response = bad_request("nope");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }
}
