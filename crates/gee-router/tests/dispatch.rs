//! End-to-end dispatch through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use bytes::Bytes;
use gee_router::{Context, Router, H};
use http::header::CONTENT_TYPE;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;

fn request(method: Method, uri: &str) -> Context {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Bytes::new())
        .expect("valid request");
    Context::new(request)
}

fn demo_router() -> Router {
    let mut router = Router::new();
    router.get("/", |ctx: &mut Context| {
        ctx.html(StatusCode::OK, "<h1>Hello Gee</h1>");
    });
    router.get("/hello", |ctx: &mut Context| {
        let body = format!("hello {}, you're at {}\n", ctx.query("name"), ctx.path);
        ctx.string(StatusCode::OK, &body);
    });
    router.get("/hello/:name", |ctx: &mut Context| {
        let body = format!("hello {}, you're at {}\n", ctx.param("name"), ctx.path);
        ctx.string(StatusCode::OK, &body);
    });
    router.get("/assets/*filepath", |ctx: &mut Context| {
        let mut h = H::new();
        h.insert("filepath".to_string(), ctx.param("filepath").into());
        ctx.json(StatusCode::OK, &h);
    });
    router
}

async fn body_of(ctx: Context) -> (StatusCode, Option<String>, Bytes) {
    let response = ctx.into_response();
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response
        .into_body()
        .collect()
        .await
        .expect("infallible body")
        .to_bytes();
    (status, content_type, body)
}

#[tokio::test]
async fn serves_html_root() {
    let router = demo_router();
    let mut ctx = request(Method::GET, "/");
    router.handle(&mut ctx);
    let (status, content_type, body) = body_of(ctx).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/html"));
    assert_eq!(&body[..], b"<h1>Hello Gee</h1>");
}

#[test]
fn serves_query_and_params() {
    let router = demo_router();

    let mut ctx = request(Method::GET, "/hello?name=geektutu");
    router.handle(&mut ctx);
    assert_eq!(ctx.writer().body(), b"hello geektutu, you're at /hello\n");

    let mut ctx = request(Method::GET, "/hello/geektutu");
    router.handle(&mut ctx);
    assert_eq!(ctx.writer().body(), b"hello geektutu, you're at /hello/geektutu\n");
}

#[tokio::test]
async fn binds_decoded_segments() {
    let router = demo_router();

    let mut ctx = request(Method::GET, "/hello/gee%20tutu");
    router.handle(&mut ctx);
    assert_eq!(ctx.param("name"), "gee tutu");
    assert_eq!(ctx.writer().body(), b"hello gee tutu, you're at /hello/gee tutu\n");

    let mut ctx = request(Method::GET, "/missing/gee%20tutu");
    router.handle(&mut ctx);
    let (status, _, body) = body_of(ctx).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(&body[..], b"404 NOT FOUND: /missing/gee tutu\n");
}

#[tokio::test]
async fn serves_wildcard_as_json() {
    let router = demo_router();
    let mut ctx = request(Method::GET, "/assets/css/geektutu.css");
    router.handle(&mut ctx);
    let (status, content_type, body) = body_of(ctx).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let value: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(value["filepath"], "css/geektutu.css");
}

#[tokio::test]
async fn unmatched_request_is_404_naming_path() {
    let router = demo_router();
    let mut ctx = request(Method::POST, "/hello/geektutu");
    router.handle(&mut ctx);
    let (status, content_type, body) = body_of(ctx).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type.as_deref(), Some("text/plain"));
    assert_eq!(&body[..], b"404 NOT FOUND: /hello/geektutu\n");
}

#[test]
fn shared_router_serves_concurrently() {
    let hits = Arc::new(AtomicUsize::new(0));
    let mut router = Router::new();
    let counter = Arc::clone(&hits);
    router.get("/items/:id", move |ctx: &mut Context| {
        counter.fetch_add(1, Ordering::Relaxed);
        let body = ctx.param("id").to_string();
        ctx.string(StatusCode::OK, &body);
    });
    let router = Arc::new(router);

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                let mut ctx = request(Method::GET, &format!("/items/{i}"));
                router.handle(&mut ctx);
                assert_eq!(ctx.writer().body(), i.to_string().as_bytes());
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker panicked");
    }

    assert_eq!(hits.load(Ordering::Relaxed), 8);
}
