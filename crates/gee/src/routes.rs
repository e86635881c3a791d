//! The demo route table served by `gee serve`.

use gee_router::{Context, Router, H};
use http::StatusCode;
use serde_json::json;

/// Build the demo router.
pub fn demo_router() -> Router {
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

    router.post("/login", |ctx: &mut Context| {
        let body = json!({
            "username": ctx.post_form("username"),
            "password": ctx.post_form("password"),
        });
        ctx.json(StatusCode::OK, &body);
    });

    router
}
