//! Benchmarks for the segment-trie router.
//!
//! Run with: cargo bench -p gee-router

use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use http::{Request, StatusCode};

use gee_router::{Context, Router};

fn noop(_: &mut Context) {}

/// Literal, param and wildcard siblings at one depth, registered in the
/// reverse of their matching priority.
fn contested_router() -> Router {
    let mut router = Router::new();
    router.get("/users/*rest", noop);
    router.get("/users/:id", noop);
    router.get("/users/:id/posts/:post", noop);
    router.get("/users/me", noop);
    router.get("/users/me/settings", noop);
    router
}

fn bench_precedence(c: &mut Criterion) {
    let router = contested_router();
    let mut group = c.benchmark_group("precedence");

    for (name, path) in [
        ("literal", "/users/me"),
        ("param", "/users/42"),
        ("param_backtrack", "/users/me/posts/7"),
        ("wildcard_fallback", "/users/42/friends/all"),
        ("miss", "/teams/42"),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &path, |b, path| {
            b.iter(|| black_box(router.get_route("GET", path)));
        });
    }

    group.finish();
}

fn bench_wildcard_depth(c: &mut Criterion) {
    let mut router = Router::new();
    router.get("/static/*filepath", noop);
    let mut group = c.benchmark_group("wildcard_join");

    for depth in [1usize, 4, 16, 64] {
        let path = format!(
            "/static/{}",
            (0..depth).map(|i| format!("d{i}")).collect::<Vec<_>>().join("/")
        );
        group.bench_with_input(BenchmarkId::from_parameter(depth), &path, |b, path| {
            b.iter(|| black_box(router.get_route("GET", path)));
        });
    }

    group.finish();
}

fn bench_handle(c: &mut Criterion) {
    let mut router = Router::new();
    router.get("/p/:lang/doc", |ctx: &mut Context| {
        let body = format!("doc for {}", ctx.param("lang"));
        ctx.string(StatusCode::OK, &body);
    });
    let mut group = c.benchmark_group("handle");

    for (name, uri) in [("matched", "/p/go/doc"), ("not_found", "/p/go/missing")] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &uri, |b, uri| {
            b.iter(|| {
                let request = Request::builder()
                    .uri(*uri)
                    .body(Bytes::new())
                    .expect("valid request");
                let mut ctx = Context::new(request);
                router.handle(&mut ctx);
                black_box(ctx.into_response())
            });
        });
    }

    group.finish();
}

fn bench_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("registration");

    for route_count in [16usize, 256] {
        group.bench_with_input(
            BenchmarkId::from_parameter(route_count),
            &route_count,
            |b, &count| {
                b.iter(|| {
                    let mut router = Router::new();
                    for i in 0..count {
                        router.get(&format!("/v{}/items/:id/part{}", i % 4, i), noop);
                    }
                    black_box(router)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_precedence,
    bench_wildcard_depth,
    bench_handle,
    bench_registration
);
criterion_main!(benches);
