//! Segment-trie HTTP request router.
//!
//! Route patterns are split on `/` into segments and inserted into one trie
//! per HTTP method. `:name` segments bind a single path segment, `*name`
//! segments bind the rest of the path. At each depth literal segments win
//! over parameters, and parameters over wildcards.
//!
//! ```
//! use gee_router::{Context, Router};
//! use http::StatusCode;
//!
//! let mut router = Router::new();
//! router.get("/p/:lang/doc", |ctx: &mut Context| {
//!     let body = format!("doc for {}", ctx.param("lang"));
//!     ctx.string(StatusCode::OK, &body);
//! });
//!
//! let (node, params) = router.get_route("GET", "/p/go/doc").unwrap();
//! assert_eq!(node.pattern(), "/p/:lang/doc");
//! assert_eq!(params["lang"], "go");
//! ```

pub mod context;
pub mod pattern;
pub mod router;
pub mod trie;

pub use context::{Context, Params, ResponseWriter, H};
pub use pattern::{parse_pattern, validate_pattern, PatternError, Segment};
pub use router::{HandlerFunc, RouteError, RouteKey, Router};
pub use trie::Node;
