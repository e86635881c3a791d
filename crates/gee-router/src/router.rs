use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use http::{Method, StatusCode};
use thiserror::Error;

use crate::context::{Context, Params};
use crate::pattern::{parse_pattern, validate_pattern, PatternError, Segment};
use crate::trie::Node;

/// A route handler.
pub type HandlerFunc = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// Errors from [`Router::try_add_route`].
#[derive(Debug, Error)]
pub enum RouteError {
    /// The pattern would be altered by parsing.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// The method is not a valid HTTP method token.
    #[error("invalid HTTP method: {0:?}")]
    InvalidMethod(String),
}

/// Identity of a registered route: method plus the pattern as registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub method: String,
    pub pattern: String,
}

impl RouteKey {
    pub fn new(method: &str, pattern: &str) -> Self {
        Self {
            method: method.to_uppercase(),
            pattern: pattern.to_string(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.method, self.pattern)
    }
}

/// Maps (method, path) pairs to handlers.
///
/// One trie per method. Routes are registered up front and the router is
/// read-only while serving; wrap it in an `Arc` to share it across tasks.
#[derive(Default)]
pub struct Router {
    roots: HashMap<String, Node>,
    handlers: HashMap<RouteKey, HandlerFunc>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("roots", &self.roots)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Router {
    /// Create a new empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` and `pattern`.
    ///
    /// Registering the same pair again replaces the handler. Segments after
    /// a wildcard are dropped; use [`Router::try_add_route`] to reject such
    /// patterns instead.
    pub fn add_route<F>(&mut self, method: &str, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        if let Err(err) = validate_pattern(pattern) {
            tracing::warn!(method, pattern, error = %err, "route pattern registered as parsed");
        }
        self.insert(method, pattern, Arc::new(handler));
    }

    /// Like [`Router::add_route`], but rejects patterns the parser would
    /// silently alter and malformed method tokens.
    pub fn try_add_route<F>(
        &mut self,
        method: &str,
        pattern: &str,
        handler: F,
    ) -> Result<(), RouteError>
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        Method::from_bytes(method.as_bytes())
            .map_err(|_| RouteError::InvalidMethod(method.to_string()))?;
        validate_pattern(pattern)?;
        self.insert(method, pattern, Arc::new(handler));
        Ok(())
    }

    /// Register a `GET` route.
    pub fn get<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route("GET", pattern, handler);
    }

    /// Register a `POST` route.
    pub fn post<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route("POST", pattern, handler);
    }

    fn insert(&mut self, method: &str, pattern: &str, handler: HandlerFunc) {
        let key = RouteKey::new(method, pattern);
        let parts = parse_pattern(pattern);

        self.roots
            .entry(key.method.clone())
            .or_default()
            .insert(pattern, &parts, 0);

        tracing::debug!(route = %key, "route registered");
        self.handlers.insert(key, handler);
    }

    /// Find the route for a request, binding its path parameters.
    ///
    /// Returns `None` when nothing registered under `method` accepts `path`.
    pub fn get_route(&self, method: &str, path: &str) -> Option<(&Node, Params)> {
        let search_parts = parse_pattern(path);
        let root = self.roots.get(&method.to_uppercase())?;
        let node = root.search(&search_parts, 0)?;

        let mut params = Params::new();
        for (index, part) in parse_pattern(node.pattern()).into_iter().enumerate() {
            let Some(value) = search_parts.get(index) else {
                break;
            };
            match Segment::classify(part) {
                Segment::Static(_) => {}
                Segment::Param(name) => {
                    params.insert(name.to_string(), value.to_string());
                }
                Segment::Wildcard(name) => {
                    if !name.is_empty() {
                        params.insert(name.to_string(), search_parts[index..].join("/"));
                    }
                    break;
                }
            }
        }

        Some((node, params))
    }

    /// Every route terminus registered under `method`.
    pub fn get_routes(&self, method: &str) -> Vec<&Node> {
        let mut nodes = Vec::new();
        if let Some(root) = self.roots.get(&method.to_uppercase()) {
            root.travel(&mut nodes);
        }
        nodes
    }

    /// Dispatch a request to its handler, or answer 404.
    pub fn handle(&self, ctx: &mut Context) {
        let matched = self
            .get_route(&ctx.method, &ctx.path)
            .and_then(|(node, params)| {
                let key = RouteKey::new(&ctx.method, node.pattern());
                self.handlers.get(&key).map(|handler| (key, handler, params))
            });

        match matched {
            Some((key, handler, params)) => {
                tracing::debug!(route = %key, path = %ctx.path, "route matched");
                ctx.params = params;
                handler(ctx);
            }
            None => {
                tracing::debug!(method = %ctx.method, path = %ctx.path, "no route matched");
                let body = format!("404 NOT FOUND: {}\n", ctx.path);
                ctx.string(StatusCode::NOT_FOUND, &body);
            }
        }
    }
}
