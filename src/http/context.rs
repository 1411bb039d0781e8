//! Named route containers for the main and admin listeners.

use std::collections::{BTreeMap, BTreeSet};

use axum::{routing::MethodRouter, Router};

use crate::error::EnvironmentError;

/// An independently configurable set of routes served on one listener.
///
/// axum panics on malformed or conflicting paths; the checks here turn those
/// cases into `InvalidArgument` errors at registration time instead.
pub struct ContextHandler {
    name: &'static str,
    router: Router,
    routes: BTreeSet<String>,
    /// Route paths with every capture name erased.
    shapes: BTreeSet<String>,
    /// Capture name in use below each erased prefix.
    captures: BTreeMap<String, String>,
    nests: BTreeSet<String>,
}

/// One `/`-separated piece of a route path.
#[derive(Debug, PartialEq)]
enum Segment<'a> {
    Static(&'a str),
    /// `{name}` or `{*name}`; holds the text between the braces.
    Capture(&'a str),
}

impl ContextHandler {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            router: Router::new(),
            routes: BTreeSet::new(),
            shapes: BTreeSet::new(),
            captures: BTreeMap::new(),
            nests: BTreeSet::new(),
        }
    }

    /// Context name (`main` or `admin`), used in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Add a route at an exact path.
    pub fn route(&mut self, path: &str, method_router: MethodRouter) -> Result<(), EnvironmentError> {
        validate_path(self.name, path)?;
        let segments = parse_segments(self.name, path)?;

        let shape = shape_of(&segments);
        if self.shapes.contains(&shape) {
            return Err(self.conflict(path));
        }
        if self.nests.iter().any(|prefix| is_under(path, prefix)) {
            return Err(self.conflict(path));
        }

        // Sibling captures must agree on their name.
        let mut new_captures = Vec::new();
        for (i, segment) in segments.iter().enumerate() {
            let Segment::Capture(capture) = segment else {
                continue;
            };
            let key = shape_of(&segments[..i]);
            match self.captures.get(&key) {
                Some(existing) if existing != capture => return Err(self.conflict(path)),
                Some(_) => {}
                None => new_captures.push((key, capture.to_string())),
            }
        }

        self.router = std::mem::take(&mut self.router).route(path, method_router);
        self.routes.insert(path.to_string());
        self.shapes.insert(shape);
        self.captures.extend(new_captures);

        tracing::debug!(context = self.name, path = %path, "Route registered");
        Ok(())
    }

    /// Mount `router` under a non-root prefix.
    pub fn nest(&mut self, prefix: &str, router: Router) -> Result<(), EnvironmentError> {
        validate_path(self.name, prefix)?;

        if prefix == "/" || prefix.ends_with('/') || prefix.contains(['{', '}']) {
            return Err(EnvironmentError::InvalidArgument(format!(
                "{} context: '{}' is not a valid nesting prefix",
                self.name, prefix
            )));
        }
        if self.nests.iter().any(|p| is_under(prefix, p) || is_under(p, prefix)) {
            return Err(self.conflict(prefix));
        }
        if self.routes.iter().any(|r| is_under(r, prefix)) {
            return Err(self.conflict(prefix));
        }

        self.router = std::mem::take(&mut self.router).nest(prefix, router);
        self.nests.insert(prefix.to_string());

        tracing::debug!(context = self.name, prefix = %prefix, "Router nested");
        Ok(())
    }

    /// Every registered route path and nesting prefix, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .routes
            .iter()
            .chain(self.nests.iter())
            .map(String::as_str)
            .collect();
        paths.sort_unstable();
        paths
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty() && self.nests.is_empty()
    }

    /// Snapshot of the routes registered so far.
    pub(crate) fn router(&self) -> Router {
        self.router.clone()
    }

    fn conflict(&self, path: &str) -> EnvironmentError {
        EnvironmentError::InvalidArgument(format!(
            "{} context: '{}' conflicts with an existing registration",
            self.name, path
        ))
    }
}

pub(crate) fn validate_path(context: &str, path: &str) -> Result<(), EnvironmentError> {
    if !path.starts_with('/') {
        return Err(EnvironmentError::InvalidArgument(format!(
            "{} context: path '{}' must start with '/'",
            context, path
        )));
    }
    if path
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return Err(EnvironmentError::InvalidArgument(format!(
            "{} context: path '{}' uses ':' or '*' captures; use '{{name}}' or '{{*name}}'",
            context, path
        )));
    }
    Ok(())
}

/// Split `path` into segments, rejecting braces that do not form a whole
/// `{name}` or trailing `{*name}` segment.
fn parse_segments<'a>(context: &str, path: &'a str) -> Result<Vec<Segment<'a>>, EnvironmentError> {
    let pieces: Vec<&str> = path[1..].split('/').collect();
    let last = pieces.len() - 1;

    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| {
            if !piece.contains(['{', '}']) {
                return Ok(Segment::Static(piece));
            }

            let capture = piece
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
                .filter(|inner| {
                    let name = inner.strip_prefix('*').unwrap_or(inner);
                    !name.is_empty() && !name.contains(['{', '}', '*'])
                })
                .ok_or_else(|| {
                    EnvironmentError::InvalidArgument(format!(
                        "{} context: path '{}' has a malformed capture '{}'",
                        context, path, piece
                    ))
                })?;

            if capture.starts_with('*') && i != last {
                return Err(EnvironmentError::InvalidArgument(format!(
                    "{} context: path '{}' has a wildcard before its last segment",
                    context, path
                )));
            }
            Ok(Segment::Capture(capture))
        })
        .collect()
}

/// Path with capture names erased, so `/users/{id}` and `/users/{name}` match.
fn shape_of(segments: &[Segment<'_>]) -> String {
    let mut shape = String::new();
    for segment in segments {
        shape.push('/');
        match segment {
            Segment::Static(text) => shape.push_str(text),
            Segment::Capture(name) if name.starts_with('*') => shape.push_str("{*}"),
            Segment::Capture(_) => shape.push_str("{}"),
        }
    }
    shape
}

/// True when `path` equals `prefix` or lies below it.
fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    #[test]
    fn test_rejects_relative_path() {
        let mut context = ContextHandler::new("main");
        let err = context.route("hello", get(|| async { "hi" })).unwrap_err();
        assert!(matches!(err, EnvironmentError::InvalidArgument(_)));
        assert!(context.is_empty());
    }

    #[test]
    fn test_rejects_legacy_capture_syntax() {
        let mut context = ContextHandler::new("main");
        assert!(context.route("/users/:id", get(|| async { "" })).is_err());
        assert!(context.route("/users/{id}", get(|| async { "" })).is_ok());
    }

    #[test]
    fn test_rejects_duplicate_route() {
        let mut context = ContextHandler::new("main");
        context.route("/ping", get(|| async { "a" })).unwrap();
        assert!(context.route("/ping", get(|| async { "b" })).is_err());
        assert_eq!(context.paths(), vec!["/ping"]);
    }

    #[test]
    fn test_nest_conflicts() {
        let mut context = ContextHandler::new("main");
        context.route("/api/status", get(|| async { "" })).unwrap();

        assert!(context.nest("/", Router::new()).is_err());
        assert!(context.nest("/api", Router::new()).is_err());
        context.nest("/apiv2", Router::new()).unwrap();
        assert!(context.nest("/apiv2/inner", Router::new()).is_err());
        assert!(context.route("/apiv2/x", get(|| async { "" })).is_err());

        assert_eq!(context.paths(), vec!["/api/status", "/apiv2"]);
    }

    #[test]
    fn test_rejects_renamed_sibling_capture() {
        let mut context = ContextHandler::new("main");
        context.route("/users/{id}", get(|| async { "" })).unwrap();

        let err = context.route("/users/{name}", get(|| async { "" })).unwrap_err();
        assert!(matches!(err, EnvironmentError::InvalidArgument(_)));
        assert!(context
            .route("/users/{name}/orders", get(|| async { "" }))
            .is_err());
        assert!(context.route("/users/{*rest}", get(|| async { "" })).is_err());

        context.route("/users/{id}/orders", get(|| async { "" })).unwrap();
        context.route("/users/new", get(|| async { "" })).unwrap();
        assert_eq!(
            context.paths(),
            vec!["/users/new", "/users/{id}", "/users/{id}/orders"]
        );
    }

    #[test]
    fn test_rejects_malformed_captures() {
        let mut context = ContextHandler::new("admin");
        for path in [
            "/users/{id",
            "/users/id}",
            "/users/{}",
            "/users/{*}",
            "/users/x{id}",
            "/users/{a{b}}",
            "/files/{*path}/meta",
        ] {
            let err = context.route(path, get(|| async { "" })).unwrap_err();
            assert!(
                matches!(err, EnvironmentError::InvalidArgument(_)),
                "{path} accepted"
            );
        }
        assert!(context.is_empty());

        context.route("/files/{*path}", get(|| async { "" })).unwrap();
    }

    #[test]
    fn test_shape_erases_capture_names() {
        let a = parse_segments("main", "/users/{id}/files/{*path}").unwrap();
        let b = parse_segments("main", "/users/{name}/files/{*rest}").unwrap();
        assert_eq!(shape_of(&a), "/users/{}/files/{*}");
        assert_eq!(shape_of(&a), shape_of(&b));
        assert_eq!(shape_of(&parse_segments("main", "/").unwrap()), "/");
    }

    #[test]
    fn test_is_under() {
        assert!(is_under("/a", "/a"));
        assert!(is_under("/a/b", "/a"));
        assert!(!is_under("/ab", "/a"));
    }
}
