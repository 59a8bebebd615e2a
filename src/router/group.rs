use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::context::{Handler, HandlerChain};
use crate::error::RouteError;
use crate::fs::StaticFiles;
use crate::router::Routes;

/// Route table shared by the engine and all of its groups.
pub(crate) type SharedRoutes = Arc<RwLock<Routes<HandlerChain>>>;

/// A path prefix plus the middleware every route registered through it gets.
///
/// Groups nest by extending the prefix. A sub-group copies its parent's
/// middleware when it is created; middleware added to the parent afterwards
/// does not reach it. Every group registers into the same route table.
pub struct RouterGroup {
    prefix: String,
    handlers: Vec<Arc<dyn Handler>>,
    routes: SharedRoutes,
}

impl RouterGroup {
    pub(crate) fn root(routes: SharedRoutes) -> RouterGroup {
        RouterGroup {
            prefix: String::new(),
            handlers: Vec::new(),
            routes,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of middleware handlers this group prepends to its routes.
    pub fn middleware_len(&self) -> usize {
        self.handlers.len()
    }

    /// Creates a sub-group under `prefix`.
    pub fn group(&self, prefix: &str) -> RouterGroup {
        RouterGroup {
            prefix: format!("{}{}", self.prefix, prefix),
            handlers: self.handlers.clone(),
            routes: Arc::clone(&self.routes),
        }
    }

    /// Appends middleware to this group.
    pub fn use_middleware<H: Handler>(&mut self, middleware: H) -> &mut Self {
        self.handlers.push(Arc::new(middleware));
        self
    }

    /// Registers `handler` for `method` at the group prefix joined with
    /// `path`, behind the group's middleware.
    pub fn add_route<H: Handler>(
        &self,
        method: &str,
        path: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        if !path.starts_with('/') {
            return Err(RouteError::MissingLeadingSlash(path.to_string()));
        }
        let pattern = format!("{}{}", self.prefix, path);

        let mut chain = self.handlers.clone();
        chain.push(Arc::new(handler));
        if chain.is_empty() {
            return Err(RouteError::EmptyHandlerChain(pattern));
        }

        self.routes
            .write()
            .add_route(method, &pattern, Arc::from(chain))?;
        info!("Route {:>4} - {}", method, pattern);
        Ok(())
    }

    pub fn get<H: Handler>(&self, path: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("GET", path, handler)
    }

    pub fn post<H: Handler>(&self, path: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("POST", path, handler)
    }

    pub fn put<H: Handler>(&self, path: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("PUT", path, handler)
    }

    pub fn delete<H: Handler>(&self, path: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("DELETE", path, handler)
    }

    pub fn patch<H: Handler>(&self, path: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("PATCH", path, handler)
    }

    pub fn head<H: Handler>(&self, path: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("HEAD", path, handler)
    }

    pub fn options<H: Handler>(&self, path: &str, handler: H) -> Result<(), RouteError> {
        self.add_route("OPTIONS", path, handler)
    }

    /// Serves the files below `root` at `relative_path/*filepath`.
    pub fn static_files(
        &self,
        relative_path: &str,
        root: impl Into<PathBuf>,
    ) -> Result<(), RouteError> {
        let pattern = format!("{}/*filepath", relative_path.trim_end_matches('/'));
        self.get(&pattern, StaticFiles::new(root))
    }
}
