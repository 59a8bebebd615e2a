use std::path::PathBuf;
use std::sync::Arc;

use async_std::net::TcpListener;
use async_std::task;
use futures::StreamExt;
use http_types::{Request, Response, StatusCode};
use parking_lot::RwLock;
use tracing::{debug, error, info};

use crate::context::{Context, Handler, HandlerChain};
use crate::error::{self, RouteError};
use crate::router::{Params, RouterGroup, Routes, SharedRoutes};

/// Owns the route trees and dispatches requests through them.
///
/// Routes are registered through the engine's root group or any group
/// derived from it. Registration has to be finished before [`Engine::run`]
/// starts accepting connections.
pub struct Engine {
    root: RouterGroup,
    routes: SharedRoutes,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    pub fn new() -> Engine {
        let routes: SharedRoutes = Arc::new(RwLock::new(Routes::new()));
        Engine {
            root: RouterGroup::root(Arc::clone(&routes)),
            routes,
        }
    }

    /// Adds global middleware. Only routes and groups created afterwards
    /// pick it up.
    pub fn use_middleware<H: Handler>(&mut self, middleware: H) -> &mut Self {
        self.root.use_middleware(middleware);
        self
    }

    pub fn group(&self, prefix: &str) -> RouterGroup {
        self.root.group(prefix)
    }

    pub fn add_route<H: Handler>(
        &self,
        method: &str,
        path: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        self.root.add_route(method, path, handler)
    }

    pub fn get<H: Handler>(&self, path: &str, handler: H) -> Result<(), RouteError> {
        self.root.get(path, handler)
    }

    pub fn post<H: Handler>(&self, path: &str, handler: H) -> Result<(), RouteError> {
        self.root.post(path, handler)
    }

    pub fn put<H: Handler>(&self, path: &str, handler: H) -> Result<(), RouteError> {
        self.root.put(path, handler)
    }

    pub fn delete<H: Handler>(&self, path: &str, handler: H) -> Result<(), RouteError> {
        self.root.delete(path, handler)
    }

    pub fn patch<H: Handler>(&self, path: &str, handler: H) -> Result<(), RouteError> {
        self.root.patch(path, handler)
    }

    pub fn head<H: Handler>(&self, path: &str, handler: H) -> Result<(), RouteError> {
        self.root.head(path, handler)
    }

    pub fn options<H: Handler>(&self, path: &str, handler: H) -> Result<(), RouteError> {
        self.root.options(path, handler)
    }

    pub fn static_files(
        &self,
        relative_path: &str,
        root: impl Into<PathBuf>,
    ) -> Result<(), RouteError> {
        self.root.static_files(relative_path, root)
    }

    /// Registered `(method, pattern)` pairs.
    pub fn routes(&self) -> Vec<(String, String)> {
        let routes = self.routes.read();
        let mut list = Vec::new();
        for method in routes.methods() {
            if let Some(tree) = routes.tree(method) {
                for pattern in tree.routes() {
                    list.push((method.to_string(), pattern.to_string()));
                }
            }
        }
        list
    }

    /// Dispatches one request.
    ///
    /// Unknown methods and unmatched paths get a 404 without running any
    /// handler. Otherwise the matched chain runs from the start and whatever
    /// response it built is returned.
    pub async fn handle(&self, req: Request) -> Response {
        let mut c = match Context::from_request(req).await {
            Ok(c) => c,
            Err(err) => {
                let mut res = Response::new(err.status());
                res.set_body(err.to_string());
                return res;
            }
        };

        match self.lookup(c.method(), c.path()) {
            Some((params, handlers)) => {
                c.bind(params, handlers);
                c.next().await;
            }
            None => {
                let body = format!("404 NOT FOUND: {}\n", c.path());
                c.string(StatusCode::NotFound, body);
            }
        }
        c.into_response()
    }

    fn lookup(&self, method: &str, path: &str) -> Option<(Params, HandlerChain)> {
        let routes = self.routes.read();
        let tree = match routes.tree(method) {
            Some(tree) => tree,
            None => {
                debug!(method, path, "no routes for method");
                return None;
            }
        };
        match tree.get_route(path) {
            Some((node, params)) => node.value().map(|chain| (params, Arc::clone(chain))),
            None => {
                debug!(method, path, "no route matched");
                None
            }
        }
    }

    /// Serves HTTP/1.1 on `addr`, one task per connection.
    pub async fn run(self, addr: &str) -> error::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        info!(address = %listener.local_addr()?, "Listening for connections");

        let engine = Arc::new(self);
        let mut incoming = listener.incoming();
        while let Some(stream) = incoming.next().await {
            let stream = match stream {
                Ok(stream) => stream,
                Err(err) => {
                    error!(error = %err, "failed to accept connection");
                    continue;
                }
            };

            let engine = Arc::clone(&engine);
            task::spawn(async move {
                let peer = stream.peer_addr().ok();
                let served = async_h1::accept(stream.clone(), |req| {
                    let engine = Arc::clone(&engine);
                    async move { Ok(engine.handle(req).await) }
                })
                .await;
                if let Err(err) = served {
                    error!(peer = ?peer, error = %err, "connection error");
                }
            });
        }
        Ok(())
    }
}
