//! Wow web is a small HTTP framework: a per-method prefix tree router,
//! nested route groups with middleware, and an onion-style handler chain.

pub mod config;
pub mod context;
pub mod error;
pub mod fs;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod wow;

pub use context::{handler_fn, Context, Handler, HandlerChain};
pub use error::{Error, Result, RouteError};
pub use router::{Params, RouterGroup};
pub use wow::Engine;

use middleware::{Logger, Recovery};

/// An engine with no middleware.
pub fn new() -> Engine {
    Engine::new()
}

/// An engine with [`Logger`] and [`Recovery`] installed.
pub fn default() -> Engine {
    let mut engine = Engine::new();
    engine.use_middleware(Logger).use_middleware(Recovery);
    engine
}
