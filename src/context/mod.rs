mod context;

pub use self::context::{handler_fn, Context, Handler, HandlerChain};
