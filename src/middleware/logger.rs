use std::time::Instant;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::info;

use crate::context::{Context, Handler};

/// Logs one line per request once the rest of the chain has finished.
#[derive(Debug, Default, Clone, Copy)]
pub struct Logger;

impl Handler for Logger {
    fn call<'a>(&'a self, c: &'a mut Context) -> BoxFuture<'a, ()> {
        async move {
            let start = Instant::now();
            c.next().await;
            info!(
                method = %c.method(),
                path = %c.path(),
                status = c.status_code() as u16,
                elapsed = ?start.elapsed(),
                "request"
            );
        }
        .boxed()
    }
}
