use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::future::BoxFuture;
use futures::FutureExt;
use http_types::StatusCode;
use tracing::error;

use crate::context::{Context, Handler};

/// Turns a panic in any later handler into a 500 response.
///
/// Only handlers after this one in the chain are covered.
#[derive(Debug, Default, Clone, Copy)]
pub struct Recovery;

impl Handler for Recovery {
    fn call<'a>(&'a self, c: &'a mut Context) -> BoxFuture<'a, ()> {
        async move {
            let outcome = AssertUnwindSafe(c.next()).catch_unwind().await;
            if let Err(panic) = outcome {
                error!(
                    method = %c.method(),
                    path = %c.path(),
                    panic = %panic_message(&*panic),
                    "handler panicked"
                );
                c.fail(StatusCode::InternalServerError, "Internal Server Error");
            }
        }
        .boxed()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
