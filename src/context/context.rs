use std::sync::Arc;

use futures::future::BoxFuture;
use http_types::{mime, Mime, Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

use crate::router::Params;

/// Something that can take part in a handler chain.
///
/// A handler does its work on the [`Context`] and may await
/// [`Context::next`] to run the rest of the chain. Code before the await
/// runs on the way in, code after it on the way out.
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(&'a self, c: &'a mut Context) -> BoxFuture<'a, ()>;
}

impl<F> Handler for F
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, c: &'a mut Context) -> BoxFuture<'a, ()> {
        (*self)(c)
    }
}

/// Pins down the signature of a closure so it can be used as a [`Handler`].
///
/// ```
/// use futures::FutureExt;
/// use http_types::StatusCode;
///
/// let hello = wow::handler_fn(|c| {
///     async move {
///         let name = c.param("name").unwrap_or("world").to_string();
///         c.string(StatusCode::Ok, format!("hello {}", name));
///     }
///     .boxed()
/// });
/// # let _ = hello;
/// ```
pub fn handler_fn<F>(f: F) -> F
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, ()> + Send + Sync + 'static,
{
    f
}

/// Middleware followed by the route's own handler, in call order.
pub type HandlerChain = Arc<[Arc<dyn Handler>]>;

/// Per-request state handed to every handler in the chain.
pub struct Context {
    request: Request,
    method: String,
    path: String,
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,
    params: Params,
    handlers: HandlerChain,
    // position of the running handler, -1 before the chain starts
    index: isize,
    aborted: bool,
    response: Response,
    written: bool,
}

impl Context {
    /// Wraps `request` without reading its body.
    pub fn new(request: Request) -> Context {
        let method = request.method().to_string();
        let path = request.url().path().to_string();
        let query = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Context {
            request,
            method,
            path,
            query,
            form: Vec::new(),
            params: Params::new(),
            handlers: Arc::from(Vec::<Arc<dyn Handler>>::new()),
            index: -1,
            aborted: false,
            response: Response::new(StatusCode::Ok),
            written: false,
        }
    }

    /// Wraps `request`, reading an urlencoded form body if it carries one.
    pub async fn from_request(mut request: Request) -> http_types::Result<Context> {
        let is_form = request
            .content_type()
            .map_or(false, |m| m.essence() == mime::FORM.essence());
        if !is_form {
            return Ok(Context::new(request));
        }

        let body = request.body_string().await?;
        let mut c = Context::new(request);
        c.form = url::form_urlencoded::parse(body.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Ok(c)
    }

    pub(crate) fn bind(&mut self, params: Params, handlers: HandlerChain) {
        self.params = params;
        self.handlers = handlers;
    }

    /// Runs the handlers after the current one.
    ///
    /// Each handler that returns hands control back here and the following
    /// one is started, unless the chain has been aborted.
    pub fn next(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.index += 1;
            while !self.aborted && (self.index as usize) < self.handlers.len() {
                let handler = Arc::clone(&self.handlers[self.index as usize]);
                handler.call(self).await;
                self.index += 1;
            }
        })
    }

    /// Stops any handler after the current one from running.
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Aborts the chain and responds with `{"message": message}`.
    pub fn fail(&mut self, code: StatusCode, message: &str) {
        self.abort();
        self.json(code, &serde_json::json!({ "message": message }));
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Reads the request body as a string. An urlencoded form body has
    /// already been consumed into [`Context::post_form`].
    pub async fn body_string(&mut self) -> http_types::Result<String> {
        self.request.body_string().await
    }

    pub async fn body_bytes(&mut self) -> http_types::Result<Vec<u8>> {
        self.request.body_bytes().await
    }

    /// Reads the request body as JSON.
    pub async fn body_json<T: DeserializeOwned>(&mut self) -> http_types::Result<T> {
        self.request.body_json().await
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// First query string value for `key`.
    pub fn query(&self, key: &str) -> Option<&str> {
        first(&self.query, key)
    }

    /// First urlencoded form value for `key`.
    pub fn post_form(&self, key: &str) -> Option<&str> {
        first(&self.form, key)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.header(name).map(|values| values.last().as_str())
    }

    pub fn status(&mut self, code: StatusCode) {
        self.response.set_status(code);
    }

    pub fn status_code(&self) -> StatusCode {
        self.response.status()
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        self.response.insert_header(name, value);
    }

    pub fn string(&mut self, code: StatusCode, body: impl Into<String>) {
        self.write(code, body.into().into_bytes(), mime::PLAIN);
    }

    pub fn html(&mut self, code: StatusCode, body: impl Into<String>) {
        self.write(code, body.into().into_bytes(), mime::HTML);
    }

    pub fn data(&mut self, code: StatusCode, body: Vec<u8>) {
        self.write(code, body, mime::BYTE_STREAM);
    }

    pub fn json<T: Serialize>(&mut self, code: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(body) => self.write(code, body, mime::JSON),
            Err(err) => {
                error!(error = %err, path = %self.path, "failed to encode json response");
                self.string(StatusCode::InternalServerError, err.to_string());
            }
        }
    }

    /// Replaces the response wholesale, e.g. with one built by a file server.
    pub fn respond(&mut self, response: Response) {
        self.response = response;
        self.written = true;
    }

    /// Whether a body has been written, so the transport does not write one
    /// again.
    pub fn is_written(&self) -> bool {
        self.written
    }

    pub fn into_response(self) -> Response {
        self.response
    }

    fn write(&mut self, code: StatusCode, body: Vec<u8>, content_type: Mime) {
        self.response.set_status(code);
        self.response.set_body(body);
        self.response.set_content_type(content_type);
        self.written = true;
    }
}

fn first<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
