use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use http_types::{mime, Method, Request, StatusCode, Url};
use parking_lot::Mutex;

use wow::{handler_fn, Context, Engine, Handler, RouteError};

type Log = Arc<Mutex<Vec<String>>>;

async fn send(engine: &Engine, method: Method, path: &str) -> (StatusCode, String) {
    let url = Url::parse(&format!("http://localhost{}", path)).unwrap();
    let mut res = engine.handle(Request::new(method, url)).await;
    (res.status(), res.body_string().await.unwrap())
}

fn echo_pattern(name: &'static str) -> impl Handler {
    handler_fn(move |c| {
        async move {
            let mut params: Vec<String> = c
                .params()
                .iter()
                .map(|p| format!("{}={}", p.key, p.value))
                .collect();
            params.sort();
            c.string(StatusCode::Ok, format!("{} {}", name, params.join(",")));
        }
        .boxed()
    })
}

fn tag(log: &Log, name: &'static str) -> impl Handler {
    let log = Arc::clone(log);
    handler_fn(move |c| {
        let log = Arc::clone(&log);
        async move {
            log.lock().push(format!("{} pre", name));
            c.next().await;
            log.lock().push(format!("{} post", name));
        }
        .boxed()
    })
}

fn ok(c: &mut Context) -> BoxFuture<'_, ()> {
    async move { c.string(StatusCode::Ok, "ok") }.boxed()
}

fn routed_engine() -> Engine {
    let engine = wow::new();
    engine.get("/p/:name", echo_pattern("param")).unwrap();
    engine.get("/p/a", echo_pattern("static")).unwrap();
    engine.get("/p/a/*filepath", echo_pattern("catch-all")).unwrap();
    engine.get("/p/b/:name/:age", echo_pattern("multi")).unwrap();
    engine
}

#[async_std::test]
async fn static_route_takes_precedence() {
    let engine = routed_engine();
    assert_eq!(send(&engine, Method::Get, "/p/a").await, (StatusCode::Ok, "static ".to_string()));
    assert_eq!(
        send(&engine, Method::Get, "/p/x").await,
        (StatusCode::Ok, "param name=x".to_string())
    );
}

#[async_std::test]
async fn binds_params_and_remainder() {
    let engine = routed_engine();
    assert_eq!(
        send(&engine, Method::Get, "/p/a/b/c").await.1,
        "catch-all filepath=b/c"
    );
    assert_eq!(
        send(&engine, Method::Get, "/p/b/bob/18").await.1,
        "multi age=18,name=bob"
    );
}

#[async_std::test]
async fn params_are_percent_decoded() {
    let engine = routed_engine();
    assert_eq!(
        send(&engine, Method::Get, "/p/bob%20smith").await.1,
        "param name=bob smith"
    );
    assert_eq!(
        send(&engine, Method::Get, "/p/a/dir%2Fsub/caf%C3%A9").await.1,
        "catch-all filepath=dir/sub/café"
    );
}

#[async_std::test]
async fn unmatched_requests_get_not_found() {
    let engine = routed_engine();

    let (status, body) = send(&engine, Method::Get, "/q/anything").await;
    assert_eq!(status, StatusCode::NotFound);
    assert_eq!(body, "404 NOT FOUND: /q/anything\n");

    let (status, _) = send(&engine, Method::Post, "/p/a").await;
    assert_eq!(status, StatusCode::NotFound);
}

#[async_std::test]
async fn unmatched_requests_run_no_middleware() {
    let log: Log = Arc::default();
    let mut engine = wow::new();
    engine.use_middleware(tag(&log, "A"));
    engine.get("/only", ok).unwrap();

    let (status, _) = send(&engine, Method::Get, "/other").await;

    assert_eq!(status, StatusCode::NotFound);
    assert!(log.lock().is_empty());
}

#[async_std::test]
async fn group_middleware_wraps_handler() {
    let log: Log = Arc::default();
    let engine = wow::new();
    let mut api = engine.group("/api");
    api.use_middleware(tag(&log, "A")).use_middleware(tag(&log, "B"));
    let leaf = {
        let log = Arc::clone(&log);
        handler_fn(move |c| {
            let log = Arc::clone(&log);
            async move {
                log.lock().push("H".to_string());
                c.string(StatusCode::Ok, "hi");
            }
            .boxed()
        })
    };
    api.get("/hello", leaf).unwrap();

    let (status, body) = send(&engine, Method::Get, "/api/hello").await;

    assert_eq!((status, body.as_str()), (StatusCode::Ok, "hi"));
    assert_eq!(*log.lock(), vec!["A pre", "B pre", "H", "B post", "A post"]);
}

#[async_std::test]
async fn failing_middleware_short_circuits() {
    let log: Log = Arc::default();
    let engine = wow::new();
    let mut api = engine.group("/api");
    api.use_middleware(tag(&log, "A"));
    let deny = {
        let log = Arc::clone(&log);
        handler_fn(move |c| {
            let log = Arc::clone(&log);
            async move {
                log.lock().push("B".to_string());
                c.fail(StatusCode::Forbidden, "no entry");
            }
            .boxed()
        })
    };
    api.use_middleware(deny);
    let leaf = {
        let log = Arc::clone(&log);
        handler_fn(move |_c| {
            let log = Arc::clone(&log);
            async move { log.lock().push("H".to_string()) }.boxed()
        })
    };
    api.get("/secret", leaf).unwrap();

    let (status, body) = send(&engine, Method::Get, "/api/secret").await;

    assert_eq!(status, StatusCode::Forbidden);
    assert_eq!(body, r#"{"message":"no entry"}"#);
    assert_eq!(*log.lock(), vec!["A pre", "B", "A post"]);
}

#[async_std::test]
async fn sub_groups_copy_middleware_at_creation() {
    let log: Log = Arc::default();
    let engine = wow::new();
    let mut parent = engine.group("/api");
    parent.use_middleware(tag(&log, "A"));
    let child = parent.group("/v1");
    parent.use_middleware(tag(&log, "C"));

    assert_eq!(child.prefix(), "/api/v1");
    assert_eq!(child.middleware_len(), 1);

    child.get("/x", ok).unwrap();
    parent.get("/y", ok).unwrap();

    send(&engine, Method::Get, "/api/v1/x").await;
    assert_eq!(*log.lock(), vec!["A pre", "A post"]);

    log.lock().clear();
    send(&engine, Method::Get, "/api/y").await;
    assert_eq!(*log.lock(), vec!["A pre", "C pre", "C post", "A post"]);
}

#[async_std::test]
async fn handlers_read_query_and_form() {
    let engine = wow::new();
    engine
        .post(
            "/login",
            handler_fn(|c| {
                async move {
                    let body = format!(
                        "{}:{}:{}",
                        c.post_form("username").unwrap_or_default(),
                        c.post_form("password").unwrap_or_default(),
                        c.query("next").unwrap_or_default()
                    );
                    c.string(StatusCode::Ok, body);
                }
                .boxed()
            }),
        )
        .unwrap();

    let url = Url::parse("http://localhost/login?next=/home").unwrap();
    let mut req = Request::new(Method::Post, url);
    req.set_body("username=geek&password=1234");
    req.set_content_type(mime::FORM);
    let mut res = engine.handle(req).await;

    assert_eq!(res.status(), StatusCode::Ok);
    assert_eq!(res.body_string().await.unwrap(), "geek:1234:/home");
}

#[async_std::test]
async fn custom_methods_are_routed() {
    let engine = wow::new();
    engine.add_route("PURGE", "/cache", ok).unwrap();
    engine.delete("/cache", ok).unwrap();

    let (status, _) = send(&engine, Method::Delete, "/cache").await;
    assert_eq!(status, StatusCode::Ok);

    let url = Url::parse("http://localhost/cache").unwrap();
    let mut c = Context::new(Request::new(Method::Get, url));
    c.status(StatusCode::Accepted);
    assert_eq!(c.status_code(), StatusCode::Accepted);
    assert!(!c.is_written());
}

#[test]
fn registration_errors() {
    let engine = wow::new();
    let api = engine.group("/api");

    assert_eq!(
        api.get("users", ok),
        Err(RouteError::MissingLeadingSlash("users".to_string()))
    );
    assert_eq!(api.add_route("", "/users", ok), Err(RouteError::EmptyMethod));

    api.get("/users/:id", ok).unwrap();
    assert_eq!(
        engine.get("/api/users/:id", ok),
        Err(RouteError::PatternConflict {
            pattern: "/api/users/:id".to_string(),
            existing: "/api/users/:id".to_string(),
        })
    );
    assert!(matches!(
        api.get("/users/:name/posts", ok),
        Err(RouteError::WildcardConflict { .. })
    ));
    assert_eq!(
        api.get("/files/*path/raw", ok),
        Err(RouteError::CatchAllNotLast("/api/files/*path/raw".to_string()))
    );
}

#[test]
fn lists_registered_routes() {
    let engine = routed_engine();
    engine.post("/login", ok).unwrap();

    let mut routes = engine.routes();
    routes.sort();
    assert_eq!(
        routes,
        vec![
            ("GET".to_string(), "/p/:name".to_string()),
            ("GET".to_string(), "/p/a".to_string()),
            ("GET".to_string(), "/p/a/*filepath".to_string()),
            ("GET".to_string(), "/p/b/:name/:age".to_string()),
            ("POST".to_string(), "/login".to_string()),
        ]
    );
}
