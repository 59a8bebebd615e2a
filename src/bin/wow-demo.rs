use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use futures::future::BoxFuture;
use futures::FutureExt;
use http_types::StatusCode;
use serde_json::json;
use tracing::info;

use wow::config::ServerConfig;
use wow::Context;

#[derive(Parser, Debug)]
#[command(name = "wow-demo", version, about = "Demo server for wow-web")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the configuration file
    #[arg(short, long)]
    addr: Option<String>,
}

fn index(c: &mut Context) -> BoxFuture<'_, ()> {
    async move {
        c.html(StatusCode::Ok, "<h1>Hello Wow</h1>\n");
    }
    .boxed()
}

// index out of range, for trying out Recovery
fn panics(c: &mut Context) -> BoxFuture<'_, ()> {
    async move {
        let names = vec!["wow".to_string()];
        let name = names[100].clone();
        c.string(StatusCode::Ok, name);
    }
    .boxed()
}

fn hello(c: &mut Context) -> BoxFuture<'_, ()> {
    async move {
        let body = format!(
            "hello {}, you're at {}\n",
            c.query("name").unwrap_or_default(),
            c.path()
        );
        c.string(StatusCode::Ok, body);
    }
    .boxed()
}

fn hello_name(c: &mut Context) -> BoxFuture<'_, ()> {
    async move {
        let body = format!(
            "hello {}, you're at {}\n",
            c.param("name").unwrap_or_default(),
            c.path()
        );
        c.string(StatusCode::Ok, body);
    }
    .boxed()
}

fn login(c: &mut Context) -> BoxFuture<'_, ()> {
    async move {
        let body = json!({
            "username": c.post_form("username"),
            "password": c.post_form("password"),
        });
        c.json(StatusCode::Ok, &body);
    }
    .boxed()
}

fn only_for_v2(c: &mut Context) -> BoxFuture<'_, ()> {
    async move {
        let start = Instant::now();
        c.fail(StatusCode::InternalServerError, "Internal Server Error");
        info!(
            status = c.status_code() as u16,
            path = %c.path(),
            elapsed = ?start.elapsed(),
            "rejected by group v2"
        );
    }
    .boxed()
}

#[async_std::main]
async fn main() -> wow::Result<()> {
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(addr) = args.addr {
        config.addr = addr;
    }
    wow::logging::init(&config.log_filter);

    let r = wow::default();
    if let Some(mount) = &config.static_files {
        r.static_files(&mount.path, mount.root.clone())?;
    }

    r.get("/", index)?;
    r.get("/panic", panics)?;

    let v1 = r.group("/v1");
    v1.get("/hello", hello)?;

    let mut v2 = r.group("/v2");
    v2.use_middleware(only_for_v2);
    v2.get("/hello/:name", hello_name)?;
    v2.post("/login", login)?;

    r.run(&config.addr).await
}
