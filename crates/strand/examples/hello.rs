//! Minimal strand application.
//!
//! Run with `cargo run --example hello`, then:
//!
//! ```text
//! curl http://127.0.0.1:3000/
//! curl http://127.0.0.1:3000/greet/ada
//! curl http://127.0.0.1:3000/api/items/7
//! ```

use strand::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let app = App::new();

    app.use_(middleware::recover());
    app.use_(middleware::logger());

    app.get("/", |c: &mut Ctx| {
        c.send("hello from strand");
    })?;

    app.get("/greet/:name?", |c: &mut Ctx| {
        let name = c
            .params("name")
            .filter(|n| !n.is_empty())
            .unwrap_or("world")
            .to_string();
        c.send(&format!("hello, {name}"));
    })?;

    let api = app.group("/api")?;
    api.get("/items/:id", |c: &mut Ctx| {
        let id = c.params("id").unwrap_or_default().to_string();
        let _ = c.json(&serde_json::json!({ "id": id, "ok": true }));
    })?;

    app.listen("127.0.0.1:3000")?;
    Ok(())
}
