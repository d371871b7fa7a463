//! End-to-end behavior of registration, matching, chain execution, and
//! lifecycle.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use serial_test::serial;

use strand::prelude::*;
use strand::{RouteKind, etag};

fn assert_status_200(app: &App, method: Method, target: &str) {
    let response = app.test(method, target);
    assert_eq!(
        response.status().as_u16(),
        200,
        "{method} {target} should match"
    );
}

fn dummy(_c: &mut Ctx) {}

// ============================================================================
// Matching and parameter extraction
// ============================================================================

#[test]
fn nested_params() {
    let app = App::new();

    app.get("/test", |c: &mut Ctx| {
        c.status(400).send("Should move on");
    })
    .unwrap();
    app.get("/test/:param", |c: &mut Ctx| {
        c.status(400).send("Should move on");
    })
    .unwrap();
    app.get("/test/:param/test", |c: &mut Ctx| {
        c.status(400).send("Should move on");
    })
    .unwrap();
    app.get("/test/:param/test/:param2", |c: &mut Ctx| {
        let param = c.params("param").unwrap_or_default().to_string();
        let param2 = c.params("param2").unwrap_or_default().to_string();
        c.status(200).send(&format!("{param}:{param2}"));
    })
    .unwrap();

    let response = app.test(Method::Get, "/test/john/test/doe");
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.body(), b"john:doe");
}

#[test]
fn use_params() {
    let app = App::new();

    app.use_at("/prefix/:param", |c: &mut Ctx| {
        let param = c.params("param").unwrap_or_default().to_string();
        c.send(&param);
    })
    .unwrap();

    app.use_at("/:param/*", |c: &mut Ctx| {
        let param = c.params("param").unwrap_or_default().to_string();
        let rest = c.params("*").unwrap_or_default().to_string();
        c.send(&format!("{param} {rest}"));
    })
    .unwrap();

    let response = app.test(Method::Get, "/prefix/john");
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.body(), b"john");

    let response = app.test(Method::Get, "/john/doe");
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.body(), b"john doe");
}

#[test]
fn use_params_group() {
    let app = App::new();

    let group = app.group("/prefix/:param/*").unwrap();
    group
        .use_(|c: &mut Ctx| {
            c.next();
        })
        .unwrap();
    group
        .get("/test", |c: &mut Ctx| {
            let param = c.params("param").unwrap_or_default().to_string();
            let rest = c.params("*").unwrap_or_default().to_string();
            c.send(&format!("{param} {rest}"));
        })
        .unwrap();

    let response = app.test(Method::Get, "/prefix/john/doe/test");
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.body(), b"john doe");
}

#[test]
fn registration_order_drives_execution_order() {
    let app = App::new();

    app.get("/test", |c: &mut Ctx| {
        c.write("1");
        c.next();
    })
    .unwrap();

    app.all("/test", |c: &mut Ctx| {
        c.write("2");
        c.next();
    })
    .unwrap();

    app.use_(|c: &mut Ctx| {
        c.write("3");
    });

    let response = app.test(Method::Get, "/test");
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.body(), b"123");
}

#[test]
fn handlers_on_one_route_run_in_order_under_continuation() {
    let app = App::new();
    app.register(
        RouteKind::Verb(Method::Get),
        "/seq",
        vec![
            handler(|c: &mut Ctx| {
                c.write("a");
                c.next();
            }),
            handler(|c: &mut Ctx| {
                c.write("b");
                c.next();
            }),
            handler(|c: &mut Ctx| {
                c.write("c");
            }),
        ],
    )
    .unwrap();

    assert_eq!(app.test(Method::Get, "/seq").body(), b"abc");
}

#[test]
fn without_continuation_execution_stops_after_the_first_handler() {
    let app = App::new();
    app.register(
        RouteKind::Verb(Method::Get),
        "/stop",
        vec![
            handler(|c: &mut Ctx| {
                c.write("only");
            }),
            handler(|c: &mut Ctx| {
                c.write("never");
            }),
        ],
    )
    .unwrap();

    assert_eq!(app.test(Method::Get, "/stop").body(), b"only");
}

#[test]
fn methods() {
    let app = App::new();

    app.connect("/:john?/:doe?", dummy).unwrap();
    assert_status_200(&app, Method::Connect, "/john/doe");

    app.put("/:john?/:doe?", dummy).unwrap();
    assert_status_200(&app, Method::Put, "/john/doe");

    app.post("/:john?/:doe?", dummy).unwrap();
    assert_status_200(&app, Method::Post, "/john/doe");

    app.delete("/:john?/:doe?", dummy).unwrap();
    assert_status_200(&app, Method::Delete, "/john/doe");

    app.head("/:john?/:doe?", dummy).unwrap();
    assert_status_200(&app, Method::Head, "/john/doe");

    app.patch("/:john?/:doe?", dummy).unwrap();
    assert_status_200(&app, Method::Patch, "/john/doe");

    app.options("/:john?/:doe?", dummy).unwrap();
    assert_status_200(&app, Method::Options, "/john/doe");

    app.trace("/:john?/:doe?", dummy).unwrap();
    assert_status_200(&app, Method::Trace, "/john/doe");

    app.get("/:john?/:doe?", dummy).unwrap();
    assert_status_200(&app, Method::Get, "/john/doe");

    app.all("/:john?/:doe?", dummy).unwrap();
    assert_status_200(&app, Method::Post, "/john/doe");

    app.use_at("/:john?/:doe?", dummy).unwrap();
    assert_status_200(&app, Method::Get, "/john/doe");
}

#[test]
fn optional_param_matching_zero_segments_binds_empty_string() {
    // Documented contract: handlers read the binding without a separate
    // existence check.
    let app = App::new();
    app.get("/opt/:name?", |c: &mut Ctx| {
        let name = c.params("name").expect("optional always binds");
        let body = format!("<{name}>");
        c.send(&body);
    })
    .unwrap();

    assert_eq!(app.test(Method::Get, "/opt").body(), b"<>");
    assert_eq!(app.test(Method::Get, "/opt/ada").body(), b"<ada>");
}

#[test]
fn unmatched_requests_resolve_to_not_found() {
    let app = App::new();
    app.post("/submit", dummy).unwrap();

    // Wrong path, and wrong method on a known path: both plain NoMatch.
    assert_eq!(app.test(Method::Get, "/nope").status().as_u16(), 404);
    assert_eq!(app.test(Method::Get, "/submit").status().as_u16(), 404);

    // The string-typed entry point never panics, even on unknown verbs.
    assert_eq!(app.handle("BREW", "/submit").status().as_u16(), 404);
    assert_eq!(app.handle("POST", "/submit").status().as_u16(), 200);
}

#[test]
fn invalid_patterns_are_rejected_at_registration() {
    let app = App::new();
    assert!(matches!(
        app.get("/files/*/meta", dummy).unwrap_err(),
        InvalidPatternError::NonTerminalWildcard { .. }
    ));
    assert!(matches!(
        app.get("/x/:", dummy).unwrap_err(),
        InvalidPatternError::EmptyParamName { .. }
    ));
}

#[test]
fn idempotent_matching() {
    let app = App::new();
    app.get("/a/:id/*", |c: &mut Ctx| {
        let id = c.params("id").unwrap_or_default().to_string();
        let rest = c.params("*").unwrap_or_default().to_string();
        c.send(&format!("{id}|{rest}"));
    })
    .unwrap();

    let first = app.test(Method::Get, "/a/7/x/y");
    let second = app.test(Method::Get, "/a/7/x/y");
    assert_eq!(first.status(), second.status());
    assert_eq!(first.body(), second.body());
    assert_eq!(first.body(), b"7|x/y");
}

// ============================================================================
// Groups
// ============================================================================

#[test]
fn group() {
    let app = App::with_settings(Settings {
        case_insensitive: true,
        ..Settings::default()
    });

    let grp = app.group("/test").unwrap();
    grp.get("/", dummy).unwrap();
    assert_status_200(&app, Method::Get, "/test");

    grp.get("/:demo?", dummy).unwrap();
    assert_status_200(&app, Method::Get, "/test/john");

    grp.connect("/CONNECT", dummy).unwrap();
    assert_status_200(&app, Method::Connect, "/test/CONNECT");

    grp.put("/PUT", dummy).unwrap();
    assert_status_200(&app, Method::Put, "/test/PUT");

    grp.post("/POST", dummy).unwrap();
    assert_status_200(&app, Method::Post, "/test/POST");

    grp.delete("/DELETE", dummy).unwrap();
    assert_status_200(&app, Method::Delete, "/test/DELETE");

    grp.head("/HEAD", dummy).unwrap();
    assert_status_200(&app, Method::Head, "/test/HEAD");

    grp.patch("/PATCH", dummy).unwrap();
    assert_status_200(&app, Method::Patch, "/test/PATCH");

    grp.options("/OPTIONS", dummy).unwrap();
    assert_status_200(&app, Method::Options, "/test/OPTIONS");

    grp.trace("/TRACE", dummy).unwrap();
    assert_status_200(&app, Method::Trace, "/test/TRACE");

    grp.all("/ALL", dummy).unwrap();
    assert_status_200(&app, Method::Post, "/test/ALL");

    grp.use_at("/USE", dummy).unwrap();
    assert_status_200(&app, Method::Get, "/test/USE/oke");

    let api = grp.group("/v1").unwrap();
    api.post("/", dummy).unwrap();
    assert_status_200(&app, Method::Post, "/test/v1/");

    api.get("/users", dummy).unwrap();
    // Case-insensitive mode is on for this app.
    assert_status_200(&app, Method::Get, "/test/v1/UsErS");
}

#[test]
fn literal_matching_is_case_sensitive_by_default() {
    let app = App::new();
    app.get("/users", dummy).unwrap();
    assert_eq!(app.test(Method::Get, "/UsErS").status().as_u16(), 404);
    assert_eq!(app.test(Method::Get, "/users").status().as_u16(), 200);
}

// ============================================================================
// Static files
// ============================================================================

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("strand-app-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn static_routes() {
    let dir = scratch_dir("static");
    let funding = dir.join("funding.yml");
    let auth = dir.join("auth.yml");
    std::fs::write(&funding, "github: [strand]").unwrap();
    std::fs::write(&auth, "assign: true").unwrap();
    let tree = dir.join("tree");
    std::fs::create_dir_all(&tree).unwrap();
    std::fs::write(tree.join("stale.yml"), "days: 30").unwrap();

    let app = App::new();
    let grp = app.group("/v1").unwrap();
    grp.static_route("/v2", &auth).unwrap();
    app.static_route("/*", &funding).unwrap();
    app.static_route("/john", &tree).unwrap();

    let response = app.test(Method::Get, "/john/stale.yml");
    assert_eq!(response.status().as_u16(), 200);
    assert_ne!(response.header("content-length"), Some(""));
    assert!(response.header("content-length").is_some());

    let response = app.test(Method::Get, "/yesyes/john/doe");
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.header("content-length").is_some());

    let response = app.test(Method::Get, "/v1/v2");
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.header("content-length").is_some());
    assert_eq!(response.body(), b"assign: true");
}

#[test]
fn specific_static_entry_registered_earlier_wins_for_its_prefix() {
    let dir = scratch_dir("static-precedence");
    let assets = dir.join("assets");
    std::fs::create_dir_all(&assets).unwrap();
    std::fs::write(assets.join("app.css"), "body{}").unwrap();
    let fallback = dir.join("fallback.txt");
    std::fs::write(&fallback, "fallback").unwrap();

    let app = App::new();
    app.static_route("/assets", &assets).unwrap();
    app.static_route("/*", &fallback).unwrap();

    // Path under the specific prefix: served from the directory.
    let response = app.test(Method::Get, "/assets/app.css");
    assert_eq!(response.body(), b"body{}");
    assert_eq!(response.header("content-type"), Some("text/css"));

    // Anything else falls through to the wildcard entry.
    let response = app.test(Method::Get, "/completely/else");
    assert_eq!(response.body(), b"fallback");
    assert!(response.header("content-length").is_some());

    // A miss under the specific prefix continues to the fallback entry.
    let response = app.test(Method::Get, "/assets/missing.css");
    assert_eq!(response.body(), b"fallback");
}

// ============================================================================
// Context pooling
// ============================================================================

#[test]
fn pooling_and_fresh_allocation_behave_identically() {
    let build = |settings: Settings| {
        let app = App::with_settings(settings);
        app.use_at("/api", |c: &mut Ctx| {
            c.write("mw;");
            c.next();
        })
        .unwrap();
        app.get("/api/:id", |c: &mut Ctx| {
            let id = c.params("id").unwrap_or_default().to_string();
            c.write(&format!("id={id}"));
        })
        .unwrap();
        app
    };

    let pooled = build(Settings::default());
    let fresh = build(Settings {
        context_pooling: false,
        ..Settings::default()
    });

    for target in ["/api/1", "/api/two", "/api/1?x=2", "/missing"] {
        let a = pooled.test(Method::Get, target);
        let b = fresh.test(Method::Get, target);
        assert_eq!(a.status(), b.status(), "{target}");
        assert_eq!(a.body(), b.body(), "{target}");
    }
}

#[test]
fn pooled_contexts_do_not_leak_state_across_requests() {
    let app = App::new();
    app.get("/leak/:x", |c: &mut Ctx| {
        let x = c.params("x").unwrap_or_default().to_string();
        c.send(&x);
    })
    .unwrap();
    app.get("/plain", |c: &mut Ctx| {
        let verdict = if c.params("x").is_none() { "clean" } else { "dirty" };
        c.send(verdict);
    })
    .unwrap();

    assert_eq!(app.test(Method::Get, "/leak/secret").body(), b"secret");
    assert_eq!(app.test(Method::Get, "/plain").body(), b"clean");
}

// ============================================================================
// Chain state and response consumers
// ============================================================================

#[test]
fn etag_middleware_consumes_cumulative_response_state() {
    let app = App::new();
    app.use_(|c: &mut Ctx| {
        c.next();
        etag::set_etag(c, false);
    });
    app.get("/greeting", |c: &mut Ctx| {
        c.send("Hello, World!");
    })
    .unwrap();

    let response = app.test(Method::Get, "/greeting");
    assert_eq!(response.header("etag"), Some("\"13-3964322768\""));
    assert_eq!(response.header("content-length"), Some("13"));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn shutdown_without_serving_is_safe() {
    let app = App::with_settings(Settings {
        disable_startup_message: true,
        ..Settings::default()
    });
    app.shutdown();
    app.shutdown();
}

#[test]
#[serial]
fn listen_returns_cleanly_after_shutdown() {
    let app = App::with_settings(Settings {
        disable_startup_message: true,
        ..Settings::default()
    });

    thread::scope(|scope| {
        scope.spawn(|| {
            thread::sleep(Duration::from_millis(400));
            app.shutdown();
        });
        app.listen("127.0.0.1:0").unwrap();
    });

    // A second serve cycle on the same app works, and so does a second
    // shutdown on the stopped instance.
    thread::scope(|scope| {
        scope.spawn(|| {
            thread::sleep(Duration::from_millis(400));
            app.shutdown();
        });
        app.listen("127.0.0.1:0").unwrap();
    });
    app.shutdown();
}

#[test]
#[serial]
fn serve_answers_requests_over_tcp() {
    let app = App::with_settings(Settings {
        disable_startup_message: true,
        ..Settings::default()
    });
    app.get("/hello/:name", |c: &mut Ctx| {
        let name = c.params("name").unwrap_or_default().to_string();
        c.send(&format!("hello {name}"));
    })
    .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::scope(|scope| {
        let serving = scope.spawn(|| app.serve(listener));

        let mut client = TcpStream::connect(addr).unwrap();
        client
            .write_all(b"GET /hello/ada?x=1 HTTP/1.1\r\nhost: test\r\n\r\n")
            .unwrap();
        let mut raw = Vec::new();
        client.read_to_end(&mut raw).unwrap();
        let text = String::from_utf8_lossy(&raw);
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("content-length: 9\r\n"));
        assert!(text.ends_with("\r\n\r\nhello ada"));

        app.shutdown();
        serving.join().unwrap().unwrap();
    });
}
