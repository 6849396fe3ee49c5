//! Router dispatch tests covering registration, resolution, pooling and
//! middleware together.

use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use parking_lot::Mutex;
use serde::Deserialize;
use tessera_core::{handler, Handler, HandlerError};
use tessera_middleware::{from_next, recover};
use tessera_router::RouteError;
use tessera_server::Router;

type Log = Arc<Mutex<Vec<&'static str>>>;

fn call(router: &Router, method: Method, uri: &str) -> Response<Bytes> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Bytes::new())
        .unwrap();
    router.dispatch(request).unwrap()
}

fn reply(body: &'static str) -> Handler {
    handler(move |ctx| ctx.text(StatusCode::OK, body))
}

fn dump_params() -> Handler {
    handler(|ctx| {
        let mut pairs: Vec<String> = ctx.params().iter().map(|(k, v)| format!("{k}={v}")).collect();
        pairs.sort();
        ctx.text(StatusCode::OK, pairs.join("&"))
    })
}

#[test]
fn test_percent_encoded_path_is_decoded() {
    let mut router = Router::new();
    router
        .get("/users/:name", dump_params())
        .unwrap()
        .get("/files/*", dump_params())
        .unwrap()
        .get("/caf\u{e9}", reply("menu"))
        .unwrap();

    let response = call(&router, Method::GET, "/users/john%20doe");
    assert_eq!(response.body(), "name=john doe");

    let response = call(&router, Method::GET, "/files/my%20docs/a.txt");
    assert_eq!(response.body(), "*=my docs/a.txt");

    let response = call(&router, Method::GET, "/caf%C3%A9");
    assert_eq!(response.body(), "menu");
}

#[test]
fn test_every_segment_kind_through_dispatch() {
    let mut router = Router::new();
    router
        .get("/user/:id", dump_params())
        .unwrap()
        .get("/files/*", dump_params())
        .unwrap()
        .get("/assets/+", dump_params())
        .unwrap()
        .get("/range/:from-:to", dump_params())
        .unwrap()
        .get("/release/v::version", dump_params())
        .unwrap()
        .get("/tags/:list(,)", dump_params())
        .unwrap();

    let cases = [
        ("/user/42", "id=42"),
        ("/files/a/b/c", "*=a/b/c"),
        ("/assets/css/site.css", "+=css/site.css"),
        ("/range/10-20", "from=10&to=20"),
        ("/release/v1.2.3", "version=1.2.3"),
        ("/tags/red,green", "list=red,green"),
    ];
    for (path, expected) in cases {
        let response = call(&router, Method::GET, path);
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert_eq!(response.body(), expected, "{path}");
    }

    // Matchers that reject their segment fall through to not-found
    for path in ["/tags/red", "/release/1.2.3", "/files"] {
        assert_eq!(call(&router, Method::GET, path).status(), StatusCode::NOT_FOUND, "{path}");
    }
}

#[test]
fn test_trailing_slash_ignored() {
    let mut router = Router::new();
    router.get("/about/", reply("about")).unwrap();

    assert_eq!(call(&router, Method::GET, "/about").body(), "about");
    assert_eq!(call(&router, Method::GET, "/about/").body(), "about");
}

#[test]
fn test_param_route_with_catch_all_tail() {
    let mut router = Router::new();
    router
        .get("/docs/:page", reply("page"))
        .unwrap()
        .get("/docs/:page/*", reply("rest"))
        .unwrap();

    assert_eq!(call(&router, Method::GET, "/docs/intro").body(), "page");
    assert_eq!(call(&router, Method::GET, "/docs/intro/more/deep").body(), "rest");
}

#[test]
fn test_registration_conflicts_are_errors() {
    let mut router = Router::new();
    let err = router.get("/a/:id/b/:id", reply("x")).unwrap_err();
    assert!(matches!(err, RouteError::DuplicateParam { .. }), "{err:?}");

    router.get("/p/:id", reply("x")).unwrap();
    assert!(router.get("/p/:name", reply("y")).is_err());
    assert!(router.get("/p/*", reply("y")).is_err());
    assert_eq!(router.len(), 1);
}

#[test]
fn test_reregistration_replaces_handler() {
    let mut router = Router::new();
    router.put("/item", reply("first")).unwrap();
    router.put("/item", reply("second")).unwrap();

    assert_eq!(router.len(), 1);
    assert_eq!(call(&router, Method::PUT, "/item").body(), "second");
}

#[test]
fn test_abort_in_router_middleware() {
    let log = Log::default();
    let step = |name: &'static str, abort: bool| {
        let log = Arc::clone(&log);
        from_next(name, move |ctx| {
            log.lock().push(name);
            if abort {
                ctx.abort();
                ctx.text(StatusCode::FORBIDDEN, "stopped")?;
            }
            ctx.next()
        })
    };

    let mut router = Router::new();
    router
        .use_middleware(step("a", false))
        .use_middleware(step("b", true))
        .use_middleware(step("c", false));
    let handler_log = Arc::clone(&log);
    router
        .get("/", handler(move |ctx| {
            handler_log.lock().push("h");
            ctx.text(StatusCode::OK, "reached")
        }))
        .unwrap();

    let response = call(&router, Method::GET, "/");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(response.body(), "stopped");
    assert_eq!(*log.lock(), vec!["a", "b"]);
}

#[test]
fn test_pooled_context_carries_no_previous_state() {
    let mut router = Router::new();
    router
        .get("/write/:id", handler(|ctx| {
            let id = ctx.param("id").unwrap_or_default().to_string();
            ctx.set("last", id);
            ctx.text(StatusCode::OK, "written")
        }))
        .unwrap()
        .get("/read", handler(|ctx| {
            let seen = ctx.get::<String>("last").cloned().unwrap_or_default();
            let params = ctx.params().len();
            ctx.text(StatusCode::OK, format!("{seen}|{params}"))
        }))
        .unwrap();

    call(&router, Method::GET, "/write/9");
    assert_eq!(router.pool().idle_count(), 1);
    assert_eq!(call(&router, Method::GET, "/read").body(), "|0");
}

#[test]
fn test_recover_then_reuse_pool() {
    let mut router = Router::new();
    router.use_middleware(recover());
    router
        .get("/panic", handler(|ctx| {
            ctx.set("dirty", 1_u8);
            panic!("boom")
        }))
        .unwrap()
        .get("/clean", handler(|ctx| {
            let dirty = ctx.contains("dirty");
            ctx.text(StatusCode::OK, dirty.to_string())
        }))
        .unwrap();

    assert_eq!(call(&router, Method::GET, "/panic").status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(call(&router, Method::GET, "/clean").body(), "false");
}

#[derive(Debug, Deserialize)]
struct NewUser {
    name: String,
}

#[test]
fn test_json_body_and_envelope() {
    let mut router = Router::new();
    router
        .post("/users", handler(|ctx| {
            let user: NewUser = ctx.bind_json()?;
            if user.name.is_empty() {
                return Err(HandlerError::bad_request("name required"));
            }
            ctx.ok(&serde_json::json!({ "name": user.name }))
        }))
        .unwrap();

    let request = Request::post("/users")
        .header("content-type", "application/json")
        .body(Bytes::from_static(br#"{"name":"ada"}"#))
        .unwrap();
    let response = router.dispatch(request).unwrap();
    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body, serde_json::json!({"success": true, "data": {"name": "ada"}}));

    let request = Request::post("/users")
        .body(Bytes::from_static(br#"{"name":""}"#))
        .unwrap();
    let err = router.dispatch(request).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

    let request = Request::post("/users").body(Bytes::from_static(b"not json")).unwrap();
    assert!(matches!(router.dispatch(request), Err(HandlerError::JsonDecode(_))));
}

#[test]
fn test_concurrent_dispatch() {
    let mut router = Router::new();
    router.get("/echo/:n", dump_params()).unwrap();
    let router = Arc::new(router);

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let router = Arc::clone(&router);
            std::thread::spawn(move || {
                for i in 0..50 {
                    let n = worker * 100 + i;
                    let response = call(&router, Method::GET, &format!("/echo/{n}"));
                    assert_eq!(response.body(), format!("n={n}").as_str());
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }
    assert!(router.pool().idle_count() <= 4);
}
