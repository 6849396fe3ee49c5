//! End-to-end middleware chain tests.
//!
//! These tests stack the bundled middleware with user middleware written in
//! every supported style and check ordering, abort and panic handling
//! together.

use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Request, StatusCode};
use parking_lot::Mutex;
use tessera_core::{handler, Context, Handler, HandlerError};
use tessera_middleware::{
    around, compose, from_next,
    stages::{logger, recover, RequestLog, REQUEST_LOG_KEY},
    BoxedMiddleware, FnMiddleware,
};

type Log = Arc<Mutex<Vec<&'static str>>>;

/// Creates a context for a request with optional authorization.
fn make_ctx(path: &str, token: Option<&str>) -> Context {
    let mut builder = Request::builder().method(Method::GET).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", token);
    }
    Context::with_request(builder.body(Bytes::new()).unwrap())
}

fn auth(log: &Log) -> BoxedMiddleware {
    let log = Arc::clone(log);
    from_next("auth", move |ctx| {
        log.lock().push("auth");
        if ctx.header("authorization").is_none() {
            ctx.abort();
            ctx.error(StatusCode::UNAUTHORIZED, "missing token")?;
        }
        ctx.next()
    })
}

fn timing(log: &Log) -> BoxedMiddleware {
    let log = Arc::clone(log);
    around("timing", move |ctx, next| {
        log.lock().push("timing:start");
        let result = next(ctx);
        log.lock().push("timing:end");
        result
    })
}

fn tagging(log: &Log) -> BoxedMiddleware {
    let log = Arc::clone(log);
    Arc::new(FnMiddleware::new("tagging", move |next: Handler| {
        let log = Arc::clone(&log);
        handler(move |ctx| {
            log.lock().push("tagging");
            next(ctx)?;
            ctx.set_header("x-tagged", "yes")?;
            Ok(())
        })
    }))
}

fn endpoint(log: &Log) -> Handler {
    let log = Arc::clone(log);
    handler(move |ctx| {
        log.lock().push("handler");
        let path = ctx.path().to_string();
        ctx.ok(&serde_json::json!({ "path": path }))
    })
}

fn full_stack(log: &Log) -> Handler {
    compose(
        endpoint(log),
        &[recover(), logger(), timing(log), auth(log), tagging(log)],
    )
}

#[test]
fn test_full_stack_success() {
    let log = Log::default();
    let chain = full_stack(&log);

    let mut ctx = make_ctx("/items", Some("Bearer t"));
    chain(&mut ctx).unwrap();

    assert_eq!(
        *log.lock(),
        vec!["timing:start", "auth", "tagging", "handler", "timing:end"]
    );
    assert_eq!(ctx.response().status(), StatusCode::OK);
    assert_eq!(ctx.response().headers()["x-tagged"], "yes");

    let body: serde_json::Value = serde_json::from_slice(ctx.response().body()).unwrap();
    assert_eq!(body, serde_json::json!({"success": true, "data": {"path": "/items"}}));

    let record = ctx.get::<RequestLog>(REQUEST_LOG_KEY).unwrap();
    assert_eq!(record.status, StatusCode::OK);
}

#[test]
fn test_full_stack_abort() {
    let log = Log::default();
    let chain = full_stack(&log);

    let mut ctx = make_ctx("/items", None);
    chain(&mut ctx).unwrap();

    // Tagging and the handler are skipped; timing still finishes
    assert_eq!(*log.lock(), vec!["timing:start", "auth", "timing:end"]);
    assert_eq!(ctx.response().status(), StatusCode::UNAUTHORIZED);
    assert!(ctx.response().headers().get("x-tagged").is_none());

    let record = ctx.get::<RequestLog>(REQUEST_LOG_KEY).unwrap();
    assert_eq!(record.status, StatusCode::UNAUTHORIZED);
}

#[test]
fn test_full_stack_panic() {
    let log = Log::default();
    let chain = compose(
        handler(|_| panic!("database handle poisoned")),
        &[recover(), logger(), timing(&log), auth(&log)],
    );

    let mut ctx = make_ctx("/items", Some("Bearer t"));
    chain(&mut ctx).unwrap();

    assert_eq!(ctx.response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    // The panic unwound through timing before its end marker
    assert_eq!(*log.lock(), vec!["timing:start", "auth"]);
    assert!(!ctx.has_next());
    assert!(!ctx.is_aborted());
}

#[test]
fn test_full_stack_error_passthrough() {
    let log = Log::default();
    let chain = compose(
        handler(|_| Err(HandlerError::status(StatusCode::CONFLICT, "version mismatch"))),
        &[recover(), logger(), auth(&log)],
    );

    let mut ctx = make_ctx("/items", Some("Bearer t"));
    let err = chain(&mut ctx).unwrap_err();

    assert_eq!(err.status_code(), StatusCode::CONFLICT);
    assert!(ctx.get::<RequestLog>(REQUEST_LOG_KEY).unwrap().failed);
}

#[test]
fn test_chain_reused_across_contexts() {
    let log = Log::default();
    let chain = full_stack(&log);

    for _ in 0..3 {
        let mut ctx = make_ctx("/items", Some("Bearer t"));
        chain(&mut ctx).unwrap();
        assert_eq!(ctx.response().status(), StatusCode::OK);
    }
    assert_eq!(log.lock().iter().filter(|s| **s == "handler").count(), 3);
}
