//! Context recycling.
//!
//! [`ContextPool`] keeps a free list of boxed [`Context`]s. [`acquire`]
//! hands out a [`PooledContext`] guard; dropping the guard resets the context
//! and returns it to the free list, whether the request finished, failed or
//! unwound from a panic.
//!
//! [`acquire`]: ContextPool::acquire

use std::ops::{Deref, DerefMut};

use bytes::Bytes;
use http::Request;
use parking_lot::Mutex;

use crate::constants::DEFAULT_POOL_MAX_IDLE;
use crate::context::{Ambient, Context};

/// A free list of reusable contexts.
///
/// # Example
///
/// ```
/// use tessera_core::ContextPool;
/// use http::Request;
///
/// let pool = ContextPool::new(8);
/// {
///     let mut ctx = pool.acquire(Request::default(), None);
///     ctx.set("user", 7_u32);
/// }
/// assert_eq!(pool.idle_count(), 1);
///
/// let ctx = pool.acquire(Request::default(), None);
/// assert!(!ctx.contains("user"));
/// ```
#[derive(Debug)]
pub struct ContextPool {
    free: Mutex<Vec<Box<Context>>>,
    max_idle: usize,
}

impl Default for ContextPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_MAX_IDLE)
    }
}

impl ContextPool {
    /// Creates a pool keeping at most `max_idle` contexts between requests.
    #[must_use]
    pub fn new(max_idle: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    /// Checks out a context for `request`.
    ///
    /// The context is empty apart from the request and `ambient`.
    #[must_use]
    pub fn acquire(&self, request: Request<Bytes>, ambient: Option<Ambient>) -> PooledContext<'_> {
        let mut ctx = self.free.lock().pop().unwrap_or_default();
        ctx.attach(request, ambient);
        PooledContext {
            pool: self,
            ctx: Some(ctx),
        }
    }

    fn release(&self, mut ctx: Box<Context>) {
        ctx.reset();
        let mut free = self.free.lock();
        if free.len() < self.max_idle {
            free.push(ctx);
        } else {
            tracing::trace!(max_idle = self.max_idle, "context pool full, dropping context");
        }
    }

    /// Returns the number of contexts waiting in the free list.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.free.lock().len()
    }

    /// Returns the free-list cap.
    #[must_use]
    pub fn max_idle(&self) -> usize {
        self.max_idle
    }
}

/// A checked-out context, returned to its pool on drop.
#[derive(Debug)]
pub struct PooledContext<'a> {
    pool: &'a ContextPool,
    ctx: Option<Box<Context>>,
}

impl Deref for PooledContext<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        // Only `Drop` empties the slot.
        self.ctx.as_deref().unwrap_or_else(|| unreachable!("context already released"))
    }
}

impl DerefMut for PooledContext<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        self.ctx
            .as_deref_mut()
            .unwrap_or_else(|| unreachable!("context already released"))
    }
}

impl Drop for PooledContext<'_> {
    fn drop(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            self.pool.release(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode};
    use std::sync::Arc;

    fn request(path: &str) -> Request<Bytes> {
        Request::builder().uri(path).body(Bytes::new()).unwrap()
    }

    #[test]
    fn test_acquire_attaches_request() {
        let pool = ContextPool::new(4);
        let ctx = pool.acquire(request("/users/1"), None);
        assert_eq!(ctx.path(), "/users/1");
        assert_eq!(ctx.method(), Method::GET);
    }

    #[test]
    fn test_release_on_drop() {
        let pool = ContextPool::new(4);
        assert_eq!(pool.idle_count(), 0);

        drop(pool.acquire(request("/"), None));
        assert_eq!(pool.idle_count(), 1);

        let _held = pool.acquire(request("/"), None);
        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn test_no_stale_state_after_release() {
        let pool = ContextPool::new(1);
        {
            let mut ctx = pool.acquire(request("/a"), Some(Arc::new(1_u8)));
            ctx.params_mut().push("id", "1");
            ctx.set("secret", "token".to_string());
            ctx.abort();
            ctx.text(StatusCode::ACCEPTED, "old body").unwrap();
        }

        let ctx = pool.acquire(request("/b"), None);
        assert!(ctx.params().is_empty());
        assert!(!ctx.contains("secret"));
        assert!(!ctx.is_aborted());
        assert!(!ctx.has_next());
        assert!(ctx.ambient::<u8>().is_none());
        assert_eq!(ctx.response().status(), StatusCode::OK);
        assert!(ctx.response().body().is_empty());
        assert_eq!(ctx.path(), "/b");
    }

    #[test]
    fn test_release_during_panic() {
        let pool = ContextPool::new(4);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut ctx = pool.acquire(request("/"), None);
            ctx.set("k", 1_i32);
            panic!("handler blew up");
        }));

        assert!(result.is_err());
        assert_eq!(pool.idle_count(), 1);
        assert!(!pool.acquire(request("/"), None).contains("k"));
    }

    #[test]
    fn test_max_idle_caps_free_list() {
        let pool = ContextPool::new(2);
        let held: Vec<_> = (0..5).map(|_| pool.acquire(request("/"), None)).collect();
        drop(held);

        assert_eq!(pool.idle_count(), 2);
        assert_eq!(pool.max_idle(), 2);
    }

    #[test]
    fn test_pool_is_shared_across_threads() {
        let pool = Arc::new(ContextPool::default());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let mut ctx = pool.acquire(request("/"), None);
                        assert!(!ctx.contains("worker"));
                        ctx.set("worker", i);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(pool.idle_count() <= 4);
    }
}
