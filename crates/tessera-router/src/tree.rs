//! Method-aware route tree.
//!
//! [`RouteTree`] prefixes every pattern with its method name before inserting
//! it into the underlying [`Node`] trie, so `GET /users/:id` is stored under
//! the key `GET/users/:id`.

use http::Method;

use crate::error::RouteResult;
use crate::node::Node;
use crate::params::Params;
use crate::RouteMatch;

/// A route tree mapping `(method, pattern)` to values of type `T`.
///
/// # Example
///
/// ```rust
/// use tessera_router::RouteTree;
/// use http::Method;
///
/// let mut tree = RouteTree::new();
/// tree.insert(&Method::GET, "/users/:id", "getUser").unwrap();
/// tree.insert(&Method::GET, "/files/*", "serveFile").unwrap();
///
/// let found = tree.search(&Method::GET, "/users/42").unwrap();
/// assert_eq!(*found.value, "getUser");
/// assert_eq!(found.params.get("id"), Some("42"));
///
/// let found = tree.search(&Method::GET, "/files/a/b/c").unwrap();
/// assert_eq!(found.params.get("*"), Some("a/b/c"));
/// ```
///
/// # Match Priority
///
/// At every level, independently:
///
/// 1. **Static** child with identical text
/// 2. **Parameter** children (`:id`, `:a-:b`, `v::id`, `:id(,)`) whose matcher accepts
/// 3. **Multi-segment** child (`+`), consuming the rest of the path
/// 4. **Catch-all** child (`*`), consuming the rest of the path
///
/// A level that matched is never revisited.
#[derive(Debug, Clone)]
pub struct RouteTree<T> {
    root: Node<T>,
    route_count: usize,
}

impl<T> Default for RouteTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RouteTree<T> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Builds the combined key a route is stored under.
    ///
    /// ```rust
    /// use tessera_router::RouteTree;
    /// use http::Method;
    ///
    /// assert_eq!(RouteTree::<()>::route_key(&Method::GET, "/users"), "GET/users");
    /// assert_eq!(RouteTree::<()>::route_key(&Method::POST, "users"), "POST/users");
    /// ```
    #[must_use]
    pub fn route_key(method: &Method, path: &str) -> String {
        let mut key = String::with_capacity(method.as_str().len() + path.len() + 1);
        key.push_str(method.as_str());
        if !path.starts_with('/') {
            key.push('/');
        }
        key.push_str(path);
        key
    }

    /// Registers `value` for `method` and `pattern`.
    ///
    /// Registering the same method and pattern again replaces the previous
    /// value, which is returned.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`](crate::RouteError) if the pattern is malformed,
    /// repeats a parameter name, places `*`/`+` before the last segment, or adds
    /// a second wildcard next to an existing one. The tree is unchanged in that
    /// case.
    pub fn insert(&mut self, method: &Method, pattern: &str, value: T) -> RouteResult<Option<T>> {
        let key = Self::route_key(method, pattern);
        let replaced = self.root.insert(&key, value)?;
        if replaced.is_none() {
            self.route_count += 1;
        }
        tracing::debug!(route = %key, replaced = replaced.is_some(), "route registered");
        Ok(replaced)
    }

    /// Finds the value registered for `method` and `path`.
    #[must_use]
    pub fn search(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        let mut params = Params::new();
        let value = self.search_into(method, path, &mut params)?;
        Some(RouteMatch::new(value, params))
    }

    /// Like [`search`](Self::search), appending captures to a caller-owned set.
    ///
    /// On a miss `params` is left as it was.
    pub fn search_into(&self, method: &Method, path: &str, params: &mut Params) -> Option<&T> {
        // The method is the first key segment: enter its subtree directly
        // instead of building the combined key.
        self.root.child(method.as_str())?.search(path, params)
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> &Node<T> {
        &self.root
    }

    /// Returns the number of distinct routes registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns `true` if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RouteError;

    #[test]
    fn test_tree_new() {
        let tree: RouteTree<&str> = RouteTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_tree_param_route() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::GET, "/user/:id", "h").unwrap();

        let found = tree.search(&Method::GET, "/user/42").unwrap();
        assert_eq!(*found.value, "h");
        assert_eq!(found.params.iter().collect::<Vec<_>>(), vec![("id", "42")]);
    }

    #[test]
    fn test_tree_catch_all_route() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::GET, "/files/*", "h").unwrap();

        let found = tree.search(&Method::GET, "/files/a/b/c").unwrap();
        assert_eq!(found.params.iter().collect::<Vec<_>>(), vec![("*", "a/b/c")]);
    }

    #[test]
    fn test_tree_methods_are_separate() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::GET, "/users", "list").unwrap();
        tree.insert(&Method::POST, "/users", "create").unwrap();

        assert_eq!(*tree.search(&Method::GET, "/users").unwrap().value, "list");
        assert_eq!(*tree.search(&Method::POST, "/users").unwrap().value, "create");
        assert!(tree.search(&Method::DELETE, "/users").is_none());
    }

    #[test]
    fn test_tree_reregistration_overwrites() {
        let mut tree = RouteTree::new();
        assert_eq!(tree.insert(&Method::GET, "/users", "first").unwrap(), None);
        assert_eq!(
            tree.insert(&Method::GET, "/users", "second").unwrap(),
            Some("first")
        );

        assert_eq!(tree.len(), 1);
        assert_eq!(*tree.search(&Method::GET, "/users").unwrap().value, "second");
    }

    #[test]
    fn test_tree_root_path() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::GET, "/", "root").unwrap();

        assert_eq!(*tree.search(&Method::GET, "/").unwrap().value, "root");
        assert_eq!(*tree.search(&Method::GET, "").unwrap().value, "root");
    }

    #[test]
    fn test_tree_custom_method() {
        let method = Method::from_bytes(b"PURGE").unwrap();
        let mut tree = RouteTree::new();
        tree.insert(&method, "/cache/*", "purge").unwrap();

        assert!(tree.search(&method, "/cache/img/logo.png").is_some());
        assert!(tree.search(&Method::GET, "/cache/img/logo.png").is_none());
    }

    #[test]
    fn test_tree_wildcard_conflict_is_per_method() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::GET, "/users/:id", "get").unwrap();
        // A different method is a different subtree
        tree.insert(&Method::PUT, "/users/:user", "put").unwrap();

        let err = tree.insert(&Method::GET, "/users/:user", "x").unwrap_err();
        assert!(matches!(err, RouteError::ConflictingWildcard { .. }));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_tree_search_into_preserves_params_on_miss() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::GET, "/a/:x", "a").unwrap();

        let mut params = Params::new();
        assert!(tree.search_into(&Method::GET, "/b/1", &mut params).is_none());
        assert!(params.is_empty());

        assert!(tree.search_into(&Method::GET, "/a/1", &mut params).is_some());
        assert_eq!(params.get("x"), Some("1"));
    }

    #[test]
    fn test_tree_clone() {
        let mut tree = RouteTree::new();
        tree.insert(&Method::GET, "/users", "list").unwrap();

        let cloned = tree.clone();
        assert!(cloned.search(&Method::GET, "/users").is_some());
    }
}
