use std::collections::BTreeMap;

use crate::error::RouteError;
use crate::router::params::Params;
use crate::router::trie::Node;

/// One route tree per HTTP method.
#[derive(Debug)]
pub struct Routes<T> {
    trees: BTreeMap<String, Node<T>>,
}

impl<T> Default for Routes<T> {
    fn default() -> Self {
        Routes::new()
    }
}

impl<T> Routes<T> {
    pub fn new() -> Routes<T> {
        Routes {
            trees: BTreeMap::new(),
        }
    }

    /// Registers `value` under `method` and `pattern`. The tree for a method
    /// is created the first time the method is seen.
    pub fn add_route(&mut self, method: &str, pattern: &str, value: T) -> Result<(), RouteError> {
        if method.is_empty() {
            return Err(RouteError::EmptyMethod);
        }
        if !pattern.starts_with('/') {
            return Err(RouteError::MissingLeadingSlash(pattern.to_string()));
        }

        self.trees
            .entry(method.to_string())
            .or_insert_with(Node::new)
            .add_route(pattern, value)
    }

    /// The tree for `method`, if anything was registered for it.
    pub fn tree(&self, method: &str) -> Option<&Node<T>> {
        self.trees.get(method)
    }

    /// Lookup allows the manual lookup of a method + path combo.
    pub fn get_route(&self, method: &str, path: &str) -> Option<(&Node<T>, Params)> {
        self.tree(method).and_then(|root| root.get_route(path))
    }

    /// Methods with at least one registered route, in sorted order.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(String::as_str)
    }
}
