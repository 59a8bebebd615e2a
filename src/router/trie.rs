use crate::error::RouteError;
use crate::router::params::Params;
use crate::router::pattern::{self, SegmentKind};

/// A node of a per-method route tree.
///
/// Every node owns one path segment. A node becomes terminal once a route
/// pattern ends on it; only terminal nodes carry a value (the handler chain
/// in the engine). Wildcard children are always kept after static ones, and
/// a node has at most one wildcard child.
#[derive(Debug)]
pub struct Node<T> {
    pattern: String,
    segment: String,
    kind: SegmentKind,
    children: Vec<Node<T>>,
    value: Option<T>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Node::new()
    }
}

impl<T> Node<T> {
    /// An empty root node.
    pub fn new() -> Node<T> {
        Node::with_segment("")
    }

    fn with_segment(segment: &str) -> Node<T> {
        Node {
            pattern: String::new(),
            segment: segment.to_string(),
            kind: SegmentKind::of(segment),
            children: Vec::new(),
            value: None,
        }
    }

    /// The full pattern registered on this node, empty unless terminal.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn is_wild(&self) -> bool {
        self.kind.is_wild()
    }

    pub fn is_terminal(&self) -> bool {
        !self.pattern.is_empty()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn children(&self) -> &[Node<T>] {
        &self.children
    }

    /// Parses `pattern` and inserts it with `value`.
    pub fn add_route(&mut self, pattern: &str, value: T) -> Result<(), RouteError> {
        let segments = pattern::parse_pattern(pattern)?;
        self.insert(pattern, &segments, 0, value)
    }

    /// Descends one segment per level, creating nodes as needed, and binds
    /// `pattern` and `value` where the segments run out.
    pub fn insert(
        &mut self,
        pattern: &str,
        segments: &[&str],
        depth: usize,
        value: T,
    ) -> Result<(), RouteError> {
        if depth == segments.len() {
            if self.is_terminal() {
                return Err(RouteError::PatternConflict {
                    pattern: pattern.to_string(),
                    existing: self.pattern.clone(),
                });
            }
            self.pattern = pattern.to_string();
            self.value = Some(value);
            return Ok(());
        }

        let segment = segments[depth];
        let index = match self.children.iter().position(|c| c.segment == segment) {
            Some(index) => index,
            None => self.add_child(Node::with_segment(segment))?,
        };
        self.children[index].insert(pattern, segments, depth + 1, value)
    }

    // Wildcards stay last among siblings; returns where the child landed.
    fn add_child(&mut self, child: Node<T>) -> Result<usize, RouteError> {
        if let Some(last) = self.children.last() {
            if last.kind == SegmentKind::CatchAll {
                return Err(RouteError::CatchAllConflict {
                    segment: child.segment,
                    existing: last.segment.clone(),
                });
            }
            if last.is_wild() {
                if child.is_wild() {
                    return Err(RouteError::WildcardConflict {
                        segment: child.segment,
                        existing: last.segment.clone(),
                    });
                }
                let at = self.children.len() - 1;
                self.children.insert(at, child);
                return Ok(at);
            }
        }
        self.children.push(child);
        Ok(self.children.len() - 1)
    }

    /// Finds the terminal node matching `segments`, trying static children
    /// before the wildcard one. A catch-all node stops the descent wherever
    /// it is reached.
    pub fn search(&self, segments: &[&str], depth: usize) -> Option<&Node<T>> {
        if depth == segments.len() || self.kind == SegmentKind::CatchAll {
            return if self.is_terminal() { Some(self) } else { None };
        }

        let segment = segments[depth];
        self.children
            .iter()
            .filter(|child| child.is_wild() || child.segment == segment)
            .find_map(|child| child.search(segments, depth + 1))
    }

    /// Looks up a percent-encoded request `path` and binds the decoded
    /// parameters of the route it matched.
    pub fn get_route(&self, path: &str) -> Option<(&Node<T>, Params)> {
        let decoded = pattern::split_decoded(path);
        let segments: Vec<&str> = decoded.iter().map(|s| s.as_ref()).collect();
        let node = self.search(&segments, 0)?;

        let mut params = Params::new();
        for (i, part) in pattern::split(&node.pattern).into_iter().enumerate() {
            match SegmentKind::of(part) {
                SegmentKind::Param => {
                    let name = &part[1..];
                    if let (false, Some(value)) = (name.is_empty(), segments.get(i)) {
                        params.insert(name, value);
                    }
                }
                SegmentKind::CatchAll => {
                    let name = &part[1..];
                    if !name.is_empty() {
                        let rest = segments.get(i..).map(|r| r.join("/"));
                        params.insert(name, &rest.unwrap_or_default());
                    }
                    break;
                }
                SegmentKind::Static => {}
            }
        }
        Some((node, params))
    }

    /// Every pattern registered at or below this node, depth first.
    pub fn routes(&self) -> Vec<&str> {
        let mut list = Vec::new();
        self.collect_routes(&mut list);
        list
    }

    fn collect_routes<'a>(&'a self, list: &mut Vec<&'a str>) {
        if self.is_terminal() {
            list.push(&self.pattern);
        }
        for child in &self.children {
            child.collect_routes(list);
        }
    }
}
