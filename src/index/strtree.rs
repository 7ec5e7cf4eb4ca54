//! Sort-Tile-Recursive packed R-tree.
//!
//! The tree is bulk-loaded: items are sorted by the x of their envelope
//! centres, cut into vertical slices, each slice sorted by y and packed into
//! leaves of `node_capacity` entries; parent levels are packed the same way
//! until a single root remains.
//!
//! ## Insert policy
//!
//! STR is a bulk algorithm, so `insert` does not split nodes. New entries go
//! to a pending buffer that queries scan linearly. When the buffer grows past
//! `max(node_capacity, indexed / 4)` entries the whole tree is repacked, which
//! keeps inserts amortized O(log n) and the packed tree close to optimal.
//!
//! ## Example
//!
//! ```rust
//! use planar::index::StrTree;
//! use planar_types::Envelope;
//!
//! let mut tree = StrTree::new();
//! tree.insert(Envelope::new(0.0, 1.0, 0.0, 1.0), "a");
//! tree.insert(Envelope::new(5.0, 6.0, 5.0, 6.0), "b");
//!
//! let hits = tree.query(&Envelope::new(0.5, 2.0, 0.5, 2.0));
//! assert_eq!(hits, vec![&"a"]);
//! assert!(tree.remove(&Envelope::new(0.0, 1.0, 0.0, 1.0), &"a"));
//! assert_eq!(tree.size(), 1);
//! ```

use planar_types::Envelope;

/// Default number of children per node.
pub const DEFAULT_NODE_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
enum Node<T> {
    Leaf {
        envelope: Envelope,
        entries: Vec<(Envelope, T)>,
    },
    Branch {
        envelope: Envelope,
        children: Vec<Node<T>>,
    },
}

impl<T> Node<T> {
    fn envelope(&self) -> &Envelope {
        match self {
            Node::Leaf { envelope, .. } | Node::Branch { envelope, .. } => envelope,
        }
    }

    fn drain_into(self, out: &mut Vec<(Envelope, T)>) {
        match self {
            Node::Leaf { entries, .. } => out.extend(entries),
            Node::Branch { children, .. } => {
                for child in children {
                    child.drain_into(out);
                }
            }
        }
    }

    fn visit<'a, F: FnMut(&'a Envelope, &'a T)>(&'a self, query: &Envelope, f: &mut F) {
        if !self.envelope().intersects(query) {
            return;
        }
        match self {
            Node::Leaf { entries, .. } => {
                for (env, item) in entries {
                    if env.intersects(query) {
                        f(env, item);
                    }
                }
            }
            Node::Branch { children, .. } => {
                for child in children {
                    child.visit(query, f);
                }
            }
        }
    }

    fn for_each_in_order<'a, F: FnMut(&'a Envelope, &'a T)>(&'a self, f: &mut F) {
        match self {
            Node::Leaf { entries, .. } => {
                for (env, item) in entries {
                    f(env, item);
                }
            }
            Node::Branch { children, .. } => {
                for child in children {
                    child.for_each_in_order(f);
                }
            }
        }
    }

    fn remove(&mut self, env: &Envelope, item: &T) -> Option<T>
    where
        T: PartialEq,
    {
        if !self.envelope().contains(env) {
            return None;
        }
        match self {
            Node::Leaf { entries, .. } => {
                let pos = entries.iter().position(|(e, i)| e == env && i == item)?;
                Some(entries.remove(pos).1)
            }
            Node::Branch { children, .. } => children.iter_mut().find_map(|c| c.remove(env, item)),
        }
    }
}

/// A bulk-loaded spatial index over `(Envelope, T)` pairs.
///
/// The tree has no internal locking; see `SyncStrTree` (feature `sync`) for a
/// shareable wrapper.
#[derive(Debug, Clone)]
pub struct StrTree<T> {
    node_capacity: usize,
    root: Option<Node<T>>,
    pending: Vec<(Envelope, T)>,
    indexed: usize,
}

impl<T> Default for StrTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StrTree<T> {
    pub fn new() -> Self {
        Self::with_node_capacity(DEFAULT_NODE_CAPACITY)
    }

    /// Create a tree with a custom branching factor (at least 2).
    pub fn with_node_capacity(node_capacity: usize) -> Self {
        Self {
            node_capacity: node_capacity.max(2),
            root: None,
            pending: Vec::new(),
            indexed: 0,
        }
    }

    /// Build a packed tree from `items` in one pass.
    pub fn bulk_load(items: Vec<(Envelope, T)>) -> Self {
        Self::bulk_load_with_node_capacity(items, DEFAULT_NODE_CAPACITY)
    }

    pub fn bulk_load_with_node_capacity(items: Vec<(Envelope, T)>, node_capacity: usize) -> Self {
        let mut tree = Self::with_node_capacity(node_capacity);
        tree.pending = items.into_iter().filter(|(env, _)| !env.is_null()).collect();
        tree.build();
        tree
    }

    pub fn node_capacity(&self) -> usize {
        self.node_capacity
    }

    /// Number of stored items. O(1).
    pub fn size(&self) -> usize {
        self.indexed + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Add an item. It is visible to queries immediately.
    pub fn insert(&mut self, envelope: Envelope, item: T) {
        if envelope.is_null() {
            return;
        }
        self.pending.push((envelope, item));
        if self.pending.len() > self.node_capacity.max(self.indexed / 4) {
            self.build();
        }
    }

    /// Pack every item, pending ones included, into a fresh STR tree.
    pub fn build(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let mut entries = Vec::with_capacity(self.size());
        if let Some(root) = self.root.take() {
            root.drain_into(&mut entries);
        }
        entries.append(&mut self.pending);
        self.indexed = entries.len();
        log::debug!("Packing STR tree with {} items", self.indexed);
        self.root = pack(entries, self.node_capacity);
    }

    /// Items whose envelope intersects `query`.
    pub fn query(&self, query: &Envelope) -> Vec<&T> {
        let mut out = Vec::new();
        self.query_visit(query, |item| out.push(item));
        out
    }

    /// Call `visitor` for every item whose envelope intersects `query`.
    pub fn query_visit<'a, F: FnMut(&'a T)>(&'a self, query: &Envelope, mut visitor: F) {
        self.query_entries(query, |_, item| visitor(item));
    }

    /// Like [`StrTree::query_visit`], also passing the stored envelope.
    pub fn query_entries<'a, F: FnMut(&'a Envelope, &'a T)>(&'a self, query: &Envelope, mut f: F) {
        if query.is_null() {
            return;
        }
        if !query.is_finite() {
            log::warn!("Rejecting STR tree query with non-finite envelope");
            return;
        }
        if let Some(root) = &self.root {
            root.visit(query, &mut f);
        }
        for (env, item) in &self.pending {
            if env.intersects(query) {
                f(env, item);
            }
        }
    }

    /// Remove the entry stored with exactly this envelope and item.
    pub fn remove(&mut self, envelope: &Envelope, item: &T) -> bool
    where
        T: PartialEq,
    {
        if let Some(pos) = self
            .pending
            .iter()
            .position(|(e, i)| e == envelope && i == item)
        {
            self.pending.remove(pos);
            return true;
        }
        let removed = self
            .root
            .as_mut()
            .and_then(|root| root.remove(envelope, item))
            .is_some();
        if removed {
            self.indexed -= 1;
            if self.indexed == 0 {
                self.root = None;
            }
        }
        removed
    }

    /// Items in leaf order of the packed tree; spatially close items end up
    /// next to each other. Pending items are packed first.
    pub fn items_in_order(&mut self) -> Vec<&T> {
        self.build();
        let mut out = Vec::with_capacity(self.size());
        if let Some(root) = &self.root {
            root.for_each_in_order(&mut |_, item| out.push(item));
        }
        out
    }

    /// Consume the tree, returning items in leaf order.
    pub fn into_items_in_order(mut self) -> Vec<T> {
        self.build();
        let mut entries = Vec::with_capacity(self.size());
        if let Some(root) = self.root.take() {
            root.drain_into(&mut entries);
        }
        entries.into_iter().map(|(_, item)| item).collect()
    }

    /// Depth of the packed tree (0 when empty).
    pub fn depth(&self) -> usize {
        fn depth<T>(node: &Node<T>) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Branch { children, .. } => 1 + children.iter().map(depth).max().unwrap_or(0),
            }
        }
        self.root.as_ref().map(depth).unwrap_or(0)
    }
}

fn centre_x(env: &Envelope) -> f64 {
    (env.min_x() + env.max_x()) / 2.0
}

fn centre_y(env: &Envelope) -> f64 {
    (env.min_y() + env.max_y()) / 2.0
}

/// Split `items` into slices for one STR level: sort by x, cut into
/// `ceil(sqrt(node_count))` vertical slices, sort each slice by y.
fn tile<I, F>(mut items: Vec<I>, capacity: usize, env_of: F) -> Vec<Vec<I>>
where
    F: Fn(&I) -> &Envelope,
{
    let node_count = items.len().div_ceil(capacity);
    let slice_count = (node_count as f64).sqrt().ceil().max(1.0) as usize;
    let slice_len = items.len().div_ceil(slice_count);
    items.sort_by(|a, b| centre_x(env_of(a)).total_cmp(&centre_x(env_of(b))));

    let mut groups = Vec::with_capacity(node_count);
    let mut rest = items;
    while !rest.is_empty() {
        let tail = rest.split_off(slice_len.min(rest.len()));
        let mut slice = rest;
        rest = tail;
        slice.sort_by(|a, b| centre_y(env_of(a)).total_cmp(&centre_y(env_of(b))));
        while !slice.is_empty() {
            let tail = slice.split_off(capacity.min(slice.len()));
            groups.push(slice);
            slice = tail;
        }
    }
    groups
}

fn pack<T>(entries: Vec<(Envelope, T)>, capacity: usize) -> Option<Node<T>> {
    if entries.is_empty() {
        return None;
    }
    let mut level: Vec<Node<T>> = tile(entries, capacity, |(env, _)| env)
        .into_iter()
        .map(|entries| {
            let mut envelope = Envelope::null();
            for (env, _) in &entries {
                envelope.expand_to_include(env);
            }
            Node::Leaf { envelope, entries }
        })
        .collect();
    while level.len() > 1 {
        level = tile(level, capacity, Node::envelope)
            .into_iter()
            .map(|children| {
                let mut envelope = Envelope::null();
                for child in &children {
                    envelope.expand_to_include(child.envelope());
                }
                Node::Branch { envelope, children }
            })
            .collect();
    }
    level.pop()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize) -> Vec<(Envelope, usize)> {
        (0..n)
            .map(|i| {
                let x = (i % 50) as f64;
                let y = (i / 50) as f64;
                (Envelope::new(x, x + 0.5, y, y + 0.5), i)
            })
            .collect()
    }

    #[test]
    fn test_bulk_load_query_matches_scan() {
        let items = grid(1000);
        let tree = StrTree::bulk_load(items.clone());
        assert_eq!(tree.size(), 1000);
        let q = Envelope::new(10.2, 14.8, 3.1, 6.0);
        let mut hits: Vec<usize> = tree.query(&q).into_iter().copied().collect();
        hits.sort_unstable();
        let mut expected: Vec<usize> = items
            .iter()
            .filter(|(e, _)| e.intersects(&q))
            .map(|(_, i)| *i)
            .collect();
        expected.sort_unstable();
        assert_eq!(hits, expected);
        assert!(tree.depth() >= 3);
    }

    #[test]
    fn test_insert_policy_rebuilds() {
        let mut tree = StrTree::with_node_capacity(4);
        for (env, i) in grid(100) {
            tree.insert(env, i);
        }
        assert_eq!(tree.size(), 100);
        // pending buffer stays bounded
        assert!(tree.pending.len() <= 4.max(tree.indexed / 4));
        assert_eq!(tree.query(&Envelope::new(0.0, 0.1, 0.0, 0.1)), vec![&0]);
    }

    #[test]
    fn test_remove_exact_match_only() {
        let mut tree = StrTree::bulk_load(grid(30));
        let env = Envelope::new(3.0, 3.5, 0.0, 0.5);
        assert!(!tree.remove(&env, &4));
        assert!(tree.remove(&env, &3));
        assert!(!tree.remove(&env, &3));
        assert_eq!(tree.size(), 29);
        assert!(tree.query(&env).is_empty());
    }

    #[test]
    fn test_non_finite_query_is_empty() {
        let tree = StrTree::bulk_load(grid(10));
        let q = Envelope::new(f64::NEG_INFINITY, 1.0, 0.0, 1.0);
        assert!(tree.query(&q).is_empty());
    }

    #[test]
    fn test_items_in_order_keeps_everything() {
        let mut tree = StrTree::bulk_load(grid(57));
        tree.insert(Envelope::new(100.0, 101.0, 0.0, 1.0), 999);
        let mut all: Vec<usize> = tree.items_in_order().into_iter().copied().collect();
        all.sort_unstable();
        assert_eq!(all.len(), 58);
        assert_eq!(all[57], 999);
    }
}
