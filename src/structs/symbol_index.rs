use std::cmp::Ordering;
use std::fmt;

use crate::structs::TimeSeries;

type Link = Option<Box<SymbolNode>>;

struct SymbolNode {
    symbol: String,
    series: TimeSeries,
    left: Link,
    right: Link,
}

impl SymbolNode {
    fn new(symbol: String, series: TimeSeries) -> Self {
        Self {
            symbol,
            series,
            left: None,
            right: None,
        }
    }
}

/// Unbalanced binary search tree from symbol to its [`TimeSeries`].
///
/// Keys compare byte-wise (`Ord for str`), so the index is case-sensitive.
/// Everything in a node's left subtree is strictly smaller than the node's
/// key and everything in its right subtree is greater or equal. Inserting a
/// key that is already present adds a second node to the right: it shows up
/// in [`all_symbols`](Self::all_symbols) after the first one but [`search`](Self::search)
/// always stops at the first.
///
/// Shape follows insertion order. Sorted input degrades to a linked chain, so
/// every walk here, formatting included, is iterative.
#[derive(Default)]
pub struct SymbolIndex {
    root: Link,
    len: usize,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    pub fn insert(&mut self, symbol: impl Into<String>, series: TimeSeries) {
        let symbol = symbol.into();
        let mut link = &mut self.root;
        while let Some(node) = link {
            link = if symbol < node.symbol {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *link = Some(Box::new(SymbolNode::new(symbol, series)));
        self.len += 1;
    }

    pub fn search(&self, symbol: &str) -> Option<&TimeSeries> {
        self.locate(symbol).0.map(|node| &node.series)
    }

    pub fn search_mut(&mut self, symbol: &str) -> Option<&mut TimeSeries> {
        let mut cur = self.root.as_deref_mut();
        while let Some(node) = cur {
            match symbol.cmp(node.symbol.as_str()) {
                Ordering::Equal => return Some(&mut node.series),
                Ordering::Less => cur = node.left.as_deref_mut(),
                Ordering::Greater => cur = node.right.as_deref_mut(),
            }
        }
        None
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.locate(symbol).0.is_some()
    }

    /// Keys in ascending order, duplicates included.
    pub fn all_symbols(&self) -> Vec<String> {
        self.iter().map(|(symbol, _)| symbol.to_string()).collect()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(&SymbolNode, usize)> =
            self.root.as_deref().map(|root| (root, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            for child in [node.left.as_deref(), node.right.as_deref()].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        height
    }

    // Returns the first matching node along with the number of key comparisons made.
    fn locate(&self, symbol: &str) -> (Option<&SymbolNode>, usize) {
        let mut comparisons = 0;
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            comparisons += 1;
            match symbol.cmp(node.symbol.as_str()) {
                Ordering::Equal => return (Some(node), comparisons),
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => cur = node.right.as_deref(),
            }
        }
        (None, comparisons)
    }
}

impl fmt::Debug for SymbolIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Drop for SymbolIndex {
    fn drop(&mut self) {
        // Box's own drop recurses once per level.
        let mut pending: Vec<Box<SymbolNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

/// In-order walk over `(symbol, series)` pairs.
pub struct Iter<'a> {
    stack: Vec<&'a SymbolNode>,
}

impl<'a> Iter<'a> {
    fn new(root: Option<&'a SymbolNode>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut cur: Option<&'a SymbolNode>) {
        while let Some(node) = cur {
            self.stack.push(node);
            cur = node.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a TimeSeries);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some((node.symbol.as_str(), &node.series))
    }
}

impl<'a> IntoIterator for &'a SymbolIndex {
    type Item = (&'a str, &'a TimeSeries);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
