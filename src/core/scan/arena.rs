use std::collections::HashMap;

/// Half-open byte range into a file's source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overlaps(&self, other: &ByteRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Stable handle to a text-bearing node of one scanned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct TextNode {
    pub range: ByteRange,
    /// Exact source text the range is expected to cover, when known.
    pub raw: Option<String>,
}

/// Arena of text nodes, interned by source range.
///
/// Two nodes with equal text are still distinct entries; identity is the
/// range. The `visited` side-table guarantees each node is flagged once per
/// scan.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<TextNode>,
    visited: Vec<bool>,
    by_range: HashMap<ByteRange, NodeId>,
}

impl NodeArena {
    pub fn intern(&mut self, range: ByteRange, raw: Option<String>) -> NodeId {
        if let Some(id) = self.by_range.get(&range) {
            return *id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(TextNode { range, raw });
        self.visited.push(false);
        self.by_range.insert(range, id);
        id
    }

    /// Flag a node as visited. Returns false if it already was.
    pub fn mark_visited(&mut self, id: NodeId) -> bool {
        match self.visited.get_mut(id.index()) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&TextNode> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
