//! Comments and their attachment to nodes.
//!
//! Every comment in a file is stored once in a [`CommentStore`]. Nodes refer
//! to comments by [`CommentId`] through [`CommentAttachments`], keyed by the
//! node's [`NodeId`], so a comment can be both trailing for one node and
//! leading for the next without being duplicated.

use crate::node::NodeId;
use parsley_core::{FxHashMap, SourceSpan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommentId(u32);

impl CommentId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub kind: CommentKind,
    /// Text without the delimiters.
    pub text: String,
    pub span: SourceSpan,
}

/// All comments of a file in source order.
#[derive(Debug, Clone, Default)]
pub struct CommentStore {
    comments: Vec<Comment>,
}

impl CommentStore {
    pub fn new(comments: Vec<Comment>) -> Self {
        Self { comments }
    }

    pub fn get(&self, id: CommentId) -> Option<&Comment> {
        self.comments.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Comment> {
        self.comments.iter()
    }
}

impl<'s> IntoIterator for &'s CommentStore {
    type Item = &'s Comment;
    type IntoIter = std::slice::Iter<'s, Comment>;

    fn into_iter(self) -> Self::IntoIter {
        self.comments.iter()
    }
}

/// Comments associated with one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeComments {
    pub leading: Vec<CommentId>,
    pub trailing: Vec<CommentId>,
    /// Comments inside a node that has no child to carry them, like `{ /* x */ }`.
    pub inner: Vec<CommentId>,
}

impl NodeComments {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty() && self.inner.is_empty()
    }
}

/// Side table from node to its comments.
#[derive(Debug, Clone, Default)]
pub struct CommentAttachments {
    map: FxHashMap<NodeId, NodeComments>,
}

impl CommentAttachments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `comments` into whatever the node already has.
    pub fn attach(&mut self, node: NodeId, comments: NodeComments) {
        if comments.is_empty() {
            return;
        }
        let entry = self.map.entry(node).or_default();
        entry.leading.extend(comments.leading);
        entry.trailing.extend(comments.trailing);
        entry.inner.extend(comments.inner);
    }

    pub fn get(&self, node: NodeId) -> Option<&NodeComments> {
        self.map.get(&node)
    }

    pub fn leading(&self, node: NodeId) -> &[CommentId] {
        self.map.get(&node).map_or(&[], |c| c.leading.as_slice())
    }

    pub fn trailing(&self, node: NodeId) -> &[CommentId] {
        self.map.get(&node).map_or(&[], |c| c.trailing.as_slice())
    }

    pub fn inner(&self, node: NodeId) -> &[CommentId] {
        self.map.get(&node).map_or(&[], |c| c.inner.as_slice())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeComments)> {
        self.map.iter().map(|(id, c)| (*id, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_merges() {
        let mut table = CommentAttachments::new();
        let node = NodeId::new(4);
        table.attach(
            node,
            NodeComments {
                leading: vec![CommentId::new(0)],
                ..Default::default()
            },
        );
        table.attach(
            node,
            NodeComments {
                trailing: vec![CommentId::new(1)],
                ..Default::default()
            },
        );
        assert_eq!(table.leading(node), &[CommentId::new(0)]);
        assert_eq!(table.trailing(node), &[CommentId::new(1)]);
        assert!(table.inner(node).is_empty());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_attachment_is_skipped() {
        let mut table = CommentAttachments::new();
        table.attach(NodeId::new(1), NodeComments::default());
        assert!(table.is_empty());
        assert!(table.leading(NodeId::new(1)).is_empty());
    }
}
