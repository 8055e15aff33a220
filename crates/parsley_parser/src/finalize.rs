//! Node finalization and comment attachment.
//!
//! Finishing a node stamps its span and id, then decides which of the
//! comments scanned so far lead, trail or sit inside it. Nodes finish
//! inside-out, so a stack of still-open nodes lets an enclosing node take
//! back comments its children claimed too eagerly. A node that leaves the
//! stack has its comments committed to a persistent log; after the parse the
//! log is folded into the root's [`CommentAttachments`] table.

use crate::parser::Parser;
use parsley_ast::{CommentAttachments, CommentId, NodeComments, NodeData, NodeId};
use parsley_core::{Position, SourceSpan};

/// A comment as seen by attachment: its id and byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRef {
    pub id: CommentId,
    pub start: u32,
    pub end: u32,
}

/// A finished node still eligible to give up or receive comments.
#[derive(Debug, Clone)]
pub struct OpenNode {
    id: NodeId,
    start: u32,
    end: u32,
    leading: Vec<CommentRef>,
    trailing: Vec<CommentRef>,
    inner: Vec<CommentRef>,
}

impl OpenNode {
    fn new(id: NodeId, span: SourceSpan) -> Self {
        Self {
            id,
            start: span.start.index,
            end: span.end.index,
            leading: Vec::new(),
            trailing: Vec::new(),
            inner: Vec::new(),
        }
    }

    fn into_comments(self) -> (NodeId, NodeComments) {
        let ids = |refs: Vec<CommentRef>| refs.into_iter().map(|c| c.id).collect();
        (
            self.id,
            NodeComments {
                leading: ids(self.leading),
                trailing: ids(self.trailing),
                inner: ids(self.inner),
            },
        )
    }
}

impl<'a> Parser<'a> {
    #[inline]
    pub(crate) fn start_node(&self) -> Position {
        self.state.start
    }

    /// Finish a node that started at `start` and ends with the previous token.
    pub(crate) fn finish_node(&mut self, start: Position) -> NodeData {
        let end = self.state.last_end;
        self.finish_node_at(start, end)
    }

    pub(crate) fn finish_node_at(&mut self, start: Position, end: Position) -> NodeData {
        let end = if end.index < start.index { start } else { end };
        let span = SourceSpan::new(start, end);
        let id = self.fresh_id();
        self.process_comment(OpenNode::new(id, span));
        NodeData::new(id, span)
    }

    /// An empty node standing in for something that could not be parsed.
    pub(crate) fn missing_node(&mut self) -> NodeData {
        let at = self.state.start;
        self.finish_node_at(at, at)
    }

    /// Node data that takes no part in comment attachment.
    pub(crate) fn node_data_at(&mut self, span: SourceSpan) -> NodeData {
        NodeData::new(self.fresh_id(), span)
    }

    /// A copy of a node under a new identity with no comments of its own.
    pub(crate) fn clone_node_without_comments(&mut self, data: &NodeData) -> NodeData {
        self.node_data_at(data.span)
    }

    /// Feed a freshly scanned comment to attachment.
    pub(crate) fn add_comment(&mut self, comment: CommentRef) {
        self.state.trailing_comments.push(comment);
        self.state.leading_comments.push(comment);
    }

    fn commit_comments(&mut self, node: OpenNode) {
        let (id, comments) = node.into_comments();
        if !comments.is_empty() {
            self.state.attachments.push((id, comments));
        }
    }

    fn process_comment(&mut self, mut node: OpenNode) {
        let state = &mut self.state;
        let mut trailing: Option<Vec<CommentRef>> = None;

        if let Some(first) = state.trailing_comments.first() {
            if first.start >= node.end {
                trailing = Some(std::mem::take(&mut state.trailing_comments));
            } else {
                // A mix of leading and trailing comments; the leading list
                // holds the same comments and sorts them out below.
                state.trailing_comments.clear();
            }
        } else if let Some(top) = state.comment_stack.last_mut() {
            if top.trailing.first().is_some_and(|c| c.start >= node.end) {
                trailing = Some(std::mem::take(&mut top.trailing));
            }
        }

        let mut children = Vec::new();
        while state.comment_stack.last().is_some_and(|top| top.start >= node.start) {
            if let Some(child) = state.comment_stack.pop() {
                children.push(child);
            }
        }

        if let Some(last_child) = children.last_mut() {
            if let Some(last) = last_child.leading.last() {
                if last.end <= node.start {
                    node.leading = std::mem::take(&mut last_child.leading);
                } else {
                    let len = last_child.leading.len();
                    for i in (0..len.saturating_sub(1)).rev() {
                        if last_child.leading[i].end <= node.start {
                            node.leading = last_child.leading.drain(..=i).collect();
                            break;
                        }
                    }
                }
            }
        } else if let Some(last) = state.leading_comments.last() {
            if last.end <= node.start {
                if let Some(previous_end) = state.comment_previous_end {
                    state.leading_comments.retain(|c| c.end >= previous_end);
                }
                node.leading = std::mem::take(&mut state.leading_comments);
            } else {
                // Statements like `return /* a */;` end up with every comment
                // in the leading list: split at the first one past the start.
                let mut pending = std::mem::take(&mut state.leading_comments);
                let split = pending
                    .iter()
                    .position(|c| c.end > node.start)
                    .unwrap_or(pending.len());
                let rest = pending.split_off(split);
                node.leading = pending;
                if !rest.is_empty() {
                    trailing = Some(rest);
                }
            }
        }

        state.comment_previous_end = Some(node.end);

        if let Some(trailing) = trailing.filter(|t| !t.is_empty()) {
            let inside = trailing.first().is_some_and(|c| c.start >= node.start)
                && trailing.last().is_some_and(|c| c.end <= node.end);
            if inside {
                node.inner = trailing;
            } else {
                node.trailing = trailing;
            }
        }

        for child in children {
            self.commit_comments(child);
        }
        self.state.comment_stack.push(node);
    }

    /// Close out attachment for the root node and fold every committed
    /// association into the final table.
    pub(crate) fn finish_comments(&mut self, root: &NodeData, has_body: bool) -> CommentAttachments {
        if !has_body {
            self.process_comment(OpenNode::new(root.id, root.span));
        }
        while let Some(node) = self.state.comment_stack.pop() {
            self.commit_comments(node);
        }
        let mut table = CommentAttachments::new();
        for (id, comments) in self.state.attachments.to_vec() {
            table.attach(id, comments);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;
    use bumpalo::Bump;

    fn with_parser<R>(source: &str, f: impl FnOnce(&mut Parser<'_>) -> R) -> R {
        let arena = Bump::new();
        let options = ParseOptions::new(source);
        let mut parser = Parser::new(&arena, &options);
        parser.next().unwrap();
        f(&mut parser)
    }

    #[test]
    fn test_leading_and_trailing() {
        with_parser("/* lead */ a; // trail\n", |p| {
            let start = p.start_node();
            p.next().unwrap();
            p.next().unwrap();
            let node = p.finish_node(start);
            let root = p.node_data_at(SourceSpan::new(Position::START, p.end_of_input()));
            let table = p.finish_comments(&root, true);
            assert_eq!(table.leading(node.id), &[CommentId::new(0)]);
            assert_eq!(table.trailing(node.id), &[CommentId::new(1)]);
        });
    }

    #[test]
    fn test_inner_comment_of_empty_node() {
        with_parser("{ /* inside */ }", |p| {
            let start = p.start_node();
            p.next().unwrap();
            p.next().unwrap();
            let node = p.finish_node(start);
            let root = p.node_data_at(SourceSpan::new(Position::START, p.end_of_input()));
            let table = p.finish_comments(&root, true);
            assert_eq!(table.inner(node.id), &[CommentId::new(0)]);
            assert!(table.leading(node.id).is_empty());
        });
    }

    #[test]
    fn test_empty_program_keeps_comments() {
        with_parser("// only a comment", |p| {
            let root = p.node_data_at(SourceSpan::new(Position::START, p.end_of_input()));
            let table = p.finish_comments(&root, false);
            assert_eq!(table.inner(root.id), &[CommentId::new(0)]);
        });
    }

    #[test]
    fn test_span_never_inverted() {
        with_parser("a", |p| {
            let start = p.state.end;
            let data = p.finish_node(start);
            assert_eq!(data.span.start, data.span.end);
        });
    }
}
