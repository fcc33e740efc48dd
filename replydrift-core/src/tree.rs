//! Conversation trees
//!
//! A conversation is a rooted tree of post identifiers: the root post and
//! every reply reachable from it through parent-child edges. Nodes live in an
//! arena owned by the tree, and borrowed [`Node`] handles expose the
//! structure to callers.

use crate::error::{CoreError, Result};
use crate::post::PostId;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct NodeData {
    id: PostId,
    parent: Option<usize>,
    children: Vec<usize>,
    depth: usize,
}

/// A rooted reply tree
///
/// Every descendant is reachable from the root and every post id appears at
/// most once. Both properties hold by construction: replies can only be
/// attached to a node that is already part of the tree.
#[derive(Debug, Clone)]
pub struct ConversationTree {
    nodes: Vec<NodeData>,
    index: HashMap<PostId, usize>,
}

/// Borrowed handle to one node of a [`ConversationTree`]
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    tree: &'a ConversationTree,
    slot: usize,
}

impl ConversationTree {
    /// Create a tree holding only its root post
    pub fn new(root: impl Into<PostId>) -> Self {
        let root = root.into();
        let mut index = HashMap::new();
        index.insert(root, 0);

        Self {
            nodes: vec![NodeData {
                id: root,
                parent: None,
                children: Vec::new(),
                depth: 0,
            }],
            index,
        }
    }

    /// Build a tree from `(reply, parent)` pairs
    ///
    /// Pairs must be ordered so that each parent is attached before its
    /// replies.
    pub fn from_replies<I, P>(root: impl Into<PostId>, replies: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, P)>,
        P: Into<PostId>,
    {
        let mut tree = Self::new(root);
        for (reply, parent) in replies {
            tree.add_reply(parent, reply)?;
        }
        Ok(tree)
    }

    /// Attach `reply` below `parent`
    pub fn add_reply(&mut self, parent: impl Into<PostId>, reply: impl Into<PostId>) -> Result<()> {
        let parent = parent.into();
        let reply = reply.into();

        let parent_slot = *self
            .index
            .get(&parent)
            .ok_or(CoreError::UnknownParent { parent })?;

        if self.index.contains_key(&reply) {
            return Err(CoreError::DuplicatePost { id: reply });
        }

        let slot = self.nodes.len();
        let depth = self.nodes[parent_slot].depth + 1;
        self.nodes.push(NodeData {
            id: reply,
            parent: Some(parent_slot),
            children: Vec::new(),
            depth,
        });
        self.nodes[parent_slot].children.push(slot);
        self.index.insert(reply, slot);

        Ok(())
    }

    /// The root node
    pub fn root(&self) -> Node<'_> {
        Node {
            tree: self,
            slot: 0,
        }
    }

    /// All non-root nodes in depth-first pre-order
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<usize> = self.nodes[0].children.clone();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    /// Descendants without replies
    pub fn leaves(&self) -> impl Iterator<Item = Node<'_>> {
        self.descendants().filter(|node| node.is_leaf())
    }

    /// Look up a node by post id
    pub fn get(&self, id: PostId) -> Option<Node<'_>> {
        self.index.get(&id).map(|&slot| Node { tree: self, slot })
    }

    /// Whether `id` is part of this tree
    pub fn contains(&self, id: PostId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of posts in the tree, root included
    pub fn post_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of replies (descendants)
    pub fn reply_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Length of the longest root-to-leaf path, in edges
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}

impl<'a> Node<'a> {
    /// Post identifier of this node
    pub fn id(&self) -> PostId {
        self.data().id
    }

    /// True when no reply hangs below this node
    pub fn is_leaf(&self) -> bool {
        self.data().children.is_empty()
    }

    /// True for the root node
    pub fn is_root(&self) -> bool {
        self.slot == 0
    }

    /// Distance from the root in edges
    pub fn depth(&self) -> usize {
        self.data().depth
    }

    /// Parent node, `None` for the root
    pub fn parent(&self) -> Option<Node<'a>> {
        self.data().parent.map(|slot| Node {
            tree: self.tree,
            slot,
        })
    }

    /// Direct replies, in insertion order
    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let tree = self.tree;
        tree.nodes[self.slot]
            .children
            .iter()
            .map(move |&slot| Node { tree, slot })
    }

    fn data(&self) -> &'a NodeData {
        &self.tree.nodes[self.slot]
    }
}

/// Pre-order iterator over the descendants of a tree
#[derive(Debug)]
pub struct Descendants<'a> {
    tree: &'a ConversationTree,
    stack: Vec<usize>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.stack.pop()?;
        self.stack
            .extend(self.tree.nodes[slot].children.iter().rev().copied());
        Some(Node {
            tree: self.tree,
            slot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> ConversationTree {
        //      1
        //     / \
        //    2   3
        //   / \
        //  4   5
        ConversationTree::from_replies(1u64, [(2u64, 1u64), (3, 1), (4, 2), (5, 2)]).unwrap()
    }

    #[test]
    fn test_root_only_tree() {
        let tree = ConversationTree::new(PostId(9));
        assert_eq!(tree.post_count(), 1);
        assert_eq!(tree.reply_count(), 0);
        assert_eq!(tree.descendants().count(), 0);
        assert!(tree.root().is_root());
    }

    #[test]
    fn test_descendants_pre_order() {
        let tree = sample_tree();
        let ids: Vec<u64> = tree.descendants().map(|n| n.id().0).collect();
        assert_eq!(ids, vec![2, 4, 5, 3]);
    }

    #[test]
    fn test_leaves_exclude_internal_nodes() {
        let tree = sample_tree();
        let leaves: Vec<u64> = tree.leaves().map(|n| n.id().0).collect();
        assert_eq!(leaves, vec![4, 5, 3]);
        assert!(!tree.get(PostId(2)).unwrap().is_leaf());
    }

    #[test]
    fn test_depth_and_parent() {
        let tree = sample_tree();
        let node = tree.get(PostId(5)).unwrap();
        assert_eq!(node.depth(), 2);
        assert_eq!(node.parent().unwrap().id(), PostId(2));
        assert_eq!(tree.max_depth(), 2);
        assert!(tree.root().parent().is_none());
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut tree = ConversationTree::new(1u64);
        let err = tree.add_reply(7u64, 8u64).unwrap_err();
        assert_eq!(err, CoreError::UnknownParent { parent: PostId(7) });
    }

    #[test]
    fn test_duplicate_post_rejected() {
        let mut tree = sample_tree();
        let err = tree.add_reply(3u64, 4u64).unwrap_err();
        assert_eq!(err, CoreError::DuplicatePost { id: PostId(4) });
        assert_eq!(tree.post_count(), 5);
    }

    #[test]
    fn test_children_order() {
        let tree = sample_tree();
        let children: Vec<u64> = tree.root().children().map(|n| n.id().0).collect();
        assert_eq!(children, vec![2, 3]);
    }
}
