//! Conversation import
//!
//! Turns the reply links of stored posts into [`ConversationTree`]s and
//! selects the conversations an account took part in.

use crate::error::Result;
use crate::store::InMemoryStore;
use replydrift_core::{ConversationTree, Post, PostId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// Which conversation roots are included for an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootFilter {
    /// Every conversation the account took part in
    #[default]
    Both,
    /// Only conversations started by someone else
    NoAirline,
    /// Only conversations started by the account itself
    AirlineOnly,
}

impl RootFilter {
    /// Whether a conversation whose root was written by `root_author` passes
    pub fn accepts(&self, root_author: u64, account_id: u64) -> bool {
        match self {
            RootFilter::Both => true,
            RootFilter::NoAirline => root_author != account_id,
            RootFilter::AirlineOnly => root_author == account_id,
        }
    }

    /// Stable name used in configuration files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            RootFilter::Both => "both",
            RootFilter::NoAirline => "no-airline",
            RootFilter::AirlineOnly => "airline-only",
        }
    }
}

impl fmt::Display for RootFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of conversation trees for an account
pub trait ConversationSource {
    /// Conversations `account_id` took part in, filtered by root author
    fn import_trees(&self, account_id: u64, filter: RootFilter) -> Result<Vec<ConversationTree>>;
}

#[derive(Debug)]
struct IndexedConversation {
    tree: ConversationTree,
    root_author: u64,
    participants: HashSet<u64>,
}

/// Conversations reconstructed from the reply links of an [`InMemoryStore`]
///
/// A root is a post that replies to nothing, or whose parent is not in the
/// store. Only roots with at least one reply form a conversation. Replies are
/// attached in `(timestamp, id)` order and conversations are kept in the
/// same order of their roots.
#[derive(Debug)]
pub struct ReplyIndex {
    conversations: Vec<IndexedConversation>,
}

fn chronological(a: &&Post, b: &&Post) -> std::cmp::Ordering {
    (a.timestamp_ms, a.id).cmp(&(b.timestamp_ms, b.id))
}

impl ReplyIndex {
    /// Index every conversation held by `store`
    pub fn build(store: &InMemoryStore) -> Result<Self> {
        let mut children: HashMap<PostId, Vec<&Post>> = HashMap::new();
        let mut roots: Vec<&Post> = Vec::new();

        for post in store.iter() {
            match post.in_reply_to {
                Some(parent) if store.contains(parent) => {
                    children.entry(parent).or_default().push(post);
                }
                _ => roots.push(post),
            }
        }

        for replies in children.values_mut() {
            replies.sort_by(chronological);
        }
        roots.sort_by(chronological);

        let mut conversations = Vec::new();
        for root in roots {
            if !children.contains_key(&root.id) {
                continue;
            }

            let mut tree = ConversationTree::new(root.id);
            let mut participants = HashSet::from([root.author_id]);
            let mut queue = VecDeque::from([root.id]);

            while let Some(parent) = queue.pop_front() {
                for reply in children.get(&parent).into_iter().flatten() {
                    tree.add_reply(parent, reply.id)?;
                    participants.insert(reply.author_id);
                    queue.push_back(reply.id);
                }
            }

            conversations.push(IndexedConversation {
                tree,
                root_author: root.author_id,
                participants,
            });
        }

        log::info!(
            "Indexed {} conversations from {} posts",
            conversations.len(),
            store.len()
        );

        Ok(Self { conversations })
    }

    /// Number of indexed conversations
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether no conversation was found
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Every indexed conversation, regardless of account
    pub fn trees(&self) -> impl Iterator<Item = &ConversationTree> {
        self.conversations.iter().map(|c| &c.tree)
    }
}

impl ConversationSource for ReplyIndex {
    fn import_trees(&self, account_id: u64, filter: RootFilter) -> Result<Vec<ConversationTree>> {
        let trees: Vec<ConversationTree> = self
            .conversations
            .iter()
            .filter(|c| c.participants.contains(&account_id))
            .filter(|c| filter.accepts(c.root_author, account_id))
            .map(|c| c.tree.clone())
            .collect();

        log::debug!(
            "Imported {} conversations for account {account_id} ({filter})",
            trees.len()
        );
        Ok(trees)
    }
}
