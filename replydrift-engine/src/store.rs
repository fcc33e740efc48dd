//! Document store abstraction
//!
//! Analysis code looks posts up by id, one call per lookup, and never caches
//! the result. [`InMemoryStore`] is the store used by the command line tool
//! once a dataset has been loaded.

use crate::error::{EngineError, Result};
use replydrift_core::{Post, PostId};
use std::collections::HashMap;

/// Lookup of stored post records by id
pub trait DocumentStore {
    /// Fetch the record for `id`, `Ok(None)` when it is not stored
    fn find_one(&self, id: PostId) -> Result<Option<Post>>;

    /// Fetch the record for `id`, failing with [`EngineError::MissingRecord`]
    fn fetch(&self, id: PostId) -> Result<Post> {
        self.find_one(id)?.ok_or(EngineError::MissingRecord { id })
    }
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn find_one(&self, id: PostId) -> Result<Option<Post>> {
        (**self).find_one(id)
    }
}

/// Hash-map backed document store
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    posts: HashMap<PostId, Post>,
}

impl InMemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a post; the first record for an id wins
    ///
    /// Returns `false` when the id was already stored.
    pub fn insert(&mut self, post: Post) -> bool {
        if self.posts.contains_key(&post.id) {
            return false;
        }
        self.posts.insert(post.id, post);
        true
    }

    /// Borrow a stored post
    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.get(&id)
    }

    /// Whether a record exists for `id`
    pub fn contains(&self, id: PostId) -> bool {
        self.posts.contains_key(&id)
    }

    /// Number of stored posts
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the store holds no post
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Iterate over stored posts in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.posts.values()
    }
}

impl DocumentStore for InMemoryStore {
    fn find_one(&self, id: PostId) -> Result<Option<Post>> {
        Ok(self.posts.get(&id).cloned())
    }
}

impl FromIterator<Post> for InMemoryStore {
    fn from_iter<T: IntoIterator<Item = Post>>(iter: T) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl Extend<Post> for InMemoryStore {
    fn extend<T: IntoIterator<Item = Post>>(&mut self, iter: T) {
        for post in iter {
            self.insert(post);
        }
    }
}
