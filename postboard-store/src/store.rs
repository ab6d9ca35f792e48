use crate::{seed, table::Table};
use postboard_common::model::{
    Id,
    post::{CreatePost, Post, PostMarker, UpdatePost},
    user::{CreateUser, UpdateUser, User, UserMarker},
};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum StoreError {
    #[error("The {0} table lock was poisoned")]
    LockPoisoned(&'static str),
    #[error("The {0} table has no ids left")]
    IdsExhausted(&'static str),
}

/// In-memory users and posts.
///
/// Each table sits behind its own lock, which is held across id allocation and insertion so two
/// concurrent creates can never hand out the same id.
#[derive(Debug, Default)]
pub struct Store {
    users: Mutex<Table<User>>,
    posts: Mutex<Table<Post>>,
}

fn lock<'table, T>(
    table: &'table Mutex<Table<T>>,
    name: &'static str,
) -> Result<MutexGuard<'table, Table<T>>> {
    table.lock().map_err(|_| StoreError::LockPoisoned(name))
}

impl Store {
    #[must_use]
    pub fn new(users: Vec<User>, posts: Vec<Post>) -> Self {
        Self {
            users: Mutex::new(users.into_iter().collect()),
            posts: Mutex::new(posts.into_iter().collect()),
        }
    }

    #[must_use]
    pub fn seeded() -> Self {
        Self::new(seed::users(), seed::posts())
    }

    fn users(&self) -> Result<MutexGuard<'_, Table<User>>> {
        lock(&self.users, "users")
    }

    fn posts(&self) -> Result<MutexGuard<'_, Table<Post>>> {
        lock(&self.posts, "posts")
    }

    pub fn fetch_users(&self) -> Result<Vec<User>> {
        Ok(self.users()?.rows().to_vec())
    }

    pub fn fetch_user(&self, user_id: Id<UserMarker>) -> Result<Option<User>> {
        Ok(self.users()?.find(user_id).cloned())
    }

    pub fn create_user(&self, user: CreateUser) -> Result<User> {
        self.users()?
            .insert_with(|id| User::new(id, user))
            .cloned()
            .ok_or(StoreError::IdsExhausted("users"))
    }

    pub fn update_user(&self, user_id: Id<UserMarker>, update: UpdateUser) -> Result<Option<User>> {
        let mut users = self.users()?;
        let Some(user) = users.find_mut(user_id) else {
            return Ok(None);
        };

        user.merge(update);
        Ok(Some(user.clone()))
    }

    pub fn delete_user(&self, user_id: Id<UserMarker>) -> Result<bool> {
        Ok(self.users()?.remove(user_id))
    }

    pub fn fetch_posts(&self) -> Result<Vec<Post>> {
        Ok(self.posts()?.rows().to_vec())
    }

    pub fn fetch_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>> {
        Ok(self.posts()?.find(post_id).cloned())
    }

    /// Posts whose `user_id` matches, in insertion order. The user itself need not exist.
    pub fn fetch_user_posts(&self, user_id: Id<UserMarker>) -> Result<Vec<Post>> {
        Ok(self
            .posts()?
            .filter(|post| post.user_id == user_id)
            .cloned()
            .collect())
    }

    pub fn create_post(&self, post: CreatePost) -> Result<Post> {
        self.posts()?
            .insert_with(|id| Post::new(id, post))
            .cloned()
            .ok_or(StoreError::IdsExhausted("posts"))
    }

    pub fn update_post(&self, post_id: Id<PostMarker>, update: UpdatePost) -> Result<Option<Post>> {
        let mut posts = self.posts()?;
        let Some(post) = posts.find_mut(post_id) else {
            return Ok(None);
        };

        post.merge(update);
        Ok(Some(post.clone()))
    }

    pub fn delete_post(&self, post_id: Id<PostMarker>) -> Result<bool> {
        Ok(self.posts()?.remove(post_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::store::{Store, StoreError};
    use postboard_common::model::{
        Id,
        post::{CreatePost, Post, UpdatePost},
        user::{CreateUser, UpdateUser},
    };
    use std::{sync::Arc, thread};

    fn ids<T>(rows: &[T], id: impl Fn(&T) -> u64) -> Vec<u64> {
        rows.iter().map(id).collect()
    }

    #[test]
    fn seeded_posts_round_trip() {
        let store = Store::seeded();

        let posts = store.fetch_posts().unwrap();
        assert_eq!(ids(&posts, |post| post.id.get()), [1, 2, 3, 4, 5]);

        let by_user = store.fetch_user_posts(Id::new(1)).unwrap();
        assert_eq!(ids(&by_user, |post| post.id.get()), [1, 2, 5]);

        let created = store
            .create_post(CreatePost::new(Id::new(1), "T"))
            .unwrap();
        assert_eq!(created.id, Id::new(6));
        assert_eq!(created.body, "");
        assert_eq!(store.fetch_posts().unwrap().last(), Some(&created));

        assert!(store.delete_post(Id::new(6)).unwrap());
        assert_eq!(store.fetch_posts().unwrap(), posts);
    }

    #[test]
    fn user_lifecycle() {
        let store = Store::seeded();
        assert_eq!(store.fetch_users().unwrap().len(), 2);

        let created = store
            .create_user(CreateUser {
                name: "Clementine Bauch".to_owned(),
                username: "Samantha".to_owned(),
                email: "Nathan@yesenia.net".to_owned(),
            })
            .unwrap();
        assert_eq!(created.id, Id::new(3));

        let updated = store
            .update_user(
                created.id,
                UpdateUser {
                    username: Some("Sam".to_owned()),
                    ..UpdateUser::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.username, "Sam");
        assert_eq!(updated.email, "Nathan@yesenia.net");
        assert_eq!(store.fetch_user(created.id).unwrap(), Some(updated));

        assert!(store.delete_user(created.id).unwrap());
        assert_eq!(store.fetch_user(created.id).unwrap(), None);
    }

    #[test]
    fn missing_ids() {
        let store = Store::seeded();

        assert_eq!(store.fetch_user(Id::new(99)).unwrap(), None);
        assert_eq!(store.fetch_post(Id::new(99)).unwrap(), None);
        assert_eq!(
            store
                .update_post(Id::new(99), UpdatePost::default())
                .unwrap(),
            None
        );
        assert!(!store.delete_user(Id::new(99)).unwrap());
        assert!(store.fetch_user_posts(Id::new(99)).unwrap().is_empty());
    }

    #[test]
    fn posts_may_reference_missing_users() {
        let store = Store::default();

        let post = store
            .create_post(CreatePost::new(Id::new(42), "orphan"))
            .unwrap();
        assert_eq!(post.id, Id::new(1));
        assert_eq!(store.fetch_user_posts(Id::new(42)).unwrap(), [post]);
    }

    #[test]
    fn exhausted_ids_are_an_error() {
        let last = Post::new(Id::new(u64::MAX), CreatePost::new(Id::new(1), "last"));
        let store = Store::new(Vec::new(), vec![last.clone()]);

        assert_eq!(
            store.create_post(CreatePost::new(Id::new(1), "one too many")),
            Err(StoreError::IdsExhausted("posts"))
        );
        assert_eq!(store.fetch_posts().unwrap(), [last]);
    }

    #[test]
    fn concurrent_creates_get_distinct_ids() {
        let store = Arc::new(Store::default());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .create_post(CreatePost::new(Id::new(1), format!("post {i}")))
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids: Vec<u64> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap().get())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    }
}
