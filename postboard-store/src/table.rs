//! Ordered in-memory list of one resource kind.

use postboard_common::model::{
    Id,
    post::{Post, PostMarker},
    user::{User, UserMarker},
};

pub trait Record {
    type Marker;

    fn id(&self) -> Id<Self::Marker>;
}

impl Record for User {
    type Marker = UserMarker;

    fn id(&self) -> Id<UserMarker> {
        self.id
    }
}

impl Record for Post {
    type Marker = PostMarker;

    fn id(&self) -> Id<PostMarker> {
        self.id
    }
}

/// Rows are kept in insertion order. Ids are unique within a table.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Table<T> {
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Record> Table<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn find(&self, id: Id<T::Marker>) -> Option<&T> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn find_mut(&mut self, id: Id<T::Marker>) -> Option<&mut T> {
        self.rows.iter_mut().find(|row| row.id() == id)
    }

    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> impl Iterator<Item = &T> {
        self.rows.iter().filter(move |row| predicate(row))
    }

    /// Largest id in the table plus one, or 1 for an empty table. `None` if the largest id is
    /// already `u64::MAX`.
    #[must_use]
    pub fn next_id(&self) -> Option<Id<T::Marker>> {
        match self.rows.iter().map(|row| row.id()).max() {
            Some(max) => max.next(),
            None => Some(Id::new(1)),
        }
    }

    /// Appends the row built for the next free id. `None` leaves the table untouched.
    pub fn insert_with(&mut self, build: impl FnOnce(Id<T::Marker>) -> T) -> Option<&T> {
        let row = build(self.next_id()?);
        self.rows.push(row);
        self.rows.last()
    }

    /// Returns whether a row with that id existed.
    pub fn remove(&mut self, id: Id<T::Marker>) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id() != id);
        self.rows.len() != before
    }
}

impl<T: Record> FromIterator<T> for Table<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::table::Table;
    use postboard_common::model::{
        Id,
        post::{CreatePost, Post},
    };

    fn post(id: u64) -> Post {
        Post::new(Id::new(id), CreatePost::new(Id::new(1), format!("post {id}")))
    }

    #[test]
    fn next_id_is_max_plus_one() {
        let mut table = Table::<Post>::new();
        assert_eq!(table.next_id(), Some(Id::new(1)));

        table = [post(3), post(9), post(4)].into_iter().collect();
        assert_eq!(table.next_id(), Some(Id::new(10)));

        let inserted = table.insert_with(|id| post(id.get())).map(|row| row.id);
        assert_eq!(inserted, Some(Id::new(10)));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn exhausted_ids_insert_nothing() {
        let mut table: Table<Post> = [post(u64::MAX)].into_iter().collect();

        assert_eq!(table.next_id(), None);
        assert!(table.insert_with(|id| post(id.get())).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn removed_max_id_is_reused() {
        let mut table: Table<Post> = [post(1), post(2)].into_iter().collect();

        assert!(table.remove(Id::new(2)));
        assert!(!table.remove(Id::new(2)));
        assert_eq!(table.next_id(), Some(Id::new(2)));
    }

    #[test]
    fn find_and_filter() {
        let mut table: Table<Post> = [post(1), post(2), post(3)].into_iter().collect();

        assert_eq!(table.find(Id::new(2)).map(|row| row.id), Some(Id::new(2)));
        assert!(table.find(Id::new(7)).is_none());

        if let Some(row) = table.find_mut(Id::new(3)) {
            row.title = "changed".to_owned();
        }
        let titles: Vec<_> = table
            .filter(|row| row.title.starts_with('c'))
            .map(|row| row.id)
            .collect();
        assert_eq!(titles, [Id::new(3)]);
    }
}
