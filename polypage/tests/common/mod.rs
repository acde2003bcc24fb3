//! Shared fixtures for pagination tests.

#![allow(dead_code)]

use polypage::{EntityKind, EntityType, UnionPaginator};
use polypage_db::{Database, DbResult, Repository, SqliteRepository};
use polypage_types::{Entity, Value};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    User,
    Post,
    Comment,
}

impl EntityKind for Kind {
    fn tag(&self) -> &'static str {
        match self {
            Kind::User => "user",
            Kind::Post => "post",
            Kind::Comment => "comment",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "user" => Some(Kind::User),
            "post" => Some(Kind::Post),
            "comment" => Some(Kind::Comment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub age: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub uuid: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Model {
    User(User),
    Post(Post),
    Comment(Comment),
}

impl Model {
    pub fn kind(&self) -> Kind {
        match self {
            Model::User(_) => Kind::User,
            Model::Post(_) => Kind::Post,
            Model::Comment(_) => Kind::Comment,
        }
    }
}

impl Entity for Model {
    fn key(&self) -> Value {
        match self {
            Model::User(u) => Value::Integer(u.id),
            Model::Post(p) => Value::Integer(p.id),
            Model::Comment(c) => Value::Text(c.uuid.clone()),
        }
    }
}

pub type Feed = UnionPaginator<Kind, Model>;

/// Opens an in-memory database with empty `users`, `posts` and `comments`
/// tables.
pub fn database() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.execute_batch(
        "
        CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            age INTEGER NOT NULL DEFAULT 30,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            deleted_at INTEGER
        );
        CREATE TABLE posts (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'published',
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            deleted_at INTEGER
        );
        CREATE TABLE comments (
            uuid TEXT PRIMARY KEY,
            body TEXT NOT NULL,
            posted_at INTEGER NOT NULL
        );
        ",
    )
    .unwrap();
    db
}

pub fn insert_user(db: &Database, id: i64, name: &str, age: i64, created_at: i64) {
    db.with_connection(|conn| {
        conn.execute(
            "INSERT INTO users (id, name, age, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
            rusqlite::params![id, name, age, created_at],
        )
    })
    .unwrap();
}

pub fn insert_post(db: &Database, id: i64, user_id: i64, title: &str, status: &str, created_at: i64) {
    db.with_connection(|conn| {
        conn.execute(
            "INSERT INTO posts (id, user_id, title, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            rusqlite::params![id, user_id, title, status, created_at],
        )
    })
    .unwrap();
}

pub fn insert_comment(db: &Database, uuid: &str, body: &str, posted_at: i64) {
    db.with_connection(|conn| {
        conn.execute(
            "INSERT INTO comments (uuid, body, posted_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![uuid, body, posted_at],
        )
    })
    .unwrap();
}

pub fn soft_delete(db: &Database, table: &str, id: i64) {
    db.execute_batch(&format!("UPDATE {table} SET deleted_at = 1 WHERE id = {id};"))
        .unwrap();
}

pub fn hard_delete(db: &Database, table: &str, id: i64) {
    db.execute_batch(&format!("DELETE FROM {table} WHERE id = {id};"))
        .unwrap();
}

pub fn user_repo(db: &Database) -> SqliteRepository<Model> {
    SqliteRepository::new(db.clone(), "users", "id", |row| {
        Ok(Model::User(User {
            id: row.get_as("id")?,
            name: row.get_as("name")?,
            age: row.get_as("age")?,
        }))
    })
}

pub fn post_repo(db: &Database) -> SqliteRepository<Model> {
    SqliteRepository::new(db.clone(), "posts", "id", |row| {
        Ok(Model::Post(Post {
            id: row.get_as("id")?,
            user_id: row.get_as("user_id")?,
            title: row.get_as("title")?,
            status: row.get_as("status")?,
        }))
    })
}

pub fn comment_repo(db: &Database) -> SqliteRepository<Model> {
    SqliteRepository::new(db.clone(), "comments", "uuid", |row| {
        Ok(Model::Comment(Comment {
            uuid: row.get_as("uuid")?,
            body: row.get_as("body")?,
        }))
    })
}

pub fn user_type(db: &Database) -> EntityType<Kind, Model> {
    EntityType::new(Kind::User, "users", user_repo(db)).soft_delete("deleted_at")
}

pub fn post_type(db: &Database) -> EntityType<Kind, Model> {
    EntityType::new(Kind::Post, "posts", post_repo(db)).soft_delete("deleted_at")
}

/// Comments are keyed by a text uuid and only have a creation timestamp.
pub fn comment_type(db: &Database) -> EntityType<Kind, Model> {
    EntityType::new(Kind::Comment, "comments", comment_repo(db))
        .primary_key("uuid")
        .created_at(Some("posted_at"))
        .updated_at(None)
}

/// A feed over users and posts, in that order.
pub fn feed(db: &Database) -> Feed {
    let mut feed = Feed::new(db.clone());
    feed.register(user_type(db)).unwrap();
    feed.register(post_type(db)).unwrap();
    feed
}

/// Three users and three posts (one per user), with interleaved timestamps:
/// users at 10, 30, 50 and posts at 20, 40, 60.
pub fn seed_users_and_posts(db: &Database) {
    for (id, name) in [(1, "ada"), (2, "bob"), (3, "cyd")] {
        insert_user(db, id, name, 20 + id * 10, id * 20 - 10);
    }
    for id in 1..=3 {
        insert_post(db, id, id, &format!("post {id}"), "published", id * 20);
    }
}

/// Wraps a repository and counts `find_many` calls.
pub struct CountingRepository<R> {
    inner: R,
    calls: Arc<AtomicUsize>,
}

impl<R> CountingRepository<R> {
    pub fn new(inner: R) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl<E, R: Repository<E>> Repository<E> for CountingRepository<R> {
    fn find_many(&self, ids: &[Value]) -> DbResult<Vec<E>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_many(ids)
    }
}

/// Ids of the resolved entities on a page, tagged by kind.
pub fn entity_keys(page: &polypage::Paginated<Kind, Model>) -> Vec<(Kind, Value)> {
    page.items()
        .iter()
        .filter_map(|item| item.as_entity())
        .map(|m| (m.kind(), m.key()))
        .collect()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
