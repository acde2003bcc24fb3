mod common;

use common::*;
use polypage::{
    col, ColumnProjector, EntityTypeRegistry, PaginationError, PaginatorConfig, ScopeRegistry,
    SelectItem, SelectQuery, UnionQueryBuilder,
};
use polypage_query::Dialect;
use polypage_types::Value;
use pretty_assertions::assert_eq;

const USERS: &str =
    r#"SELECT "id", "created_at", "updated_at", 'user' AS "type" FROM "users" WHERE "deleted_at" IS NULL"#;
const POSTS: &str =
    r#"SELECT "id", "created_at", "updated_at", 'post' AS "type" FROM "posts" WHERE "deleted_at" IS NULL"#;

// ── Default projection ───────────────────────────────────────────

#[test]
fn default_branches_are_unioned_in_registration_order() {
    let db = database();
    let mut feed = feed(&db);
    let stmt = feed.union_statement().unwrap();
    assert_eq!(stmt.sql, format!("{USERS} UNION {POSTS}"));
    assert!(stmt.binds.is_empty());
}

#[test]
fn registration_order_decides_branch_order() {
    let db = database();
    let mut feed = Feed::new(db.clone());
    feed.register(post_type(&db)).unwrap();
    feed.register(user_type(&db)).unwrap();
    assert_eq!(
        feed.union_statement().unwrap().sql,
        format!("{POSTS} UNION {USERS}")
    );
}

#[test]
fn renamed_and_missing_timestamps_keep_branch_arity() {
    let db = database();
    let mut feed = Feed::new(db.clone());
    feed.register(comment_type(&db)).unwrap();
    assert_eq!(
        feed.union_statement().unwrap().sql,
        r#"SELECT "uuid" AS "id", "posted_at" AS "created_at", NULL AS "updated_at", 'comment' AS "type" FROM "comments""#
    );
}

#[test]
fn projection_aliases_follow_config() {
    let db = database();
    let config = PaginatorConfig {
        id_column: "key".into(),
        discriminator_column: "source".into(),
        ..PaginatorConfig::default()
    };
    let mut registry = EntityTypeRegistry::new();
    registry.register(user_type(&db)).unwrap();
    let projector = ColumnProjector::new();
    let scopes = ScopeRegistry::new();

    let union = UnionQueryBuilder::new(&registry, &projector, &scopes, &config)
        .build()
        .unwrap();
    assert_eq!(
        union.to_statement(Dialect::Sqlite).unwrap().sql,
        r#"SELECT "id" AS "key", "created_at", "updated_at", 'user' AS "source" FROM "users" WHERE "deleted_at" IS NULL"#
    );
}

// ── Overrides and scopes ─────────────────────────────────────────

#[test]
fn column_override_replaces_default_projection() {
    let db = database();
    let mut feed = feed(&db);
    feed.set_selected_columns(
        Kind::Post,
        vec![
            SelectItem::column("id"),
            SelectItem::column("created_at"),
            SelectItem::column("created_at").aliased("updated_at"),
            SelectItem::literal("post", "type"),
        ],
    );
    let sql = feed.union_statement().unwrap().sql;
    assert!(sql.ends_with(
        r#"SELECT "id", "created_at", "created_at" AS "updated_at", 'post' AS "type" FROM "posts" WHERE "deleted_at" IS NULL"#
    ));
}

#[test]
fn scopes_follow_soft_delete_inside_their_branch() {
    let db = database();
    let mut feed = feed(&db);
    feed.apply_scope(Kind::User, |q| {
        q.where_gte("age", 40);
    });
    feed.apply_scope(Kind::User, |q| {
        q.where_like("name", "b%");
    });
    let stmt = feed.union_statement().unwrap();
    assert_eq!(
        stmt.sql,
        format!(
            r#"SELECT "id", "created_at", "updated_at", 'user' AS "type" FROM "users" WHERE "deleted_at" IS NULL AND "age" >= ? AND "name" LIKE ? UNION {POSTS}"#
        )
    );
    assert_eq!(stmt.binds, vec![Value::Integer(40), Value::Text("b%".into())]);
}

#[test]
fn binds_follow_branch_order_across_the_union() {
    let db = database();
    let mut feed = feed(&db);
    feed.apply_scope(Kind::Post, |q| {
        q.where_in("status", ["draft", "published"]);
    });
    feed.apply_scope(Kind::User, |q| {
        q.filter(col("age").between(18, 65));
    });
    feed.apply_scope(Kind::Post, |q| {
        q.where_not_eq("title", "spam");
    });

    let binds = feed.union_statement().unwrap().binds;
    assert_eq!(
        binds,
        vec![
            Value::Integer(18),
            Value::Integer(65),
            Value::Text("draft".into()),
            Value::Text("published".into()),
            Value::Text("spam".into()),
        ]
    );
}

#[test]
fn scope_registry_keeps_per_kind_order() {
    let mut scopes: ScopeRegistry<Kind> = ScopeRegistry::new();
    assert!(!scopes.has(Kind::User));
    scopes.add(Kind::User, Box::new(|q: &mut SelectQuery| {
        q.where_eq("a", 1);
    }));
    scopes.add(Kind::Post, Box::new(|q: &mut SelectQuery| {
        q.where_eq("b", 2);
    }));
    scopes.add(Kind::User, Box::new(|q: &mut SelectQuery| {
        q.where_eq("c", 3);
    }));

    assert!(scopes.has(Kind::User));
    assert_eq!(scopes.scopes_for(Kind::User).count(), 2);
    assert_eq!(scopes.scopes_for(Kind::Comment).count(), 0);

    let mut query = SelectQuery::new("users");
    scopes.apply(Kind::User, &mut query);
    assert_eq!(
        query.to_statement(Dialect::Sqlite).unwrap().sql,
        r#"SELECT * FROM "users" WHERE "a" = ? AND "c" = ?"#
    );
}

// ── Build state ──────────────────────────────────────────────────

#[test]
fn empty_registry_cannot_build() {
    let registry: EntityTypeRegistry<Kind, Model> = EntityTypeRegistry::new();
    let config = PaginatorConfig::default();
    let err = UnionQueryBuilder::new(&registry, &ColumnProjector::new(), &ScopeRegistry::new(), &config)
        .build()
        .unwrap_err();
    assert!(matches!(err, PaginationError::NoEntityTypesRegistered));
}

#[test]
fn union_is_cached_until_a_structural_change() {
    let db = database();
    let mut feed = feed(&db);
    assert!(!feed.is_built());

    let before = feed.union_statement().unwrap();
    assert!(feed.is_built());

    // Ordering, limits and transformers do not touch the union.
    feed.latest().take(5).skip_resolution(true);
    feed.transform_results_for(Kind::User, |item| item);
    assert!(feed.is_built());

    feed.apply_scope(Kind::Post, |q| {
        q.where_eq("status", "draft");
    });
    assert!(!feed.is_built());
    let after = feed.union_statement().unwrap();
    assert_ne!(before, after);
    assert!(feed.is_built());

    feed.set_selected_columns(Kind::User, ["id", "created_at", "updated_at"]);
    assert!(!feed.is_built());
    feed.union_statement().unwrap();

    feed.register(comment_type(&db)).unwrap();
    assert!(!feed.is_built());
    assert_eq!(feed.union_query().unwrap().len(), 3);
}

#[test]
fn scopes_for_unregistered_kinds_apply_once_registered() {
    let db = database();
    let mut feed = feed(&db);
    feed.apply_scope(Kind::Comment, |q| {
        q.where_like("body", "%rust%");
    });
    assert!(feed.has_scopes(Kind::Comment));
    assert!(!feed.union_statement().unwrap().sql.contains("comments"));

    feed.register(comment_type(&db)).unwrap();
    let stmt = feed.union_statement().unwrap();
    assert!(stmt.sql.ends_with(r#"FROM "comments" WHERE "body" LIKE ?"#));
    assert_eq!(stmt.binds, vec![Value::Text("%rust%".into())]);
}
