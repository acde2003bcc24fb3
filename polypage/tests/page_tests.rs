mod common;

use common::*;
use polypage::{EntityKind, PageItem, Paginated, PaginatorConfig, RawRow};
use polypage_types::{Row, Value};
use pretty_assertions::assert_eq;
use serde_json::json;

fn user(id: i64) -> PageItem<Kind, Model> {
    PageItem::Entity(Model::User(User {
        id,
        name: format!("user {id}"),
        age: 30,
    }))
}

fn page(count: i64, total: u64, per_page: u64, current: u64) -> Paginated<Kind, Model> {
    let items = (1..=count).map(user).collect();
    Paginated::new(items, total, per_page, current, "page", Some("/feed".into()))
}

#[test]
fn positions_and_page_flags() {
    let p = page(15, 52, 15, 2);
    assert_eq!(p.last_page(), 4);
    assert_eq!(p.first_item(), Some(16));
    assert_eq!(p.last_item(), Some(30));
    assert!(p.has_more_pages());
    assert!(!p.on_first_page());
    assert!(!p.on_last_page());

    let last = page(7, 52, 15, 4);
    assert_eq!(last.first_item(), Some(46));
    assert_eq!(last.last_item(), Some(52));
    assert!(last.on_last_page());
    assert!(!last.has_more_pages());
}

#[test]
fn empty_page_has_no_positions() {
    let p = page(0, 0, 15, 1);
    assert_eq!(p.last_page(), 1);
    assert_eq!(p.first_item(), None);
    assert_eq!(p.last_item(), None);
    assert!(p.on_first_page());
    assert!(p.on_last_page());
}

#[test]
fn positions_saturate_on_huge_pages() {
    let p = page(3, 10, 15, u64::MAX);
    assert_eq!(p.first_item(), Some(u64::MAX));
    assert_eq!(p.last_item(), Some(u64::MAX));
    assert!(!p.has_more_pages());
    assert_eq!(p.next_page_url(), None);

    let wide = page(2, 10, u64::MAX, 2);
    assert_eq!(wide.first_item(), Some(u64::MAX));
    assert_eq!(wide.last_item(), Some(u64::MAX));
}

#[test]
fn urls_use_path_and_page_name() {
    let p = page(15, 52, 15, 2);
    assert_eq!(p.url(3).as_deref(), Some("/feed?page=3"));
    assert_eq!(p.url(0).as_deref(), Some("/feed?page=1"));
    assert_eq!(p.next_page_url().as_deref(), Some("/feed?page=3"));
    assert_eq!(p.previous_page_url().as_deref(), Some("/feed?page=1"));

    let first = page(15, 52, 15, 1);
    assert_eq!(first.previous_page_url(), None);

    let filtered = Paginated::<Kind, Model>::new(
        Vec::new(),
        0,
        15,
        1,
        "p",
        Some("/search?q=rust".into()),
    );
    assert_eq!(filtered.url(2).as_deref(), Some("/search?q=rust&p=2"));

    let pathless = Paginated::<Kind, Model>::new(Vec::new(), 40, 15, 1, "page", None);
    assert_eq!(pathless.url(2), None);
    assert_eq!(pathless.next_page_url(), None);
}

#[test]
fn serializes_to_length_aware_shape() {
    let p = Paginated::new(vec![user(1), user(2)], 5, 2, 2, "page", Some("/feed".into()));
    let value = serde_json::to_value(&p).unwrap();
    assert_eq!(
        value,
        json!({
            "current_page": 2,
            "data": [
                { "id": 1, "name": "user 1", "age": 30 },
                { "id": 2, "name": "user 2", "age": 30 },
            ],
            "first_page_url": "/feed?page=1",
            "from": 3,
            "last_page": 3,
            "last_page_url": "/feed?page=3",
            "next_page_url": "/feed?page=3",
            "path": "/feed",
            "per_page": 2,
            "prev_page_url": "/feed?page=1",
            "to": 4,
            "total": 5,
        })
    );
}

#[test]
fn item_variants_serialize_by_shape() {
    let raw = RawRow {
        kind: Some(Kind::Post),
        id: Value::Integer(9),
        row: Row::from_pairs([("id", Value::Integer(9)), ("type", Value::from("post"))]),
    };
    let items: Vec<PageItem<Kind, Model>> = vec![
        PageItem::Row(raw.clone()),
        PageItem::Missing(raw),
        PageItem::Transformed(json!({ "label": "hi" })),
    ];
    let p = Paginated::new(items, 3, 15, 1, "page", None);
    let value = serde_json::to_value(&p).unwrap();
    assert_eq!(
        value["data"],
        json!([{ "id": 9, "type": "post" }, null, { "label": "hi" }])
    );
    assert_eq!(value["next_page_url"], json!(null));
}

#[test]
fn map_items_keeps_metadata() {
    let p = page(3, 10, 3, 2).map_items(|item| match item {
        PageItem::Entity(m) => PageItem::Transformed(json!(m.kind().tag())),
        other => other,
    });
    assert_eq!(p.total(), 10);
    assert_eq!(p.current_page(), 2);
    assert_eq!(
        p.items()
            .iter()
            .filter_map(PageItem::as_transformed)
            .cloned()
            .collect::<Vec<_>>(),
        vec![json!("user"); 3]
    );
}

#[test]
fn config_loads_from_json_with_defaults() {
    let config = PaginatorConfig::from_json(r#"{ "per_page": 25, "path": "/feed" }"#).unwrap();
    assert_eq!(config.per_page, 25);
    assert_eq!(config.path.as_deref(), Some("/feed"));
    assert_eq!(config.page_name, "page");
    assert_eq!(config.discriminator_column, "type");
    assert_eq!(config.default_order, None);
    assert_eq!(config.order_column(), "created_at");

    assert!(PaginatorConfig::from_json("{ nope").is_err());
}

#[test]
fn configured_path_reaches_pages() {
    let db = database();
    seed_users_and_posts(&db);
    let config = PaginatorConfig::default().with_path("/feed");
    let mut feed: Feed = polypage::UnionPaginator::with_config(std::sync::Arc::new(db.clone()), config);
    feed.register(user_type(&db)).unwrap();
    feed.register(post_type(&db)).unwrap();

    let page = feed.paginate(4, "page", Some(1)).unwrap();
    assert_eq!(page.next_page_url().as_deref(), Some("/feed?page=2"));
    assert_eq!(page.path(), Some("/feed"));
}
