//! Pagination Tests
//!
//! Page sizing and token continuation through the full list path:
//! - Negative page sizes are rejected, zero selects the default
//! - Oversized pages clamp to the configured maximum
//! - A page token orders by document id last with the token as final cursor value
//! - Following next_page_token walks the collection without overlap
//! - Pages ordered on a filtered field do not hand out a token

use filterstore::filtering::{Declarations, Type};
use filterstore::store::{InMemoryStore, DOCUMENT_ID};
use filterstore::transpiler::{ListRequest, PageSizeLimits, Transpiler};
use serde::Deserialize;
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    name: String,
    age: i64,
}

fn transpiler(limits: PageSizeLimits) -> Transpiler<InMemoryStore> {
    let store = InMemoryStore::from_seed(json!({
        "users": [
            {"id": "u1", "name": "ada", "age": 36, "profile": {"bio": "a"}},
            {"id": "u2", "name": "bob", "age": 17, "profile": {"bio": "b"}},
            {"id": "u3", "name": "cy", "age": 52, "profile": {"bio": "c"}},
            {"id": "u4", "name": "di", "age": 29},
            {"id": "u5", "name": "ed", "age": 71}
        ],
        "orgs/o1/users": [
            {"id": "m1", "name": "fay", "age": 44}
        ]
    }))
    .unwrap();

    let declarations = Declarations::new()
        .with_ident("age", Type::Int64)
        .with_ident("name", Type::String)
        .with_ident("profile", Type::Message("Profile".into()))
        .with_message("Profile", [("bio", Type::String)]);
    Transpiler::new(store, "users", declarations, limits)
}

fn request(filter: &str, page_size: i32, page_token: &str) -> ListRequest {
    ListRequest {
        filter: filter.to_string(),
        page_size,
        page_token: page_token.to_string(),
        ..Default::default()
    }
}

// =============================================================================
// Page Size Tests
// =============================================================================

#[test]
fn test_negative_page_size_is_invalid_argument() {
    let t = transpiler(PageSizeLimits::default());
    let err = t.transpile::<Value>(&request("", -1, "")).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_zero_page_size_uses_default() {
    let t = transpiler(PageSizeLimits {
        default_page_size: 3,
        max_page_size: 10,
    });
    let query = t.plan(&request("", 0, "")).unwrap();
    assert_eq!(query.limit, Some(3));
}

#[test]
fn test_oversized_page_is_clamped() {
    let t = transpiler(PageSizeLimits {
        default_page_size: 2,
        max_page_size: 4,
    });
    let page = t.transpile::<User>(&request("", 500, "")).unwrap();
    assert_eq!(page.items.len(), 4);
}

// =============================================================================
// Cursor Tests
// =============================================================================

#[test]
fn test_token_is_last_cursor_value() {
    let t = transpiler(PageSizeLimits::default());
    let query = t.plan(&request("age > 20", 10, "u2")).unwrap();
    let last = query.order_by.last().unwrap();
    assert_eq!(last.path, DOCUMENT_ID);
    assert_eq!(query.start_after.unwrap().last(), Some(&json!("u2")));
}

#[test]
fn test_follow_tokens_without_overlap() {
    let t = transpiler(PageSizeLimits::default());

    let first = t.transpile::<User>(&request("age > 20", 2, "")).unwrap();
    assert_eq!(
        first.items.iter().map(|u| u.name.as_str()).collect::<Vec<_>>(),
        vec!["ada", "cy"]
    );
    assert_eq!(first.next_page_token, "u3");

    let second = t
        .transpile::<User>(&request("age > 20", 2, &first.next_page_token))
        .unwrap();
    assert_eq!(
        second.items.iter().map(|u| u.name.as_str()).collect::<Vec<_>>(),
        vec!["di", "ed"]
    );
    assert_eq!(second.next_page_token, "u5");

    let third = t
        .transpile::<User>(&request("age > 20", 2, &second.next_page_token))
        .unwrap();
    assert!(third.items.is_empty());
    assert_eq!(third.next_page_token, "");
}

#[test]
fn test_follow_tokens_under_has_terminates() {
    let t = transpiler(PageSizeLimits::default());
    let filter = r#"has(profile, "bio")"#;

    let mut seen = Vec::new();
    let mut token = String::new();
    for _ in 0..5 {
        let page = t.transpile::<User>(&request(filter, 2, &token)).unwrap();
        seen.extend(page.items.into_iter().map(|u| u.name));
        token = page.next_page_token;
        if token.is_empty() {
            break;
        }
    }

    assert!(token.is_empty());
    assert_eq!(seen, vec!["ada", "bob"]);
}

#[test]
fn test_short_page_ends_pagination() {
    let t = transpiler(PageSizeLimits::default());
    let page = t.transpile::<User>(&request("age < 30", 10, "")).unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.next_page_token, "");
}

// =============================================================================
// Parent Tests
// =============================================================================

#[test]
fn test_parent_scopes_collection() {
    let t = transpiler(PageSizeLimits::default());
    let req = ListRequest {
        parent: "orgs/o1".into(),
        ..Default::default()
    };
    let page = t.transpile::<User>(&req).unwrap();
    assert_eq!(
        page.items,
        vec![User {
            name: "fay".into(),
            age: 44
        }]
    );
}
