//! Scenario catalogue for the placeholder blog API.
//!
//! The remote service echoes writes back without persisting them, so the
//! write scenarios check the echoed envelope only. No scenario depends on
//! the effect of another one.

use probe_domain::{Assertion, ComparisonOperator, RequestSpec, Scenario};
use serde_json::json;

use crate::error::ProbeResult;

/// Name reported for the placeholder suite.
pub const PLACEHOLDER_SUITE: &str = "placeholder_posts";

/// GET `posts`: a non-empty list where some post has a title.
#[must_use]
pub fn get_posts() -> Scenario {
    Scenario::new("get_posts", RequestSpec::get("posts")).with_assertions([
        Assertion::success(),
        Assertion::BodyNotEmpty,
        Assertion::NonEmptyArray,
        Assertion::any_element_has("title"),
    ])
}

/// POST `posts`: the created post echoes the payload and gets an id.
///
/// # Errors
///
/// Returns an error if the payload cannot be serialized.
pub fn create_post() -> ProbeResult<Scenario> {
    let payload = json!({"title": "foo", "body": "bar", "userId": 1});
    Ok(
        Scenario::new("create_post", RequestSpec::post("posts", &payload)?).with_assertions([
            Assertion::field_equals("title", "foo"),
            Assertion::field_equals("body", "bar"),
            Assertion::field_equals("userId", 1),
            Assertion::field_compare("id", ComparisonOperator::GreaterThan, 0),
        ]),
    )
}

/// PUT `posts/1`: the updated post echoes the new title and body.
///
/// # Errors
///
/// Returns an error if the payload cannot be serialized.
pub fn update_post() -> ProbeResult<Scenario> {
    let payload = json!({
        "id": 1,
        "title": "updated title",
        "body": "updated body",
        "userId": 1,
    });
    Ok(
        Scenario::new("update_post", RequestSpec::put("posts/1", &payload)?).with_assertions([
            Assertion::field_equals("title", "updated title"),
            Assertion::field_equals("body", "updated body"),
            Assertion::field_equals("userId", 1),
        ]),
    )
}

/// DELETE `posts/1`: answered with exactly 200.
#[must_use]
pub fn delete_post() -> Scenario {
    Scenario::new("delete_post", RequestSpec::delete("posts/1"))
        .with_assertions([Assertion::success(), Assertion::status(200)])
}

/// POST `posts/1/comments`: the created comment echoes the payload.
///
/// # Errors
///
/// Returns an error if the payload cannot be serialized.
pub fn add_comment_to_post() -> ProbeResult<Scenario> {
    let payload = json!({
        "name": "foo",
        "email": "foo@bar.com",
        "body": "Nice post!",
        "postId": 1,
    });
    Ok(Scenario::new(
        "add_comment_to_post",
        RequestSpec::post("posts/1/comments", &payload)?,
    )
    .with_assertions([
        Assertion::field_equals("name", "foo"),
        Assertion::field_equals("email", "foo@bar.com"),
        Assertion::field_equals("body", "Nice post!"),
        Assertion::field_equals("postId", 1),
    ]))
}

/// GET `comments?postId=1`: a non-empty list where some comment has a body.
#[must_use]
pub fn get_comments_for_post() -> Scenario {
    Scenario::new("get_comments_for_post", RequestSpec::get("comments?postId=1")).with_assertions(
        [
            Assertion::success(),
            Assertion::BodyNotEmpty,
            Assertion::NonEmptyArray,
            Assertion::any_element_has("body"),
        ],
    )
}

/// All placeholder scenarios in their canonical order.
///
/// # Errors
///
/// Returns an error if a payload cannot be serialized.
pub fn placeholder_suite() -> ProbeResult<Vec<Scenario>> {
    Ok(vec![
        get_posts(),
        create_post()?,
        update_post()?,
        delete_post(),
        add_comment_to_post()?,
        get_comments_for_post(),
    ])
}
