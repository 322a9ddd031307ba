// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The procedures served by the stdio binary: a greeting, a calculator, and an in-memory post
//! store.

use std::sync::Arc;

use anyhow::Context;
use rpc_procedure::{DefinitionError, Namespace, Procedure, async_handler_fn, typed_handler_fn};
use rpc_schema::{Constraint, Property, SchemaDescriptor, Transformer};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Post {
    id: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
    tags: Vec<String>,
    created_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewPost {
    title: String,
    body: Option<String>,
    tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct PostFilter {
    tag: Option<String>,
}

#[derive(Default)]
struct PostStore {
    posts: RwLock<Vec<Post>>,
}

pub fn namespace() -> Result<Namespace, DefinitionError> {
    let store = Arc::new(PostStore::default());

    Namespace::new()
        .procedure("greeting", greeting()?)?
        .namespace("math", Namespace::new().procedure("add", add()?)?)?
        .namespace(
            "posts",
            Namespace::new()
                .procedure("create", create_post(store.clone())?)?
                .procedure("get", get_post(store.clone())?)?
                .procedure("list", list_posts(store)?)?,
        )
}

fn greeting() -> Result<Procedure, DefinitionError> {
    #[derive(Deserialize)]
    struct Input {
        name: String,
    }

    Procedure::builder()
        .description("Greet someone by name")
        .input(SchemaDescriptor::object([(
            "name",
            Property::required(
                SchemaDescriptor::string().with_constraint(Constraint::min_length(1)),
            ),
        )]))?
        .output(SchemaDescriptor::object([(
            "greeting",
            Property::required(SchemaDescriptor::string()),
        )]))?
        .handler(typed_handler_fn(|input: Input| {
            Ok(json!({ "greeting": format!("Hello, {}!", input.name) }))
        }))
}

fn add() -> Result<Procedure, DefinitionError> {
    #[derive(Deserialize)]
    struct Input {
        a: f64,
        b: f64,
    }

    let operand = || {
        Property::required(
            SchemaDescriptor::number()
                .with_transformer(Transformer::trim())
                .with_transformer(Transformer::text_to_number()),
        )
    };

    Procedure::builder()
        .description("Add two numbers, accepting numeric text")
        .input(SchemaDescriptor::object([("a", operand()), ("b", operand())]))?
        .output(SchemaDescriptor::number())?
        .handler(typed_handler_fn(|input: Input| Ok(input.a + input.b)))
}

fn post_schema() -> SchemaDescriptor {
    SchemaDescriptor::object([
        ("id", Property::required(SchemaDescriptor::custom("uuid"))),
        ("title", Property::required(SchemaDescriptor::string())),
        ("body", Property::optional(SchemaDescriptor::string())),
        (
            "tags",
            Property::required(SchemaDescriptor::array(SchemaDescriptor::string())),
        ),
        (
            "createdAt",
            Property::required(SchemaDescriptor::custom("datetime")),
        ),
    ])
}

fn create_post(store: Arc<PostStore>) -> Result<Procedure, DefinitionError> {
    Procedure::builder()
        .description("Store a new post")
        .input(SchemaDescriptor::object([
            (
                "title",
                Property::required(
                    SchemaDescriptor::string()
                        .with_transformer(Transformer::trim())
                        .with_constraint(Constraint::min_length(1))
                        .with_constraint(Constraint::max_length(120)),
                ),
            ),
            ("body", Property::optional(SchemaDescriptor::string())),
            (
                "tags",
                Property::optional(
                    SchemaDescriptor::array(SchemaDescriptor::string())
                        .with_constraint(Constraint::max_length(5)),
                ),
            ),
        ]))?
        .output(post_schema())?
        .handler(async_handler_fn(move |input: Value| {
            let store = store.clone();
            async move {
                let new_post: NewPost = serde_json::from_value(input)?;
                let post = Post {
                    id: Uuid::new_v4().to_string(),
                    title: new_post.title,
                    body: new_post.body,
                    tags: new_post.tags.unwrap_or_default(),
                    created_at: chrono::Utc::now().to_rfc3339(),
                };

                store.posts.write().await.push(post.clone());
                anyhow::Ok(serde_json::to_value(post)?)
            }
        }))
}

fn get_post(store: Arc<PostStore>) -> Result<Procedure, DefinitionError> {
    Procedure::builder()
        .description("Look up a post by id")
        .input(SchemaDescriptor::object([(
            "id",
            Property::required(SchemaDescriptor::custom("uuid")),
        )]))?
        .output(SchemaDescriptor::object([(
            "post",
            Property::optional(post_schema()),
        )]))?
        .handler(async_handler_fn(move |input: Value| {
            let store = store.clone();
            async move {
                let id = input
                    .get("id")
                    .and_then(Value::as_str)
                    .context("validated input carries an id")?;

                let posts = store.posts.read().await;
                anyhow::Ok(match posts.iter().find(|post| post.id == id) {
                    Some(post) => json!({ "post": post }),
                    None => json!({}),
                })
            }
        }))
}

fn list_posts(store: Arc<PostStore>) -> Result<Procedure, DefinitionError> {
    Procedure::builder()
        .description("List posts, optionally only those carrying a tag")
        .input(SchemaDescriptor::object([(
            "tag",
            Property::optional(SchemaDescriptor::string()),
        )]))?
        .output(SchemaDescriptor::array(post_schema()))?
        .handler(async_handler_fn(move |input: Value| {
            let store = store.clone();
            async move {
                let filter: PostFilter = serde_json::from_value(input)?;
                let posts = store.posts.read().await;

                let matching: Vec<&Post> = posts
                    .iter()
                    .filter(|post| match &filter.tag {
                        Some(tag) => post.tags.contains(tag),
                        None => true,
                    })
                    .collect();
                anyhow::Ok(serde_json::to_value(matching)?)
            }
        }))
}
