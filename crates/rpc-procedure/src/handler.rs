// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// User code behind a procedure. Receives the validated input and produces the output that
/// will be checked against the output schema.
///
/// Errors are never shown to callers; they are logged and reported as a generic internal error.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, input: Value) -> anyhow::Result<Value>;
}

struct FnHandler<F>(F);

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: Fn(Value) -> anyhow::Result<Value> + Send + Sync,
{
    async fn call(&self, input: Value) -> anyhow::Result<Value> {
        (self.0)(input)
    }
}

struct AsyncFnHandler<F>(F);

#[async_trait]
impl<F, Fut> Handler for AsyncFnHandler<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Value>> + Send,
{
    async fn call(&self, input: Value) -> anyhow::Result<Value> {
        (self.0)(input).await
    }
}

/// A handler that completes synchronously.
pub fn handler_fn<F>(f: F) -> Arc<dyn Handler>
where
    F: Fn(Value) -> anyhow::Result<Value> + Send + Sync + 'static,
{
    Arc::new(FnHandler(f))
}

/// A handler that suspends, e.g. to wait on I/O.
pub fn async_handler_fn<F, Fut>(f: F) -> Arc<dyn Handler>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    Arc::new(AsyncFnHandler(f))
}

/// A synchronous handler working on data-transfer types paired with the procedure's schemas.
///
/// The input has already been validated when the handler runs, so a deserialization failure
/// means the type and the input schema disagree.
pub fn typed_handler_fn<I, O, F>(f: F) -> Arc<dyn Handler>
where
    I: DeserializeOwned,
    O: Serialize,
    F: Fn(I) -> anyhow::Result<O> + Send + Sync + 'static,
{
    handler_fn(move |input| {
        let input: I = serde_json::from_value(input)?;
        Ok(serde_json::to_value(f(input)?)?)
    })
}
