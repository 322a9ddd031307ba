// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Line-delimited JSON-RPC over stdin/stdout.
//!
//! Each input line is one request (or batch) and produces exactly one output line.

mod api;

use std::sync::Arc;

use rpc_common::env::{EnvError, SystemEnvironment};
use rpc_common::logging_tracing::{self, TracingInitError};
use rpc_procedure::DefinitionError;
use rpc_router::{CompileError, Router, RouterOptions};
use rpc_schema::{ConstructionError, Engine, EngineOptions};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

#[derive(Error)]
enum ServerError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Env(#[from] EnvError),
    #[error("{0}")]
    Logging(#[from] TracingInitError),
    #[error("{0}")]
    Engine(#[from] ConstructionError),
    #[error("{0}")]
    Definition(#[from] DefinitionError),
    #[error("{0}")]
    Compile(#[from] CompileError),
}

// Delegate to `Display` so that the exit message stays readable.
impl std::fmt::Debug for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    logging_tracing::init()?;

    let env = SystemEnvironment;
    let engine = Engine::standard(EngineOptions::from_env(&env)?)?;
    let router = Arc::new(Router::compile(
        &api::namespace()?,
        &engine,
        RouterOptions::from_env(&env)?,
    )?);

    info!(methods = ?router.methods().collect::<Vec<_>>(), "Serving on stdio");

    serve(router).await?;

    Ok(())
}

async fn serve(router: Arc<Router>) -> Result<(), std::io::Error> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = router.handle_payload(&line).await;

        stdout.write_all(reply.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    debug!("stdin closed");
    Ok(())
}
