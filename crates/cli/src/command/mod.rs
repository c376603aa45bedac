pub mod domain;

pub use domain::{
    classify_error, CommandAction, CommandRequest, CommandResponse, CommandStatus, ErrorCode,
    InvalidRequest, ResponseMeta,
};

use anyhow::{Context as AnyhowContext, Result};
use dex_protocol::{QueryParams, TypesResponse};
use dex_search::SearchEngine;
use domain::CommandOutcome;
use serde_json::Value;
use std::time::Instant;

/// Executes Command API requests against an opened engine.
#[derive(Clone)]
pub struct CommandHandler {
    engine: SearchEngine,
    catalog_records: usize,
}

impl CommandHandler {
    pub fn new(engine: SearchEngine, catalog_records: usize) -> Self {
        Self {
            engine,
            catalog_records,
        }
    }

    pub async fn execute(&self, request: CommandRequest) -> CommandResponse {
        let started = Instant::now();
        let CommandRequest { action, payload } = request;

        let outcome = self.route(action, payload).await;
        let duration_ms = Some(started.elapsed().as_millis() as u64);

        match outcome {
            Ok(mut outcome) => {
                outcome.meta.duration_ms = duration_ms;
                outcome.meta.catalog_records = Some(self.catalog_records);
                outcome.meta.action = Some(action.as_str());
                CommandResponse {
                    status: CommandStatus::Ok,
                    message: None,
                    error: None,
                    data: outcome.data,
                    meta: outcome.meta,
                }
            }
            Err(err) => {
                let code = classify_error(&err);
                let message = format!("{err:#}");
                log::debug!("Command {} failed ({}): {message}", action.as_str(), code.as_str());
                let meta = ResponseMeta {
                    duration_ms,
                    catalog_records: Some(self.catalog_records),
                    action: Some(action.as_str()),
                };
                CommandResponse::error(code, message, meta)
            }
        }
    }

    async fn route(&self, action: CommandAction, payload: Value) -> Result<CommandOutcome> {
        match action {
            CommandAction::Search => self.search(payload).await,
            CommandAction::Types => self.types().await,
        }
    }

    async fn search(&self, payload: Value) -> Result<CommandOutcome> {
        let query = parse_search_payload(payload)?;
        let response = self.engine.search(&query).await?;
        Ok(CommandOutcome {
            data: serde_json::to_value(response)?,
            ..Default::default()
        })
    }

    async fn types(&self) -> Result<CommandOutcome> {
        let types = self.engine.types().await?;
        Ok(CommandOutcome {
            data: serde_json::to_value(TypesResponse { types })?,
            ..Default::default()
        })
    }
}

fn parse_search_payload(payload: Value) -> Result<dex_protocol::Query> {
    let params: QueryParams = serde_json::from_value(payload)
        .map_err(|err| InvalidRequest(err.to_string()))
        .context("Invalid search payload")?;
    params
        .into_query()
        .map_err(|err| InvalidRequest(err.to_string()))
        .context("Invalid search payload")
}

/// Parse raw request text into a response, reporting malformed JSON as `invalid_request`.
pub async fn execute_raw(handler: &CommandHandler, raw: &str) -> CommandResponse {
    match serde_json::from_str::<CommandRequest>(raw) {
        Ok(request) => handler.execute(request).await,
        Err(err) => CommandResponse::error(
            ErrorCode::InvalidRequest,
            format!("Invalid JSON request: {err}"),
            ResponseMeta::default(),
        ),
    }
}
