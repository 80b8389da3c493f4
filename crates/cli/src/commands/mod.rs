pub mod clear_cache;
pub mod migrate;
pub mod recommend;
pub mod seed;

use std::future::Future;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use vitrine_core::config::AppConfig;
use vitrine_db::DbPool;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_data(command, message, None)
    }

    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Load configuration, stand up a current-thread runtime, connect, run the
/// command body, close the pool. Every command funnels through here so
/// failure classes and exit codes stay uniform.
pub(crate) fn with_pool<F, Fut>(command: &'static str, config_path: &Path, body: F) -> CommandResult
where
    F: FnOnce(AppConfig, DbPool) -> Fut,
    Fut: Future<Output = Result<CommandResult, (&'static str, String, u8)>>,
{
    let config = match AppConfig::load(config_path) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                command,
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    runtime.block_on(async {
        let pool = match vitrine_db::connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        {
            Ok(pool) => pool,
            Err(error) => {
                return CommandResult::failure(
                    command,
                    "db_connectivity",
                    error.to_string(),
                    4,
                );
            }
        };

        let result = body(config, pool.clone()).await;
        pool.close().await;

        match result {
            Ok(result) => result,
            Err((error_class, message, exit_code)) => {
                CommandResult::failure(command, error_class, message, exit_code)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_payload_is_flat_json() {
        let result = CommandResult::success("migrate", "0 pending");
        let value: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(value["command"], "migrate");
        assert_eq!(value["status"], "ok");
        assert!(value.get("data").is_none());
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn failure_payload_carries_class_and_exit_code() {
        let result = CommandResult::failure("seed", "db_connectivity", "no such file", 4);
        let value: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["error_class"], "db_connectivity");
        assert_eq!(result.exit_code, 4);
    }
}
