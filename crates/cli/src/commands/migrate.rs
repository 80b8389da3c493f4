use std::path::Path;

use super::{with_pool, CommandResult};
use vitrine_db::migrations;

pub fn run(config_path: &Path) -> CommandResult {
    with_pool("migrate", config_path, |_config, pool| async move {
        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;
        Ok(CommandResult::success("migrate", "database schema is up to date"))
    })
}
