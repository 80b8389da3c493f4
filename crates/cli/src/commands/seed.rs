use std::path::Path;

use serde_json::json;

use super::{with_pool, CommandResult};
use vitrine_db::{migrations, SeedDataset};

pub fn run(config_path: &Path) -> CommandResult {
    with_pool("seed", config_path, |_config, pool| async move {
        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let seeded = SeedDataset::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

        let verification = SeedDataset::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

        if !verification.all_present {
            let failed: Vec<&str> = verification
                .checks
                .iter()
                .filter_map(|(check, passed)| (!passed).then_some(*check))
                .collect();
            return Err((
                "seed_verification",
                format!("seed verification failed for checks: {}", failed.join(", ")),
                6u8,
            ));
        }

        Ok(CommandResult::success_with_data(
            "seed",
            "seed catalog loaded and verified",
            Some(json!({ "products_seeded": seeded.products_seeded })),
        ))
    })
}
