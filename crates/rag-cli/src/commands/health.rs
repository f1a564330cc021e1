use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct HealthResponse {
    base_url: String,
    status: String,
    version: Option<String>,
}

/// Handle `ragc health`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let health = ctx.client().health().await?;
    output(
        &HealthResponse {
            base_url: ctx.client().base_url().to_string(),
            status: health.status,
            version: health.version,
        },
        flags.format,
    )
}
