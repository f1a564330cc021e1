use rag_core::settings::{ProjectSettings, SettingsUpdate};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{SettingsCommands, SettingsPublishArgs};
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct DraftResponse {
    settings: ProjectSettings,
    changes: Vec<String>,
    published: bool,
}

/// Handle `ragc settings <subcommand>`.
pub async fn handle(
    action: SettingsCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SettingsCommands::Show { project_id } => {
            let page = ctx.project_page(&project_id);
            page.load().await?;
            let settings = page
                .snapshot()
                .published_settings
                .ok_or_else(|| anyhow::anyhow!("project has no settings"))?;
            output(&settings, flags.format)
        }
        SettingsCommands::Publish(args) => publish(args, ctx, flags).await,
    }
}

async fn publish(
    args: SettingsPublishArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let page = ctx.project_page(&args.project_id);
    page.load().await?;

    let changes: Vec<String> = args.set.iter().map(SettingsUpdate::to_string).collect();
    let draft = page.draft_settings(args.set)?;
    if args.dry_run {
        return output(
            &DraftResponse {
                settings: draft,
                changes,
                published: false,
            },
            flags.format,
        );
    }

    let settings = page.publish_settings().await?;
    output(
        &DraftResponse {
            settings,
            changes,
            published: true,
        },
        flags.format,
    )
}
