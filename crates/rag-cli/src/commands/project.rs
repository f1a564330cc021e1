use rag_core::entities::{Chat, NewProject, Project, ProjectDocument};
use rag_core::settings::ProjectSettings;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProjectCommands;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct ProjectDetailResponse {
    project: Option<Project>,
    settings: Option<ProjectSettings>,
    chats: Vec<Chat>,
    documents: Vec<ProjectDocument>,
    processing: bool,
}

#[derive(Serialize)]
struct DeletedResponse<'a> {
    deleted: &'a str,
}

/// Handle `ragc project <subcommand>`.
pub async fn handle(
    action: &ProjectCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProjectCommands::List => {
            let token = ctx.require_token().await?;
            let projects = ctx.client().list_projects(Some(&token)).await?;
            output(&projects, flags.format)
        }
        ProjectCommands::Create(args) => {
            let token = ctx.require_token().await?;
            let request = NewProject {
                name: args.name.clone(),
                description: args.description.clone(),
            };
            let project = ctx.client().create_project(&request, Some(&token)).await?;
            output(&project, flags.format)
        }
        ProjectCommands::Delete { project_id } => {
            let token = ctx.require_token().await?;
            ctx.client().delete_project(project_id, Some(&token)).await?;
            output(&DeletedResponse { deleted: project_id }, flags.format)
        }
        ProjectCommands::Show { project_id } => show(project_id, ctx, flags).await,
    }
}

async fn show(project_id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let page = ctx.project_page(project_id);
    let progress = Progress::spinner("Loading project");
    if let Err(error) = page.load().await {
        progress.finish_err("Failed to load project");
        return Err(error.into());
    }
    progress.finish_clear();

    let view = page.snapshot();
    output(
        &ProjectDetailResponse {
            project: view.project,
            settings: view.published_settings,
            chats: view.chats,
            documents: view.documents,
            processing: view.polling,
        },
        flags.format,
    )
}
