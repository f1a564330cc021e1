mod upload;
mod watch;

use rag_core::entities::ProjectDocument;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{DocAddUrlArgs, DocCommands, DocRef};
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct DeletedResponse {
    deleted: String,
}

#[derive(Serialize)]
struct DocumentsResponse {
    documents: Vec<ProjectDocument>,
}

/// Handle `ragc doc <subcommand>`.
pub async fn handle(
    action: DocCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        DocCommands::Upload(args) => upload::handle(args, ctx, flags).await,
        DocCommands::AddUrl(args) => add_url(&args, ctx, flags).await,
        DocCommands::Delete(DocRef {
            project_id,
            document_id,
        }) => {
            ctx.project_page(&project_id)
                .delete_document(&document_id)
                .await?;
            output(
                &DeletedResponse {
                    deleted: document_id,
                },
                flags.format,
            )
        }
        DocCommands::Show(DocRef {
            project_id,
            document_id,
        }) => {
            let page = ctx.project_page(&project_id);
            page.load().await?;
            page.select_document(Some(document_id.clone()));
            let view = page.snapshot();
            let document = view
                .selected_document()
                .ok_or_else(|| anyhow::anyhow!("document '{document_id}' not found"))?;
            output(document, flags.format)
        }
        DocCommands::Watch { project_id } => {
            let page = ctx.project_page(&project_id);
            page.load().await?;
            watch::until_settled(&page).await?;
            output(
                &DocumentsResponse {
                    documents: page.snapshot().documents,
                },
                flags.format,
            )
        }
    }
}

async fn add_url(args: &DocAddUrlArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let page = ctx.project_page(&args.project_id);
    let added = page.add_url(&args.url).await?;
    if !args.watch {
        return output(&added, flags.format);
    }

    watch::until_settled(&page).await?;
    let view = page.snapshot();
    let document = view
        .documents
        .into_iter()
        .find(|doc| doc.id == added.id)
        .unwrap_or(added);
    output(&document, flags.format)
}
