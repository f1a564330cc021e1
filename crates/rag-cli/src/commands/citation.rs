use rag_core::entities::Chunk;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CitationArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct ChunkDetailResponse {
    kinds: Vec<String>,
    page_number: Option<u32>,
    char_count: u64,
    word_count: usize,
}

#[derive(Serialize)]
struct CitationResponse {
    chunk: Chunk,
    detail: ChunkDetailResponse,
}

/// Handle `ragc citation`.
pub async fn handle(
    args: &CitationArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let viewer = ctx.citation_viewer(&args.project_id);
    viewer
        .open(Some(args.document_id.as_str()), Some(args.chunk_id.as_str()))
        .await?;

    let view = viewer.snapshot();
    let (Some(chunk), Some(detail)) = (view.chunk.clone(), view.detail()) else {
        anyhow::bail!("chunk '{}' not found", args.chunk_id);
    };
    output(
        &CitationResponse {
            chunk,
            detail: ChunkDetailResponse {
                kinds: detail.kinds,
                page_number: detail.page_number,
                char_count: detail.char_count,
                word_count: detail.word_count,
            },
        },
        flags.format,
    )
}
