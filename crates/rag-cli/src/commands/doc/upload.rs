use std::path::Path;

use anyhow::Context;
use rag_core::entities::ProjectDocument;
use rag_session::UploadFile;
use serde::Serialize;

use super::watch;
use crate::cli::GlobalFlags;
use crate::cli::subcommands::DocUploadArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Serialize)]
struct UploadFailure {
    filename: String,
    error: String,
}

#[derive(Serialize)]
struct UploadResponse {
    uploaded: Vec<ProjectDocument>,
    failed: Vec<UploadFailure>,
}

pub async fn handle(
    args: DocUploadArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        files.push(read_file(path).await?);
    }

    let page = ctx.project_page(&args.project_id);
    let progress = Progress::spinner(&format!("Uploading {} file(s)", files.len()));
    let report = page.upload_documents(files).await?;
    progress.finish_clear();

    if args.watch && !report.uploaded.is_empty() {
        watch::until_settled(&page).await?;
    }

    // After a watch the poll loop has refreshed every status.
    let view = page.snapshot();
    let uploaded = report
        .uploaded
        .iter()
        .map(|doc| {
            view.documents
                .iter()
                .find(|current| current.id == doc.id)
                .unwrap_or(doc)
                .clone()
        })
        .collect::<Vec<_>>();
    let nothing_uploaded = uploaded.is_empty();

    output(
        &UploadResponse {
            uploaded,
            failed: report
                .failed
                .into_iter()
                .map(|(filename, error)| UploadFailure {
                    filename,
                    error: error.to_string(),
                })
                .collect(),
        },
        flags.format,
    )?;

    if nothing_uploaded {
        anyhow::bail!("no document was uploaded");
    }
    Ok(())
}

async fn read_file(path: &Path) -> anyhow::Result<UploadFile> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("not a file path: {}", path.display()))?
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(UploadFile {
        content_type: content_type_for(path).to_string(),
        filename,
        bytes,
    })
}

/// MIME type guessed from the file extension.
fn content_type_for(path: &Path) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_CONTENT_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_extension_case_insensitively() {
        assert_eq!(content_type_for(Path::new("report.PDF")), "application/pdf");
        assert_eq!(content_type_for(Path::new("guide.txt")), "text/plain");
        assert_eq!(content_type_for(Path::new("export.unknownext")), FALLBACK_CONTENT_TYPE);
        assert_eq!(content_type_for(Path::new("Makefile")), FALLBACK_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn read_file_keeps_name_and_bytes() {
        let dir = tempfile::TempDir::new().expect("tmp dir");
        let path = dir.path().join("guide.txt");
        std::fs::write(&path, "hello").expect("write");

        let file = read_file(&path).await.expect("read");
        assert_eq!(file.filename, "guide.txt");
        assert_eq!(file.content_type, "text/plain");
        assert_eq!(file.bytes, b"hello");
    }

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let err = read_file(Path::new("/definitely/not/here.pdf"))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.pdf"));
    }
}
