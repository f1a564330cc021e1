use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Document commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DocCommands {
    /// Upload one or more files.
    Upload(DocUploadArgs),
    /// Add a web page as a document source.
    AddUrl(DocAddUrlArgs),
    /// Delete a document.
    Delete(DocRef),
    /// Show one document.
    Show(DocRef),
    /// Wait until every document in the project finished processing.
    Watch {
        /// Project ID.
        project_id: String,
    },
}

#[derive(Clone, Debug, Args)]
pub struct DocRef {
    /// Project ID.
    pub project_id: String,
    /// Document ID.
    pub document_id: String,
}

#[derive(Clone, Debug, Args)]
pub struct DocUploadArgs {
    /// Project ID.
    pub project_id: String,
    /// Files to upload.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Keep running until processing finishes.
    #[arg(long)]
    pub watch: bool,
}

#[derive(Clone, Debug, Args)]
pub struct DocAddUrlArgs {
    /// Project ID.
    pub project_id: String,
    /// Page URL.
    pub url: String,
    /// Keep running until processing finishes.
    #[arg(long)]
    pub watch: bool,
}
