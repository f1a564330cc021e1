use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    AuthCommands, ChatCommands, DocCommands, ProjectCommands, SettingsCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Check that the backend is reachable.
    Health,
    /// Manage the stored bearer token.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Projects.
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// Chats within a project.
    Chat {
        #[command(subcommand)]
        action: ChatCommands,
    },
    /// Documents and URL sources within a project.
    Doc {
        #[command(subcommand)]
        action: DocCommands,
    },
    /// Retrieval settings of a project.
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },
    /// Show a cited chunk.
    Citation(CitationArgs),
}

#[derive(Clone, Debug, Args)]
pub struct CitationArgs {
    /// Project the document belongs to.
    pub project_id: String,
    /// Cited document ID.
    pub document_id: String,
    /// Cited chunk ID.
    pub chunk_id: String,
}
