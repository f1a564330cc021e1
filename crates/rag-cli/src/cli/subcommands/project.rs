use clap::{Args, Subcommand};

/// Project commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProjectCommands {
    /// List your projects.
    List,
    /// Create a project.
    Create(ProjectCreateArgs),
    /// Delete a project.
    Delete {
        /// Project ID.
        project_id: String,
    },
    /// Show a project with its chats, documents, and settings.
    Show {
        /// Project ID.
        project_id: String,
    },
}

#[derive(Clone, Debug, Args)]
pub struct ProjectCreateArgs {
    /// Project name.
    #[arg(long)]
    pub name: String,
    /// Optional description.
    #[arg(long, default_value = "")]
    pub description: String,
}
