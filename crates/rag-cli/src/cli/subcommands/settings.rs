use clap::{Args, Subcommand};
use rag_core::settings::SettingsUpdate;

/// Settings commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SettingsCommands {
    /// Show the published settings.
    Show {
        /// Project ID.
        project_id: String,
    },
    /// Edit settings and save them.
    Publish(SettingsPublishArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SettingsPublishArgs {
    /// Project ID.
    pub project_id: String,
    /// `key=value` edit; repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_update)]
    pub set: Vec<SettingsUpdate>,
    /// Print the edited draft without saving it.
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_update(value: &str) -> Result<SettingsUpdate, String> {
    SettingsUpdate::parse(value).map_err(|error| error.to_string())
}
