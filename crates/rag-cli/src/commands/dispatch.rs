use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Health => commands::health::handle(ctx, flags).await,
        Commands::Project { action } => commands::project::handle(&action, ctx, flags).await,
        Commands::Chat { action } => commands::chat::handle(&action, ctx, flags).await,
        Commands::Doc { action } => commands::doc::handle(action, ctx, flags).await,
        Commands::Settings { action } => commands::settings::handle(action, ctx, flags).await,
        Commands::Citation(args) => commands::citation::handle(&args, ctx, flags).await,
        Commands::Auth { .. } => unreachable!("auth is handled before the client is built"),
    }
}
