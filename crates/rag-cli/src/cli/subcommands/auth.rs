use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Store a bearer token issued by the identity provider.
    Login(AuthLoginArgs),
    /// Clear stored credentials.
    Logout,
    /// Show who is signed in.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// The JWT to store.
    #[arg(long)]
    pub token: String,
}
