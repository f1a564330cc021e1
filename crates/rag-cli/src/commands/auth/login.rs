use anyhow::Context;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthLoginArgs;
use crate::output::output;

#[derive(Serialize)]
struct LoginResponse {
    authenticated: bool,
    user_id: String,
    session_id: Option<String>,
    expires_at: Option<String>,
}

pub fn handle(args: &AuthLoginArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let claims = rag_auth::login(&args.token).context("failed to store token")?;
    tracing::info!(user_id = %claims.user_id, "token stored");
    output(
        &LoginResponse {
            authenticated: true,
            user_id: claims.user_id,
            session_id: claims.session_id,
            expires_at: claims.expires_at.map(|at| at.to_rfc3339()),
        },
        flags.format,
    )
}
