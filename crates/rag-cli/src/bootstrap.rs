use anyhow::Context;
use rag_config::RagConfig;

/// Load `.env` (if any) and then the layered configuration.
///
/// A `.env` next to a project-local `.ragdesk/` directory wins over one in
/// the current directory.
pub fn load_config() -> anyhow::Result<RagConfig> {
    load_dotenv()?;
    RagConfig::load().context("failed to load ragdesk configuration")
}

fn load_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;

    if let Some(root) = cwd.ancestors().find(|dir| dir.join(".ragdesk").is_dir()) {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenvy::from_path(&env_path)
                .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
            return Ok(());
        }
    }

    dotenvy::dotenv().ok();
    Ok(())
}
