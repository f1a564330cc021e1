//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed cwd and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use rag_config::RagConfig;

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[api]
base_url = "https://rag.internal:9000"
timeout_secs = 10
upload_timeout_secs = 600

[polling]
interval_ms = 1500

[general]
default_format = "table"
"#,
        )?;

        let config: RagConfig = Figment::from(Serialized::defaults(RagConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.api.base_url, "https://rag.internal:9000");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.upload_timeout_secs, 600);
        assert_eq!(config.polling.interval_ms, 1500);
        assert_eq!(config.general.default_format, "table");
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_other_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[polling]\ninterval_ms = 250\n")?;

        let config: RagConfig = Figment::from(Serialized::defaults(RagConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.polling.interval_ms, 250);
        assert_eq!(config.api.base_url, "http://localhost:8000");
        Ok(())
    });
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[api]\nbase_url = \"http://from-toml\"\n")?;
        jail.set_env("RAGDESK_API__BASE_URL", "http://from-env");

        let config: RagConfig = Figment::from(Serialized::defaults(RagConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("RAGDESK_").split("__"))
            .extract()?;

        assert_eq!(config.api.base_url, "http://from-env");
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".ragdesk")).map_err(|e| e.to_string())?;
        jail.create_file(".ragdesk/config.toml", "[api]\ntimeout_secs = 5\n")?;

        let config = RagConfig::load().expect("config loads");
        assert_eq!(config.api.timeout_secs, 5);
        Ok(())
    });
}
