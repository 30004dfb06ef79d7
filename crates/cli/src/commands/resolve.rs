use serde_json::{json, Value};
use tally_core::{
    config::AppConfig,
    resolver::{Resolution, ResolveError},
};
use tracing::info;

use super::utils::{print_success, CliError, CliResult};

/// Options for a single resolution run.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub key: String,
    pub json: bool,
}

/// Loads and validates the configuration at `file`.
pub fn load_config(file: &str) -> CliResult<AppConfig> {
    let config = AppConfig::from_file(file).map_err(|e| CliError::Config(e.to_string()))?;
    config.validate().map_err(CliError::Config)?;
    Ok(config)
}

pub async fn handle_resolve_command(config: &AppConfig, options: &ResolveOptions) -> CliResult<()> {
    let resolution = resolve_key(config, &options.key).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&render_json(&options.key, &resolution))?);
        return Ok(());
    }

    print_success(&format!(
        "Resolved {:?} with weight {} of {}",
        options.key, resolution.weight, resolution.total_weight
    ));
    match &resolution.value {
        Some(value) => println!("Value: {}", serde_json::to_string_pretty(value)?),
        None => println!("Value: <absent>"),
    }
    println!("Supporters: {}", join_names(&resolution.supporters));
    if !resolution.dissenters.is_empty() {
        println!("Dissenters: {}", join_names(&resolution.dissenters));
    }

    Ok(())
}

/// Resolves `key` across the configured providers.
pub async fn resolve_key(config: &AppConfig, key: &str) -> CliResult<Resolution<Value>> {
    let providers = config.build_providers().map_err(|e| CliError::Config(e.to_string()))?;
    let resolver = config.build_resolver();

    match resolver.resolve(&providers, key).await {
        Ok(resolution) => {
            info!(
                key,
                weight = resolution.weight,
                total_weight = resolution.total_weight,
                providers = providers.len(),
                "key resolved"
            );
            Ok(resolution)
        }
        Err(ResolveError::ConsensusTie { weight, tied, representatives }) => {
            Err(CliError::Resolve(format!(
                "Consensus tie: {tied} answer groups share the maximum weight {weight} (tied: {})",
                representatives.join(", ")
            )))
        }
        Err(err) => Err(err.into()),
    }
}

/// Machine-readable rendering of a resolution.
pub fn render_json(key: &str, resolution: &Resolution<Value>) -> Value {
    json!({
        "key": key,
        "value": resolution.value,
        "weight": resolution.weight,
        "total_weight": resolution.total_weight,
        "agreement_count": resolution.agreement_count,
        "total_answers": resolution.total_answers,
        "supporters": resolution.supporters.iter().map(AsRef::as_ref).collect::<Vec<&str>>(),
        "dissenters": resolution.dissenters.iter().map(AsRef::as_ref).collect::<Vec<&str>>(),
    })
}

fn join_names(names: &[std::sync::Arc<str>]) -> String {
    names.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tally_core::config::ProviderConfig;

    fn provider(name: &str, weight: u32, answer: Option<Value>) -> ProviderConfig {
        let answers: HashMap<String, Value> =
            answer.into_iter().map(|value| ("user".to_string(), value)).collect();
        ProviderConfig { name: name.to_string(), weight, answers, fail_with: None }
    }

    fn config(providers: Vec<ProviderConfig>) -> AppConfig {
        AppConfig { providers, ..AppConfig::default() }
    }

    #[tokio::test]
    async fn test_resolve_key_picks_heaviest_answer() {
        let config = config(vec![
            provider("a", 1, Some(json!({"id": 1}))),
            provider("b", 1, Some(json!({"id": 1}))),
            provider("c", 5, Some(json!({"id": 2}))),
        ]);

        let resolution = resolve_key(&config, "user").await.unwrap();

        assert_eq!(resolution.value, Some(json!({"id": 2})));
        assert_eq!(resolution.weight, 5);
    }

    #[tokio::test]
    async fn test_resolve_key_reports_tie() {
        let config = config(vec![
            provider("a", 2, Some(json!("x"))),
            provider("b", 2, Some(json!("y"))),
        ]);

        let err = resolve_key(&config, "user").await.unwrap_err();

        match err {
            CliError::Resolve(msg) => {
                assert!(msg.starts_with("Consensus tie: 2 answer groups"));
                assert!(msg.contains(r#"String("x")"#));
                assert!(msg.contains(r#"String("y")"#));
            }
            other => panic!("Expected Resolve variant, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_key_without_providers() {
        let err = resolve_key(&AppConfig::default(), "user").await.unwrap_err();
        assert!(matches!(err, CliError::Resolve(_)));
    }

    #[tokio::test]
    async fn test_render_json() {
        let config = config(vec![provider("a", 3, Some(json!(7))), provider("b", 1, None)]);
        let resolution = resolve_key(&config, "user").await.unwrap();

        let rendered = render_json("user", &resolution);

        assert_eq!(rendered["key"], json!("user"));
        assert_eq!(rendered["value"], json!(7));
        assert_eq!(rendered["weight"], json!(3));
        assert_eq!(rendered["total_weight"], json!(4));
        assert_eq!(rendered["supporters"], json!(["a"]));
        assert_eq!(rendered["dissenters"], json!(["b"]));
    }

    #[test]
    fn test_load_config_rejects_invalid_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[[providers]]\nname = \"a\"\nweight = 0\n").unwrap();

        let err = load_config(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
