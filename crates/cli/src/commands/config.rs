use clap::Subcommand;
use std::path::Path;
use tally_core::config::AppConfig;

use super::utils::{print_error, print_info, print_success, CliError, CliResult};

const SAMPLE_CONFIG: &str = r#"# Tally Configuration
# Every provider votes on each resolution with its weight.

[resolver]
# Deadline for the whole fan-out in milliseconds. Omit to wait indefinitely.
# query_timeout_ms = 2000
# Field paths ignored when comparing JSON answers (dot notation, `*` wildcards)
ignore_fields = ["meta.fetchedAt"]

[logging]
level = "info"
format = "pretty"

[[providers]]
name = "primary"
weight = 3
answers = { user = { id = 7, name = "ada", meta = { fetchedAt = 1700000000 } } }

[[providers]]
name = "mirror"
weight = 1
answers = { user = { id = 7, name = "ada", meta = { fetchedAt = 1700000042 } } }

[[providers]]
name = "stale"
weight = 1
answers = { user = { id = 7, name = "ada lovelace", meta = { fetchedAt = 1600000000 } } }
"#;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate the current configuration
    Validate {
        /// Path to config file (defaults to config/config.toml)
        #[arg(short, long, default_value = "config/config.toml")]
        file: String,
    },

    /// Show current configuration
    Show {
        /// Path to config file (defaults to config/config.toml)
        #[arg(short, long, default_value = "config/config.toml")]
        file: String,
    },

    /// Generate a sample configuration file
    Generate {
        /// Output path for the config file
        #[arg(short, long, default_value = "config/config.toml")]
        output: String,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn handle_config_command(command: ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Validate { file } => validate_config(&file),
        ConfigCommands::Show { file } => show_config(&file),
        ConfigCommands::Generate { output, force } => generate_config(&output, force),
    }
}

fn validate_config(file: &str) -> CliResult<()> {
    if !Path::new(file).exists() {
        print_error(&format!("Configuration file not found: {file}"));
        return Err(CliError::Config(format!("File not found: {file}")));
    }

    print_info(&format!("Loading configuration from {file}..."));

    let config = AppConfig::from_file(file).map_err(|e| CliError::Config(e.to_string()))?;

    print_info("Validating configuration...");
    config.validate().map_err(CliError::Config)?;

    print_success("Configuration is valid!");

    let total_weight: u64 = config.providers.iter().map(|p| u64::from(p.weight)).sum();
    println!("Configuration Summary:");
    println!("  Providers: {} (total weight {total_weight})", config.providers.len());
    println!(
        "  Query timeout: {}",
        config.resolver.query_timeout_ms.map_or_else(|| "none".to_string(), |ms| format!("{ms}ms"))
    );
    println!("  Ignored fields: {}", config.resolver.ignore_fields.len());

    Ok(())
}

fn show_config(file: &str) -> CliResult<()> {
    let config = AppConfig::from_file(file).map_err(|e| CliError::Config(e.to_string()))?;

    println!("Configuration from {file}:");

    println!("\n[Resolver]");
    match config.resolver.query_timeout_ms {
        Some(ms) => println!("  Query Timeout: {ms}ms"),
        None => println!("  Query Timeout: none"),
    }
    println!("  Ignore Fields: {:?}", config.resolver.ignore_fields);

    println!("\n[Providers] ({} providers)", config.providers.len());
    for provider in &config.providers {
        let mut keys: Vec<&str> = provider.answers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        println!("  {} (weight {}): {} keys", provider.name, provider.weight, keys.len());
        if !keys.is_empty() {
            println!("    Keys: {}", keys.join(", "));
        }
        if let Some(message) = &provider.fail_with {
            println!("    Fails with: {message}");
        }
    }

    println!("\n[Logging]");
    println!("  Level: {}", config.logging.level);
    println!("  Format: {}", config.logging.format);

    Ok(())
}

fn generate_config(output: &str, force: bool) -> CliResult<()> {
    if Path::new(output).exists() && !force {
        return Err(CliError::Config(format!(
            "File {output} already exists. Use --force to overwrite."
        )));
    }

    if let Some(parent) = Path::new(output).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, SAMPLE_CONFIG)?;

    print_success(&format!("Sample configuration generated: {output}"));
    print_info("Remember to:");
    print_info("  1. Replace the sample providers with your own answer tables");
    print_info("  2. Adjust weights so that exact ties cannot occur");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generated_config_is_valid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let output = path.to_str().unwrap();

        generate_config(output, false).unwrap();
        validate_config(output).unwrap();

        let config = AppConfig::from_file(output).unwrap();
        assert_eq!(config.providers.len(), 3);
        assert_eq!(config.resolver.ignore_fields, vec!["meta.fetchedAt".to_string()]);
    }

    #[test]
    fn test_generate_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let err = generate_config(path.to_str().unwrap(), false).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert!(generate_config(path.to_str().unwrap(), true).is_ok());
    }

    #[test]
    fn test_validate_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");

        assert!(validate_config(path.to_str().unwrap()).is_err());
    }
}
