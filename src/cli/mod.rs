use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;

use crate::clients::foundry::FoundryRemote;
use crate::infra::config::{AppConfig, Config};
use crate::tools::characters::CharacterTools;

#[derive(Parser)]
#[command(name = "vtt-character-gateway")]
#[command(about = "VTT Character Gateway - MCP server and admin CLI")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the gateway (default when no subcommand is given)
    Serve,
    /// Health check the service
    Health {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Validate configuration
    Config {
        /// Validate config without starting service
        #[arg(long)]
        validate: bool,
    },
    /// Show service status and configuration
    Status {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Look up a character on the VTT host and print its summary
    Character {
        /// Character name or actor id
        #[arg(short, long)]
        name: String,
        /// VTT host base URL (overrides FOUNDRY_BASE_URL)
        #[arg(short, long)]
        url: Option<String>,
    },
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    run_commands(cli.command.unwrap_or(Commands::Serve)).await
}

pub async fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Serve => match crate::infra::boot::run_server().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "server exited with error");
                ExitCode::FAILURE
            }
        },
        Commands::Health { url } => match health_check(&url).await {
            Ok(_) => {
                println!("✅ Service is healthy");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Config { validate: _ } => match validate_config() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Status { url } => match show_status(&url).await {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Status check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Character { name, url } => match show_character(url, &name).await {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Character lookup failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn health_check(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/healthz", url))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(format!("HTTP {}", response.status()).into())
    }
}

fn validate_config() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    if !matches!(config.mode.as_str(), "server" | "stdio") {
        return Err(format!("Invalid MODE: {}. Must be 'server' or 'stdio'", config.mode).into());
    }
    if config.mode == "server" && config.port == 0 {
        return Err("PORT cannot be 0".into());
    }

    AppConfig::from_env_and_toml().validate()?;
    Ok(())
}

async fn show_status(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();

    let health_response = client
        .get(format!("{}/healthz", url))
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await?;

    println!(
        "🏥 Health Status: {}",
        if health_response.status().is_success() {
            "✅ Healthy"
        } else {
            "❌ Unhealthy"
        }
    );

    let tools_response = client
        .post(format!("{}/mcp", url))
        .header("content-type", "application/json")
        .json(&serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/list",
            "params": {}
        }))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await;

    match tools_response {
        Ok(resp) if resp.status().is_success() => {
            println!("🔧 Tools: ✅ Available");
        }
        Ok(resp) => {
            println!("🔧 Tools: ❌ HTTP {}", resp.status());
        }
        Err(_) => {
            println!("🔧 Tools: ❌ Unavailable");
        }
    }

    let config = Config::from_env();
    let app = AppConfig::from_env_and_toml();
    println!("\n📋 Configuration:");
    println!("  Mode: {}", config.mode);
    println!("  Port: {}", config.port);
    println!("  REST shim: {}", if config.deprecate_rest { "disabled" } else { "enabled" });
    println!(
        "  Log Level: {}",
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    );
    match app.foundry.base_url.as_deref() {
        Some(base) => println!("  VTT Host: {}", base),
        None => println!("  VTT Host: Not configured"),
    }
    println!("  Retries: {}", app.foundry.retries.unwrap_or(0));

    Ok(())
}

async fn show_character(url: Option<String>, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut foundry = AppConfig::from_env_and_toml().foundry;
    if let Some(url) = url {
        foundry.base_url = Some(url);
    }
    let remote = FoundryRemote::from_config(&foundry);
    if !remote.is_configured() {
        return Err("No VTT host URL provided".into());
    }

    let tools = CharacterTools::new(Arc::new(remote));
    let summary = tools.lookup_character(name).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env() {
        for k in [
            "MODE",
            "PORT",
            "FOUNDRY_BASE_URL",
            "FOUNDRY_TIMEOUT_MS",
            "FOUNDRY_RETRIES",
            "GATEWAY_CONFIG",
        ] {
            env::remove_var(k);
        }
    }

    #[tokio::test]
    async fn health_check_fails_without_service() {
        let result = health_check("http://localhost:9999").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn health_check_ok_and_error_paths() {
        use httpmock::prelude::*;
        let server = MockServer::start();
        server.mock(|when, then| { when.method(GET).path("/healthz"); then.status(200); });
        assert!(super::health_check(&server.base_url()).await.is_ok());

        let bad = MockServer::start();
        bad.mock(|when, then| { when.method(GET).path("/healthz"); then.status(500); });
        assert!(super::health_check(&bad.base_url()).await.is_err());
    }

    #[test]
    #[serial]
    fn validate_config_accepts_defaults() {
        clear_env();
        assert!(validate_config().is_ok());
    }

    #[test]
    #[serial]
    fn validate_config_rejects_invalid_mode() {
        clear_env();
        env::set_var("MODE", "invalid");
        let result = validate_config();
        assert!(result.unwrap_err().to_string().contains("Invalid MODE"));
        clear_env();
    }

    #[test]
    #[serial]
    fn validate_config_accepts_stdio_mode() {
        clear_env();
        env::set_var("MODE", "stdio");
        assert!(validate_config().is_ok());
        clear_env();
    }

    #[test]
    #[serial]
    fn validate_config_rejects_zero_port() {
        clear_env();
        env::set_var("MODE", "server");
        env::set_var("PORT", "0");
        let result = validate_config();
        assert!(result.unwrap_err().to_string().contains("PORT cannot be 0"));
        clear_env();
    }

    #[test]
    #[serial]
    fn validate_config_non_numeric_port_defaults() {
        clear_env();
        env::set_var("PORT", "abc");
        assert!(validate_config().is_ok());
        clear_env();
    }

    #[test]
    #[serial]
    fn validate_config_rejects_bad_foundry_url() {
        clear_env();
        env::set_var("FOUNDRY_BASE_URL", "localhost:30000");
        let result = validate_config();
        assert!(result.unwrap_err().to_string().contains("FOUNDRY_BASE_URL"));
        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn status_handles_non_200_health_and_tools() {
        use httpmock::prelude::*;
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/healthz");
            then.status(500).body("boom");
        });
        server.mock(|when, then| {
            when.method(POST).path("/mcp");
            then.status(500).body("boom");
        });

        assert!(show_status(&server.base_url()).await.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn show_status_ok_path() {
        use httpmock::prelude::*;
        let server = MockServer::start();
        server.mock(|when, then| { when.method(GET).path("/healthz"); then.status(200).body("ok"); });
        server.mock(|when, then| { when.method(POST).path("/mcp"); then.status(200).body("ok"); });
        assert!(super::show_status(&server.base_url()).await.is_ok());
    }

    #[tokio::test]
    async fn status_handles_unavailable_service() {
        let res = show_status("http://localhost:9999").await;
        assert!(res.is_err());
    }

    #[tokio::test]
    #[serial]
    async fn character_without_url_fails() {
        clear_env();
        let err = show_character(None, "Grom").await.unwrap_err();
        assert!(err.to_string().contains("No VTT host URL"));
    }

    #[tokio::test]
    #[serial]
    async fn character_prints_summary_from_host() {
        use httpmock::prelude::*;
        clear_env();
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST)
                .path("/api/query")
                .json_body(serde_json::json!({"method": "getCharacterInfo", "data": {"characterName": "Grom"}}));
            then.status(200)
                .json_body(serde_json::json!({"id": "a1", "name": "Grom", "type": "character"}));
        });
        assert!(show_character(Some(server.base_url()), "Grom").await.is_ok());
        m.assert();
    }

    #[tokio::test]
    #[serial]
    async fn character_surfaces_missing_record() {
        use httpmock::prelude::*;
        clear_env();
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/query");
            then.status(200).body("null");
        });
        let err = show_character(Some(server.base_url()), "Nobody").await.unwrap_err();
        assert!(err.to_string().contains("Nobody"));
    }

    #[tokio::test]
    #[serial]
    async fn run_commands_config_success() {
        clear_env();
        let code = run_commands(Commands::Config { validate: true }).await;
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[tokio::test]
    #[serial]
    async fn run_commands_config_failure() {
        clear_env();
        env::set_var("MODE", "nope");
        let code = run_commands(Commands::Config { validate: true }).await;
        assert_eq!(code, ExitCode::FAILURE);
        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn run_commands_health_and_status_fail_on_dead_url() {
        let health = run_commands(Commands::Health { url: "http://localhost:9".into() }).await;
        assert_eq!(health, ExitCode::FAILURE);

        let status = run_commands(Commands::Status { url: "http://localhost:9".into() }).await;
        assert_eq!(status, ExitCode::FAILURE);
    }

    #[tokio::test]
    #[serial]
    async fn run_commands_character_without_url_fails() {
        clear_env();
        let code = run_commands(Commands::Character { name: "Grom".into(), url: None }).await;
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[tokio::test]
    async fn run_commands_health_success() {
        use httpmock::prelude::*;
        let server = MockServer::start();
        server.mock(|when, then| { when.method(GET).path("/healthz"); then.status(200).body("ok"); });
        let code = run_commands(Commands::Health { url: server.base_url() }).await;
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn cli_defaults_to_no_subcommand() {
        let cli = Cli::parse_from(["vtt-character-gateway"]);
        assert!(cli.command.is_none());
        let cli = Cli::parse_from(["vtt-character-gateway", "character", "--name", "Grom"]);
        assert!(matches!(cli.command, Some(Commands::Character { ref name, url: None }) if name == "Grom"));
    }
}
