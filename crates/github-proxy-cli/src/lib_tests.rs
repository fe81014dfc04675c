use super::*;

#[test]
fn serve_is_parsed() {
    let cli = Cli::try_parse_from(["github-proxy-cli", "serve"]);
    assert!(cli.is_ok());
    match cli.unwrap().command {
        Commands::Serve => {}
        _ => panic!("expected Serve command"),
    }
}

#[test]
fn validate_config_is_parsed() {
    let cli = Cli::try_parse_from(["github-proxy-cli", "validate-config"]);
    assert!(cli.is_ok());
    match cli.unwrap().command {
        Commands::ValidateConfig => {}
        _ => panic!("expected ValidateConfig command"),
    }
}

#[test]
fn unknown_command_is_rejected() {
    let cli = Cli::try_parse_from(["github-proxy-cli", "bogus"]);
    assert!(cli.is_err());
}

#[tokio::test]
async fn validate_config_reports_the_error_from_an_invalid_registry() {
    let dir = tempfile::tempdir().unwrap();
    let registry_path = dir.path().join("clients.yaml");
    std::fs::write(&registry_path, "not: valid: yaml: [").unwrap();

    std::env::set_var(
        "CLIENT_REGISTRY_FILE_PATH",
        registry_path.to_str().unwrap(),
    );
    let result = execute_validate_config_command().await;
    std::env::remove_var("CLIENT_REGISTRY_FILE_PATH");

    assert!(result.is_err());
}
