use super::{
    types::{AuthMethod, Config},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - API key auth has a non-empty key
/// - Game server host/path are set and the timeout is positive
/// - Every game client has a host, path and executable
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.auth.method == AuthMethod::ApiKey
        && config.auth.api_key.as_deref().is_none_or(str::is_empty)
    {
        return Err(ConfigError::ValidationError(
            "auth.api_key must be set when method is api_key".to_string(),
        ));
    }

    if let Some(server) = &config.game_server {
        if server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "game_server.host cannot be empty".to_string(),
            ));
        }
        if server.path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "game_server.path cannot be empty".to_string(),
            ));
        }
        if server.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "game_server.timeout_secs cannot be 0".to_string(),
            ));
        }
    }

    for (i, client) in config.game_clients.iter().enumerate() {
        if client.host.trim().is_empty()
            || client.path.trim().is_empty()
            || client.exe.trim().is_empty()
        {
            return Err(ConfigError::ValidationError(format!(
                "game_clients[{}] needs host, path and exe",
                i
            )));
        }
    }

    Ok(())
}
