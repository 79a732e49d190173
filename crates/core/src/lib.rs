pub mod auth;
pub mod catalog;
pub mod config;
pub mod gateway;
pub mod launches;
pub mod metrics;
pub mod testing;

pub use auth::{
    create_authenticator, ApiKeyAuthenticator, AuthError, AuthRequest, Authenticator, Identity,
    NoneAuthenticator,
};
pub use catalog::{
    parse_filter_param, Catalog, CatalogError, Facet, FacetListing, FacetOption, FilterMap,
    GameEntry, GameQuery, GameRecord,
};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthConfig, AuthMethod, CatalogConfig,
    Config, ConfigError, DatabaseConfig, GameClientConfig, GameServerConfig, PlatformConfig,
    SanitizedConfig, ServerConfig,
};
pub use gateway::{
    ClientLaunchResult, GatewayError, LaunchGateway, LaunchOutcome, ServerStatus, SshGateway,
    MAX_VOLUME,
};
pub use launches::{LaunchCount, LaunchRecord, LaunchStore, LaunchStoreError, SqliteLaunchStore};
