pub mod config;
pub mod launches;
pub mod orbits;
pub mod query;
pub mod testing;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, SanitizedConfig, SpaceTrackConfig,
};
pub use launches::{
    LaunchError, LaunchQuery, LaunchService, LaunchStore, OrbitUpdate, SqliteLaunchStore,
    StoreError,
};
pub use orbits::{
    ElementSnapshot, OrbitError, OrbitReconciler, OrbitSource, SpaceTrackClient,
    SpaceTrackError, SyncReport,
};
pub use query::{translate, QueryParams, TranslatedQuery};
