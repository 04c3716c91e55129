//! Facility topology graph service.
//!
//! Models industrial plants as graphs: areas are nodes, adjacency between
//! areas is kept as explicit symmetric neighbor edges, and equipment placement
//! is validated against the topology (the areas hosting one piece of equipment
//! must form a connected group of neighbors). Parts and recurring maintenance
//! schedules hang off the equipment.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

pub mod api;
pub mod graph;
pub mod services;
pub mod store;

use api::ServerState;
use services::{
    AreaService, EquipmentService, MaintenanceService, NeighborService, PartService, PlantService,
};
use store::{FacilityStore, Neo4jFacilityStore};

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub neo4j: Neo4jYamlConfig,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub port: u16,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Neo4j configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "facility123".into(),
        }
    }
}

// ============================================================================
// Runtime config
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub server_port: u16,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env
    /// vars. Priority: env var > YAML > default.
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. A missing file
    /// falls back to pure env vars / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        Ok(Self {
            neo4j_uri: std::env::var("NEO4J_URI").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("NEO4J_USER").unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("NEO4J_PASSWORD").unwrap_or(yaml.neo4j.password),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.server.port),
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }
}

/// Build the shared server state on top of a store.
pub fn build_state(store: Arc<dyn FacilityStore>) -> api::FacilityState {
    Arc::new(ServerState {
        plant_service: PlantService::new(store.clone()),
        area_service: AreaService::new(store.clone()),
        neighbor_service: NeighborService::new(store.clone()),
        equipment_service: EquipmentService::new(store.clone()),
        part_service: PartService::new(store.clone()),
        maintenance_service: MaintenanceService::new(store),
    })
}

/// Connect to Neo4j and serve the HTTP API until the process is stopped.
pub async fn start_server(config: Config) -> Result<()> {
    let store = Neo4jFacilityStore::new(
        &config.neo4j_uri,
        &config.neo4j_user,
        &config.neo4j_password,
    )
    .await?;
    tracing::info!("Connected to Neo4j at {}", config.neo4j_uri);

    let state = build_state(Arc::new(store));
    let router = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("Server error")?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod config_tests {
    use super::*;
    use std::io::Write;

    fn clear_env() {
        std::env::remove_var("NEO4J_URI");
        std::env::remove_var("NEO4J_USER");
        std::env::remove_var("NEO4J_PASSWORD");
        std::env::remove_var("SERVER_PORT");
    }

    /// Combined test: env vars are process-global, so all scenarios that
    /// touch them run in one sequence.
    #[test]
    fn test_yaml_and_env_lifecycle() {
        clear_env();

        // --- Phase 1: full YAML values loaded correctly ---
        let yaml = r#"
server:
  port: 9090

neo4j:
  uri: bolt://db:7687
  user: admin
  password: secret
"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = Config::from_yaml_and_env(Some(file.path())).unwrap();
        assert_eq!(config.server_port, 9090);
        assert_eq!(config.neo4j_uri, "bolt://db:7687");
        assert_eq!(config.neo4j_user, "admin");
        assert_eq!(config.neo4j_password, "secret");

        // --- Phase 2: env vars override YAML ---
        std::env::set_var("NEO4J_URI", "bolt://env-host:7687");
        std::env::set_var("SERVER_PORT", "4000");
        let config = Config::from_yaml_and_env(Some(file.path())).unwrap();
        assert_eq!(config.neo4j_uri, "bolt://env-host:7687");
        assert_eq!(config.server_port, 4000);
        clear_env();

        // --- Phase 3: missing file falls back to defaults ---
        let config =
            Config::from_yaml_and_env(Some(Path::new("/nonexistent/config.yaml"))).unwrap();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.neo4j_uri, "bolt://localhost:7687");

        // --- Phase 4: partial YAML keeps section defaults ---
        let mut partial = tempfile::NamedTempFile::new().unwrap();
        partial.write_all(b"server:\n  port: 3000\n").unwrap();
        let config = Config::from_yaml_and_env(Some(partial.path())).unwrap();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.neo4j_user, "neo4j");

        // --- Phase 5: malformed YAML falls back to defaults ---
        let mut broken = tempfile::NamedTempFile::new().unwrap();
        broken.write_all(b"server: [not a mapping").unwrap();
        let config = Config::from_yaml_and_env(Some(broken.path())).unwrap();
        assert_eq!(config.server_port, 8080);
    }
}
