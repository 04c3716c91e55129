//! Facility Graph - Main Server
//!
//! HTTP service for plant topology, equipment placement and maintenance
//! scheduling, backed by Neo4j.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use facility_graph::store::Neo4jFacilityStore;
use facility_graph::{build_state, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "facility-graph")]
#[command(about = "Facility topology graph server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides SERVER_PORT and config.yaml)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Load a small demo facility into the database
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,facility_graph=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server_port = port;
            }
            facility_graph::start_server(config).await
        }
        Commands::Seed => run_seed(config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_port_flag_is_optional() {
        let cli = Cli::try_parse_from(["facility-graph", "serve"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { port: None }));

        let cli = Cli::try_parse_from(["facility-graph", "serve", "--port", "9099"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { port: Some(9099) }));
    }
}

/// Create one plant with three areas in a path, one equipment spanning two of
/// them, a part, and a recurring maintenance.
async fn run_seed(config: Config) -> Result<()> {
    use facility_graph::services::models::*;
    use facility_graph::store::models::{FrequencyType, ReferenceType};

    let store = Neo4jFacilityStore::new(
        &config.neo4j_uri,
        &config.neo4j_user,
        &config.neo4j_password,
    )
    .await?;
    tracing::info!("Connected to Neo4j at {}", config.neo4j_uri);

    let state = build_state(Arc::new(store));

    let plant = state
        .plant_service
        .create(NewPlant {
            name: "Riverside Steelworks".into(),
            address: "1 Mill Road".into(),
        })
        .await?;
    tracing::info!("Created plant {}", plant.plant.id);

    let mut area_ids = Vec::new();
    for (name, location) in [
        ("Melt shop", "North hall"),
        ("Casting bay", "Center hall"),
        ("Rolling mill", "South hall"),
    ] {
        let area = state
            .area_service
            .create(NewArea {
                name: name.into(),
                location_description: location.into(),
                plant_id: plant.plant.id,
                neighbor_ids: area_ids.last().copied().into_iter().collect(),
            })
            .await?;
        area_ids.push(area.area.id);
    }
    tracing::info!("Created {} areas in a path", area_ids.len());

    let equipment = state
        .equipment_service
        .create(NewEquipment {
            name: "Continuous caster".into(),
            manufacturer: "Demag".into(),
            serial_number: "CC-2041".into(),
            initial_operations_date: chrono::NaiveDate::from_ymd_opt(2019, 5, 20).unwrap(),
            area_ids: vec![area_ids[0], area_ids[1]],
        })
        .await?;
    tracing::info!("Created equipment {}", equipment.equipment.id);

    let part = state
        .part_service
        .create(NewPart {
            name: "Mould oscillator bearing".into(),
            part_type: Default::default(),
            manufacturer: "SKF".into(),
            serial_number: "MOB-77".into(),
            installation_date: chrono::NaiveDate::from_ymd_opt(2023, 11, 2).unwrap(),
            equipment_id: equipment.equipment.id,
        })
        .await?;

    let maintenance = state
        .maintenance_service
        .create(NewMaintenance {
            title: "Regrease oscillator bearing".into(),
            description: Some("Lithium grease, 40g per nipple".into()),
            frequency_type: FrequencyType::Weeks,
            frequency_value: 6,
            reference_type: ReferenceType::PartInstallation,
            specific_date: None,
            part_id: part.part.id,
        })
        .await?;
    tracing::info!(
        "Created maintenance {} due {:?}",
        maintenance.maintenance.id,
        maintenance.maintenance.next_due_date
    );

    Ok(())
}
