use enigma_models::Location;
use graph_rag::GraphStore;
use serde::Deserialize;
use std::path::Path;

use crate::errors::IngestResult;

#[derive(Debug, Deserialize)]
struct LocationRow {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    lon: Option<f64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tags: Option<String>,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Location {
            id: row.id,
            name: row.name,
            lat: row.lat.unwrap_or(0.0),
            lon: row.lon.unwrap_or(0.0),
            description: row.description.unwrap_or_default(),
            tags: row.tags.unwrap_or_default(),
        }
    }
}

/// Read an `id,name,lat,lon[,description][,tags]` file. Blank or
/// non-numeric coordinates load as `0.0`.
pub fn read_locations(path: &Path) -> IngestResult<Vec<Location>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut locations = Vec::new();

    for row in reader.deserialize::<LocationRow>() {
        locations.push(Location::from(row?));
    }

    tracing::info!(path = %path.display(), locations = locations.len(), "Read locations file");
    Ok(locations)
}

/// Create the id uniqueness constraint, then MERGE every row by id.
/// Returns the number of rows written.
pub async fn load_locations(csv_path: &Path, store: &dyn GraphStore) -> IngestResult<usize> {
    let locations = read_locations(csv_path)?;

    store.ensure_location_constraint().await?;
    for location in &locations {
        store.merge_location(location).await?;
    }

    tracing::info!(loaded = locations.len(), "Loaded locations into graph");
    Ok(locations.len())
}
