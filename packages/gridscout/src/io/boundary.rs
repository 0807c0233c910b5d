//! Boundary file I/O: GeoJSON polygon features in, regions out.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use geo::MultiPolygon;
use geojson::{Feature, FeatureCollection, GeoJson};
use serde_json::{Map, Value};
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::normalize::apply_corrections;
use crate::types::config::BoundaryFields;
use crate::types::region::{Region, RegionSet};

/// Property name the corrected label is written back under.
pub const CLEANED_NAME_FIELD: &str = "cleaned_name";

/// Load polygon features into a [`RegionSet`].
///
/// Every feature needs the configured name and code properties and polygon
/// geometry; a feature carrying another geometry type is rejected rather
/// than silently dropped. A collection with no features is `EmptyBoundary`.
pub fn load_regions(path: impl AsRef<Path>, fields: &BoundaryFields) -> Result<RegionSet> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let geojson: GeoJson = text.parse()?;
    let collection = FeatureCollection::try_from(geojson)?;

    let mut regions = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let properties = feature.properties.unwrap_or_default();
        let name = string_property(&properties, &fields.name, path)?;
        let code = string_property(&properties, &fields.code, path)?;
        let cleaned_name = properties
            .get(CLEANED_NAME_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string);

        let geometry = feature.geometry.ok_or(PipelineError::EmptyBoundary)?;
        regions.push(Region {
            name,
            cleaned_name,
            code,
            geometry: multipolygon_from(geometry)?,
        });
    }

    if regions.is_empty() {
        return Err(PipelineError::EmptyBoundary);
    }

    info!("loaded {} boundary features from {}", regions.len(), path.display());
    Ok(RegionSet::new(regions))
}

/// Write regions out as a GeoJSON FeatureCollection, including the
/// `cleaned_name` property.
pub fn save_regions(
    path: impl AsRef<Path>,
    set: &RegionSet,
    fields: &BoundaryFields,
) -> Result<()> {
    let features: Vec<Feature> = set
        .regions()
        .iter()
        .map(|region| {
            let mut properties = Map::new();
            properties.insert(fields.name.clone(), Value::String(region.name.clone()));
            properties.insert(fields.code.clone(), Value::String(region.code.clone()));
            properties.insert(
                CLEANED_NAME_FIELD.to_string(),
                Value::String(region.display_name().to_string()),
            );
            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(
                    &region.geometry,
                ))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    fs::write(path.as_ref(), GeoJson::from(collection).to_string())?;
    info!("wrote {} boundary features to {}", set.len(), path.as_ref().display());
    Ok(())
}

/// Load a boundary file, apply a name-correction table, and write the
/// corrected collection to `output`.
pub fn clean_boundary_names(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    corrections: &HashMap<String, String>,
    fields: &BoundaryFields,
) -> Result<RegionSet> {
    let mut set = load_regions(input, fields)?;
    apply_corrections(set.regions_mut(), corrections);
    save_regions(output, &set, fields)?;
    Ok(set)
}

fn string_property(properties: &Map<String, Value>, key: &str, path: &Path) -> Result<String> {
    match properties.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        // Codes sometimes arrive numeric; stringify rather than reject.
        Some(other) => Ok(other.to_string()),
        None => Err(PipelineError::MissingColumns {
            path: path.to_path_buf(),
            columns: vec![key.to_string()],
        }),
    }
}

fn multipolygon_from(geometry: geojson::Geometry) -> Result<MultiPolygon<f64>> {
    match geometry.value {
        value @ geojson::Value::Polygon(_) => {
            let polygon = geo::Polygon::<f64>::try_from(value)?;
            Ok(MultiPolygon(vec![polygon]))
        }
        value @ geojson::Value::MultiPolygon(_) => Ok(MultiPolygon::<f64>::try_from(value)?),
        other => Err(PipelineError::UnsupportedGeometry {
            kind: kind_name(&other),
        }),
    }
}

fn kind_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}
