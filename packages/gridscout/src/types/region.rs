//! Administrative regions and their lookup.

use geo::MultiPolygon;

use crate::error::{PipelineError, Result};
use crate::normalize::normalize_key;

/// An administrative area: boundary polygons, a display name, a stable
/// code.
///
/// Geometry is geographic (longitude/latitude degrees). A region resolved
/// from several boundary features carries all of their polygons; for point
/// sampling, membership in the collection is equivalent to membership in
/// their union.
#[derive(Debug, Clone)]
pub struct Region {
    /// Raw label from the boundary file.
    pub name: String,
    /// Corrected label, once a name-correction table has been applied.
    pub cleaned_name: Option<String>,
    pub code: String,
    pub geometry: MultiPolygon<f64>,
}

impl Region {
    /// The name output artifacts are keyed by: the corrected label when
    /// present, the raw boundary label otherwise.
    pub fn display_name(&self) -> &str {
        self.cleaned_name.as_deref().unwrap_or(&self.name)
    }
}

/// How a caller picks a region out of a boundary file.
///
/// Both variants match through [`normalize_key`]; raw string equality is
/// never used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionSelector {
    /// Match the display name (cleaned label preferred, raw label too).
    Name(String),
    /// Match the region code.
    Code(String),
}

impl RegionSelector {
    fn query(&self) -> &str {
        match self {
            Self::Name(q) | Self::Code(q) => q,
        }
    }

    fn matches(&self, region: &Region) -> bool {
        match self {
            Self::Name(q) => {
                let key = normalize_key(q);
                key == normalize_key(region.display_name()) || key == normalize_key(&region.name)
            }
            Self::Code(q) => normalize_key(q) == normalize_key(&region.code),
        }
    }
}

/// All regions loaded from one boundary file.
#[derive(Debug, Clone, Default)]
pub struct RegionSet {
    regions: Vec<Region>,
}

impl RegionSet {
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Mutable access, for applying name corrections.
    pub fn regions_mut(&mut self) -> &mut [Region] {
        &mut self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Resolve a selector into a single region.
    ///
    /// Every matching feature contributes its polygons, so a department
    /// split across several features resolves to one region covering all
    /// of them. No match is [`PipelineError::NoMatch`].
    pub fn resolve(&self, selector: &RegionSelector) -> Result<Region> {
        let matches: Vec<&Region> = self
            .regions
            .iter()
            .filter(|region| selector.matches(region))
            .collect();

        let Some(first) = matches.first() else {
            return Err(PipelineError::NoMatch {
                query: selector.query().to_string(),
            });
        };

        let polygons = matches
            .iter()
            .flat_map(|region| region.geometry.0.iter().cloned())
            .collect();

        Ok(Region {
            name: first.name.clone(),
            cleaned_name: first.cleaned_name.clone(),
            code: first.code.clone(),
            geometry: MultiPolygon(polygons),
        })
    }
}
