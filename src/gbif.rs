//! Client for the GBIF species and occurrence APIs.
//!
//! URL building and response parsing are pure functions; the `fetch_*`
//! functions run requests through `ehttp` and report back through a
//! callback, on a background thread natively and on the event loop in the
//! browser.

use crate::conservation::IucnCategory;
use crate::geo::GeoCoordinate;
use crate::range_map::OccurrenceFeature;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use thiserror::Error;

const SPECIES_API_BASE: &str = "https://api.gbif.org/v1/species";
const OCCURRENCE_SEARCH_URL: &str = "https://api.gbif.org/v1/occurrence/search";

/// Number of occurrences requested per species.
pub const DEFAULT_OCCURRENCE_LIMIT: u32 = 300;

/// Matches below or at this confidence are rejected.
const MIN_MATCH_CONFIDENCE: u32 = 90;
const ACCEPTED_STATUS: &str = "ACCEPTED";
const UNKNOWN: &str = "Unknown";

/// Characters left as-is by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// GBIF backbone usage key.
pub type TaxonKey = u64;

/// Errors from GBIF requests.
#[derive(Debug, Error)]
pub enum GbifError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {status} {status_text}")]
    Status { status: u16, status_text: String },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub fn match_url(binomial: &str) -> String {
    format!(
        "{}/match?name={}",
        SPECIES_API_BASE,
        utf8_percent_encode(binomial, URI_COMPONENT)
    )
}

pub fn iucn_url(taxon_key: TaxonKey) -> String {
    format!("{}/{}/iucnRedListCategory", SPECIES_API_BASE, taxon_key)
}

pub fn occurrences_url(taxon_key: TaxonKey, limit: u32) -> String {
    format!(
        "{}?taxonKey={}&hasCoordinate=true&limit={}",
        OCCURRENCE_SEARCH_URL, taxon_key, limit
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaxonMatch {
    #[serde(default)]
    usage_key: Option<TaxonKey>,
    #[serde(default)]
    confidence: Option<u32>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RedListCategory {
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OccurrencePage {
    #[serde(default)]
    results: Vec<OccurrenceRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OccurrenceRecord {
    decimal_latitude: Option<f64>,
    decimal_longitude: Option<f64>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    basis_of_record: Option<String>,
}

/// Extracts the taxon key from a name match response.
///
/// Returns `None` unless the match is confident, accepted, and carries a
/// key.
pub fn parse_taxon_match(body: &[u8]) -> Result<Option<TaxonKey>, GbifError> {
    let matched: TaxonMatch = serde_json::from_slice(body)?;
    let confident = matched.confidence.unwrap_or(0) > MIN_MATCH_CONFIDENCE;
    let accepted = matched.status.as_deref() == Some(ACCEPTED_STATUS);
    Ok(matched.usage_key.filter(|_| confident && accepted))
}

/// Extracts the Red List code, if any.
pub fn parse_iucn_code(body: &[u8]) -> Result<Option<String>, GbifError> {
    let category: RedListCategory = serde_json::from_slice(body)?;
    Ok(category.code.filter(|c| !c.is_empty()))
}

/// Converts an occurrence search page into occurrences, dropping records
/// without both coordinates.
pub fn parse_occurrences(body: &[u8]) -> Result<Vec<OccurrenceFeature>, GbifError> {
    let page: OccurrencePage = serde_json::from_slice(body)?;
    Ok(page
        .results
        .into_iter()
        .filter_map(|record| {
            let lat = record.decimal_latitude?;
            let lon = record.decimal_longitude?;
            Some(OccurrenceFeature {
                coordinate: GeoCoordinate::new(lon, lat),
                country: Some(non_empty_or_unknown(record.country)),
                year: record.year,
                basis_of_record: Some(non_empty_or_unknown(record.basis_of_record)),
            })
        })
        .collect())
}

fn non_empty_or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Everything the gallery shows about one species.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpeciesProfile {
    pub binomial: String,
    pub taxon_key: Option<TaxonKey>,
    pub iucn: Option<IucnCategory>,
    pub occurrences: Vec<OccurrenceFeature>,
}

impl SpeciesProfile {
    pub fn new(binomial: impl Into<String>) -> Self {
        Self {
            binomial: binomial.into(),
            ..Default::default()
        }
    }

    /// Mean position of the occurrences, averaged on the unit sphere so that
    /// points on both sides of the antimeridian do not cancel out.
    pub fn mean_position(&self) -> Option<GeoCoordinate> {
        let sum = self
            .occurrences
            .iter()
            .map(|o| o.coordinate)
            .filter(GeoCoordinate::is_finite)
            .map(|c| {
                let (lambda, phi) = c.to_radians();
                glam::DVec3::new(phi.cos() * lambda.cos(), phi.cos() * lambda.sin(), phi.sin())
            })
            .fold(glam::DVec3::ZERO, |acc, v| acc + v);

        if sum.length_squared() < 1e-12 {
            return None;
        }
        let lon = sum.y.atan2(sum.x).to_degrees();
        let lat = sum.z.atan2(sum.x.hypot(sum.y)).to_degrees();
        Some(GeoCoordinate::new(lon, lat))
    }
}

/// GETs `url` and hands the body of a successful response to `on_done`.
fn fetch_body(url: String, on_done: impl FnOnce(Result<Vec<u8>, GbifError>) + Send + 'static) {
    log::debug!("GET {}", url);
    ehttp::fetch(ehttp::Request::get(&url), move |result| {
        let body = match result {
            Ok(response) if response.ok => Ok(response.bytes),
            Ok(response) => Err(GbifError::Status {
                status: response.status,
                status_text: response.status_text,
            }),
            Err(err) => Err(GbifError::Transport(err)),
        };
        on_done(body);
    });
}

/// Looks up the taxon key for a binomial name.
pub fn fetch_taxon_key(
    binomial: &str,
    on_done: impl FnOnce(Result<Option<TaxonKey>, GbifError>) + Send + 'static,
) {
    fetch_body(match_url(binomial), move |body| {
        on_done(body.and_then(|b| parse_taxon_match(&b)))
    });
}

/// Looks up the Red List category of a taxon.
pub fn fetch_iucn_status(
    taxon_key: TaxonKey,
    on_done: impl FnOnce(Result<Option<IucnCategory>, GbifError>) + Send + 'static,
) {
    fetch_body(iucn_url(taxon_key), move |body| {
        on_done(
            body.and_then(|b| parse_iucn_code(&b))
                .map(|code| code.and_then(|c| IucnCategory::from_code(&c))),
        )
    });
}

/// Fetches up to `limit` georeferenced occurrences of a taxon.
pub fn fetch_occurrences(
    taxon_key: TaxonKey,
    limit: u32,
    on_done: impl FnOnce(Result<Vec<OccurrenceFeature>, GbifError>) + Send + 'static,
) {
    fetch_body(occurrences_url(taxon_key, limit), move |body| {
        on_done(body.and_then(|b| parse_occurrences(&b)))
    });
}

/// Resolves a full profile: taxon key first, then status and occurrences.
///
/// Failed lookups are logged and leave the matching field empty, so
/// `on_done` is always called exactly once.
pub fn fetch_species_profile(
    binomial: &str,
    on_done: impl FnOnce(SpeciesProfile) + Send + 'static,
) {
    let profile = SpeciesProfile::new(binomial);
    fetch_taxon_key(binomial, move |result| {
        let taxon_key = match result {
            Ok(Some(key)) => {
                log::info!("Found GBIF key {} for {:?}", key, profile.binomial);
                key
            }
            Ok(None) => {
                log::warn!("No confident GBIF match found for {:?}", profile.binomial);
                on_done(profile);
                return;
            }
            Err(e) => {
                log::error!("GBIF taxon lookup failed for {:?}: {}", profile.binomial, e);
                on_done(profile);
                return;
            }
        };

        let mut profile = SpeciesProfile {
            taxon_key: Some(taxon_key),
            ..profile
        };
        fetch_iucn_status(taxon_key, move |result| {
            match result {
                Ok(iucn) => profile.iucn = iucn,
                Err(e) => log::error!("Failed to fetch IUCN status for key {}: {}", taxon_key, e),
            }

            fetch_occurrences(taxon_key, DEFAULT_OCCURRENCE_LIMIT, move |result| {
                match result {
                    Ok(occurrences) => {
                        log::info!(
                            "Fetched {} occurrences for taxon key {}",
                            occurrences.len(),
                            taxon_key
                        );
                        profile.occurrences = occurrences;
                    }
                    Err(e) => {
                        log::error!("Failed to fetch occurrences for key {}: {}", taxon_key, e)
                    }
                }
                on_done(profile);
            });
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            match_url("Canis lupus familiaris"),
            "https://api.gbif.org/v1/species/match?name=Canis%20lupus%20familiaris"
        );
        assert_eq!(
            match_url("x&y=(z)'"),
            "https://api.gbif.org/v1/species/match?name=x%26y%3D(z)'"
        );
        assert_eq!(
            iucn_url(5219173),
            "https://api.gbif.org/v1/species/5219173/iucnRedListCategory"
        );
        assert_eq!(
            occurrences_url(2492462, 300),
            "https://api.gbif.org/v1/occurrence/search?taxonKey=2492462&hasCoordinate=true&limit=300"
        );
    }

    #[test]
    fn test_taxon_match_requires_confidence_and_status() {
        let accepted = br#"{"usageKey": 2492462, "confidence": 99, "status": "ACCEPTED"}"#;
        assert_eq!(parse_taxon_match(accepted).unwrap(), Some(2492462));

        let borderline = br#"{"usageKey": 2492462, "confidence": 90, "status": "ACCEPTED"}"#;
        assert_eq!(parse_taxon_match(borderline).unwrap(), None);

        let synonym = br#"{"usageKey": 1, "confidence": 98, "status": "SYNONYM"}"#;
        assert_eq!(parse_taxon_match(synonym).unwrap(), None);

        let no_key = br#"{"confidence": 100, "status": "ACCEPTED", "matchType": "NONE"}"#;
        assert_eq!(parse_taxon_match(no_key).unwrap(), None);

        assert!(matches!(
            parse_taxon_match(b"<html>"),
            Err(GbifError::Decode(_))
        ));
    }

    #[test]
    fn test_iucn_code() {
        assert_eq!(
            parse_iucn_code(br#"{"category": "LEAST_CONCERN", "code": "LC"}"#).unwrap(),
            Some("LC".to_string())
        );
        assert_eq!(parse_iucn_code(br#"{}"#).unwrap(), None);
        assert_eq!(parse_iucn_code(br#"{"code": ""}"#).unwrap(), None);
    }

    #[test]
    fn test_occurrences_drop_records_without_coordinates() {
        let body = br#"{
            "offset": 0,
            "results": [
                {"decimalLatitude": 48.85, "decimalLongitude": 2.35, "country": "France", "year": 2019, "basisOfRecord": "HUMAN_OBSERVATION"},
                {"decimalLatitude": 10.0},
                {"decimalLatitude": 0.0, "decimalLongitude": 0.0},
                {"decimalLongitude": 5.0, "country": "Nowhere"}
            ]
        }"#;
        let occurrences = parse_occurrences(body).unwrap();
        assert_eq!(occurrences.len(), 2);

        let paris = &occurrences[0];
        assert_close(paris.coordinate.lat(), 48.85);
        assert_close(paris.coordinate.lon(), 2.35);
        assert_eq!(paris.tooltip(), "France, 2019");
        assert_eq!(paris.basis_of_record.as_deref(), Some("HUMAN_OBSERVATION"));

        let null_island = &occurrences[1];
        assert_eq!(null_island.country.as_deref(), Some("Unknown"));
        assert_eq!(null_island.basis_of_record.as_deref(), Some("Unknown"));
        assert_eq!(null_island.year, None);
    }

    #[test]
    fn test_empty_page() {
        assert!(parse_occurrences(br#"{"results": []}"#).unwrap().is_empty());
        assert!(parse_occurrences(br#"{}"#).unwrap().is_empty());
    }

    #[test]
    fn test_mean_position_across_antimeridian() {
        let mut profile = SpeciesProfile::new("Test");
        assert_eq!(profile.mean_position(), None);

        profile.occurrences = vec![
            OccurrenceFeature::new(GeoCoordinate::new(170.0, 10.0)),
            OccurrenceFeature::new(GeoCoordinate::new(-170.0, 10.0)),
        ];
        let mean = profile.mean_position().unwrap();
        assert_close(mean.lon().abs(), 180.0);
        assert!(mean.lat() > 10.0 - 1e-9);
    }
}
