use serde::{Deserialize, Serialize};

use crate::entities::{external_provider, external_provider_id, movie};

/// Maximum movie name length in characters; matches the `movie.name` column.
pub const MAX_NAME_LENGTH: usize = 128;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must be at most {max} characters (got {actual})")]
    NameTooLong { max: usize, actual: usize },

    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request body, path or query string could not be parsed.
    #[error("{0}")]
    Malformed(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalProvider {
    pub id: i32,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl ExternalProvider {
    pub fn from_record(record: external_provider::Model) -> Self {
        Self { id: record.id, slug: record.slug, name: record.name, url: Some(record.url) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalProviderId {
    pub provider: ExternalProvider,
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub external_ids: Vec<ExternalProviderId>,
}

impl Movie {
    /// Projects a stored movie and its provider links into the wire shape.
    pub fn from_record(
        record: movie::Model,
        links: Vec<(external_provider_id::Model, external_provider::Model)>,
    ) -> Self {
        let external_ids = links
            .into_iter()
            .map(|(link, provider)| ExternalProviderId {
                provider: ExternalProvider::from_record(provider),
                id: link.external_id,
            })
            .collect();

        Self { id: Some(record.id), name: record.name, year: record.year, external_ids }
    }

    /// Checks the name length and rewrites every provider URL into its
    /// canonical form.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        validate_name(&self.name)?;
        for entry in &mut self.external_ids {
            if let Some(url) = entry.provider.url.take() {
                entry.provider.url = Some(normalize_url(&url)?);
            }
        }
        Ok(self)
    }
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let actual = name.chars().count();
    if actual > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong { max: MAX_NAME_LENGTH, actual });
    }
    Ok(())
}

pub fn normalize_url(raw: &str) -> Result<String, ValidationError> {
    url::Url::parse(raw.trim()).map(String::from).map_err(|e| ValidationError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub skip: u64,
    pub limit: Option<u64>,
}
