//! Fixture loading and the file-backed principal source.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lightstack_runtime::{FetchError, PrincipalSource};
use lightstack_types::{MenuRecord, PrincipalProfile};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// A principal document: bare, or wrapped the way the session endpoint
/// answers (`{"code": 200, "data": {...}}`).
#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileDocument {
    Envelope { data: PrincipalProfile },
    Bare(PrincipalProfile),
}

impl ProfileDocument {
    fn into_profile(self) -> PrincipalProfile {
        match self {
            Self::Envelope { data } | Self::Bare(data) => data,
        }
    }
}

/// A menu document: a record array, or a principal document.
#[derive(Deserialize)]
#[serde(untagged)]
enum MenuDocument {
    Records(Vec<MenuRecord>),
    Profile(ProfileDocument),
}

pub fn load_profile(path: &Path) -> Result<PrincipalProfile> {
    let raw = read(path)?;
    let doc: ProfileDocument = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse principal from {}", path.display()))?;
    Ok(doc.into_profile())
}

pub fn load_menus(path: &Path) -> Result<Vec<MenuRecord>> {
    let raw = read(path)?;
    let doc: MenuDocument = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse menus from {}", path.display()))?;
    Ok(match doc {
        MenuDocument::Records(records) => records,
        MenuDocument::Profile(profile) => profile.into_profile().menus,
    })
}

/// Reads a view list: one identifier per line, `#` starts a comment.
pub fn load_views(path: &Path) -> Result<Vec<String>> {
    let raw = read(path)?;
    Ok(raw
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Answers every fetch with the fixture profile, or rejects the token.
pub struct FilePrincipalSource {
    profile: PrincipalProfile,
    reject: bool,
}

impl FilePrincipalSource {
    pub fn new(profile: PrincipalProfile, reject: bool) -> Self {
        Self { profile, reject }
    }
}

#[async_trait]
impl PrincipalSource for FilePrincipalSource {
    async fn fetch_principal(&self, _token: &str) -> Result<PrincipalProfile, FetchError> {
        debug!(principal = %self.profile, reject = self.reject, "Serving fixture principal");
        if self.reject {
            return Err(FetchError::Unauthorized);
        }
        Ok(self.profile.clone())
    }
}
