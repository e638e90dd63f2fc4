//! Shared play fixtures for tests and benches, listed in `fixtures/manifest.json`.
//!
//! Two families: `plays` are editor saves fed through `parse_play_json`, `documents`
//! are canonical `PlayDocument`s in the core's serde shape.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const MANIFEST_NAME: &str = "fixtures/manifest.json";

static CATALOG: Lazy<Catalog> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures/manifest.json should parse")
});

#[derive(Debug, Deserialize)]
struct Catalog {
    plays: HashMap<String, SavedPlay>,
    documents: HashMap<String, String>,
}

/// A saved play is either a bare relative path or `{ "path": ..., "note": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SavedPlay {
    File(String),
    Annotated {
        path: String,
        #[allow(dead_code)]
        #[serde(default)]
        note: Option<String>,
    },
}

impl SavedPlay {
    fn file(&self) -> &str {
        match self {
            SavedPlay::File(path) | SavedPlay::Annotated { path, .. } => path,
        }
    }
}

fn fixture_file(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../../fixtures")
        .join(rel)
}

fn read_fixture(rel: &str) -> Result<String> {
    let path = fixture_file(rel);
    fs::read_to_string(&path).with_context(|| format!("reading play fixture {}", path.display()))
}

fn named<'a, T>(table: &'a HashMap<String, T>, family: &str, name: &str) -> Result<&'a T> {
    table.get(name).ok_or_else(|| {
        let mut known: Vec<&str> = table.keys().map(String::as_str).collect();
        known.sort_unstable();
        anyhow!(
            "no {family} named '{name}' in {MANIFEST_NAME} (known: {})",
            known.join(", ")
        )
    })
}

fn names<T>(table: &HashMap<String, T>) -> Vec<String> {
    let mut out: Vec<String> = table.keys().cloned().collect();
    out.sort();
    out
}

/// Editor saves (flat `fromX/fromY` records, possibly without owners).
pub mod plays {
    use super::*;

    pub fn keys() -> Vec<String> {
        names(&CATALOG.plays)
    }

    pub fn json(name: &str) -> Result<String> {
        read_fixture(named(&CATALOG.plays, "play", name)?.file())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(fixture_file(named(&CATALOG.plays, "play", name)?.file()))
    }
}

/// Canonical play documents.
pub mod documents {
    use super::*;

    pub fn keys() -> Vec<String> {
        names(&CATALOG.documents)
    }

    pub fn json(name: &str) -> Result<String> {
        read_fixture(named(&CATALOG.documents, "document", name)?)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let text = json(name)?;
        serde_json::from_str(&text).with_context(|| format!("document fixture '{name}' is not valid"))
    }
}
