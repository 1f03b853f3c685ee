use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::*;
use url::Url;

/// Base path of the PubChem PUG REST service.
pub const PUG_BASE: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";

/// Synonym lookups are best-effort, so they get the shorter timeout.
const SYNONYM_TIMEOUT: Duration = Duration::from_secs(10);
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

const MAX_SYNONYMS: usize = 5;
const MAX_SYNONYM_LEN: usize = 100;

#[derive(Error, Debug)]
pub enum PubChemError {
    #[error("Service returned HTTP {0} for {1}")]
    Status(StatusCode, String),
    #[error("Service returned an empty body for {0}")]
    EmptyBody(String),
}

/// Blocking client for the handful of PUG REST endpoints the resolver needs:
/// synonym lists, name-to-CID lookups, and CID-to-SMILES property fetches.
pub struct PubChemClient {
    http: Client,
    base: Url,
}

impl PubChemClient {
    pub fn new() -> Result<Self> {
        Self::with_base(PUG_BASE)
    }

    /// Builds a client against an alternate base path.
    pub fn with_base(base: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()
            .context("Failed to build the HTTP client")?;
        let base = Url::parse(base).with_context(|| format!("Invalid base URL {base}"))?;
        Ok(Self { http, base })
    }

    /// Appends path segments to the base URL, percent-encoding each one so
    /// that raw compound names are safe in the path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Base URL {} cannot take path segments", self.base))?
            .extend(segments);
        Ok(url)
    }

    fn get_text(&self, url: &Url, timeout: Duration) -> Result<(StatusCode, String)> {
        let response = self
            .http
            .get(url.clone())
            .timeout(timeout)
            .send()
            .with_context(|| format!("Request to {url} failed"))?;
        let status = response.status();
        let body = response
            .text()
            .with_context(|| format!("Failed to read the response body from {url}"))?;
        Ok((status, body))
    }

    /// Fetches alternative names for a compound. Returns at most five
    /// entries, each shorter than 100 characters; an unhelpful response
    /// degrades to an empty list.
    pub fn synonyms(&self, name: &str) -> Result<Vec<String>> {
        let url = self.endpoint(&["compound", "name", name, "synonyms", "TXT"])?;
        let (status, body) = self.get_text(&url, SYNONYM_TIMEOUT)?;
        if !status.is_success() {
            debug!("No synonyms for '{}' (HTTP {})", name, status);
            return Ok(Vec::new());
        }
        Ok(body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && line.len() < MAX_SYNONYM_LEN)
            .take(MAX_SYNONYMS)
            .map(String::from)
            .collect())
    }

    /// Looks up the compound identifier for a name. A 404 or an empty body
    /// means the name is unknown to the service, not an error.
    pub fn cid_for_name(&self, name: &str) -> Result<Option<String>> {
        let url = self.endpoint(&["compound", "name", name, "cids", "TXT"])?;
        let (status, body) = self.get_text(&url, LOOKUP_TIMEOUT)?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(PubChemError::Status(status, url.to_string()).into());
        }
        Ok(body
            .lines()
            .next()
            .map(str::trim)
            .filter(|cid| !cid.is_empty())
            .map(String::from))
    }

    /// Fetches the SMILES string for a CID, preferring a stereochemistry
    /// annotated form.
    ///
    /// Three escalating attempts: the direct isomeric property, a combined
    /// property request scanned for a line with a stereo marker, and the full
    /// compound record scanned for a nested isomeric SMILES field. If none of
    /// them turn up a stereo marker, the plain string from the first request
    /// is returned as-is.
    pub fn smiles_for_cid(&self, cid: &str) -> Result<String> {
        let url = self.endpoint(&["compound", "cid", cid, "property", "IsomericSMILES", "TXT"])?;
        let (status, body) = self.get_text(&url, LOOKUP_TIMEOUT)?;
        if !status.is_success() {
            return Err(PubChemError::Status(status, url.to_string()).into());
        }
        let plain = body.trim().to_string();
        if plain.is_empty() {
            return Err(PubChemError::EmptyBody(url.to_string()).into());
        }
        if plain.contains('@') {
            return Ok(plain);
        }

        // The single-property answer had no stereo centers; ask for every
        // SMILES flavor at once and take the first annotated one.
        let url = self.endpoint(&[
            "compound",
            "cid",
            cid,
            "property",
            "IsomericSMILES,CanonicalSMILES,SMILES",
            "TXT",
        ])?;
        match self.get_text(&url, LOOKUP_TIMEOUT) {
            Ok((status, body)) if status.is_success() => {
                if let Some(smiles) = pick_stereo_line(&body) {
                    return Ok(smiles);
                }
            }
            Ok((status, _)) => debug!("Combined property request got HTTP {}", status),
            Err(e) => warn!("Combined property request for CID {} failed: {}", cid, e),
        }

        // Last resort: the full record sometimes carries an isomeric SMILES
        // property that the property endpoints do not expose.
        let url = self.endpoint(&["compound", "cid", cid, "JSON"])?;
        match self.get_text(&url, LOOKUP_TIMEOUT) {
            Ok((status, body)) if status.is_success() => match serde_json::from_str::<Value>(&body)
            {
                Ok(record) => {
                    if let Some(smiles) = isomeric_from_record(&record) {
                        return Ok(smiles);
                    }
                }
                Err(e) => warn!("Unparseable full record for CID {}: {}", cid, e),
            },
            Ok((status, _)) => debug!("Full record request got HTTP {}", status),
            Err(e) => warn!("Full record request for CID {} failed: {}", cid, e),
        }

        Ok(plain)
    }
}

/// Picks the first line of a multi-SMILES property response that carries a
/// stereo marker.
fn pick_stereo_line(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .find(|line| line.contains('@'))
        .map(String::from)
}

/// Digs through a full compound record for a `SMILES`/`Isomeric` property
/// whose value carries a stereo marker.
fn isomeric_from_record(record: &Value) -> Option<String> {
    let props = record.get("PC_Compounds")?.get(0)?.get("props")?.as_array()?;
    for prop in props {
        let urn = &prop["urn"];
        if urn["label"] == "SMILES" && urn["name"] == "Isomeric" {
            if let Some(value) = prop["value"]["value"].as_str() {
                if value.contains('@') {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_percent_encodes_names() {
        let client = PubChemClient::new().unwrap();
        let url = client
            .endpoint(&["compound", "name", "sodium chloride #2", "cids", "TXT"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            format!("{PUG_BASE}/compound/name/sodium%20chloride%20%232/cids/TXT")
        );
    }

    #[test]
    fn stereo_line_selection_prefers_first_annotated() {
        let body = "CC(N)C(=O)O\nC[C@@H](N)C(=O)O\nC[C@H](N)C(=O)O\n";
        assert_eq!(
            pick_stereo_line(body).as_deref(),
            Some("C[C@@H](N)C(=O)O")
        );
        assert_eq!(pick_stereo_line("CCO\nCCN\n"), None);
    }

    #[test]
    fn full_record_scan_finds_isomeric_smiles() {
        let record = json!({
            "PC_Compounds": [{
                "props": [
                    {
                        "urn": { "label": "SMILES", "name": "Canonical" },
                        "value": { "value": "CC(N)C(=O)O" }
                    },
                    {
                        "urn": { "label": "IUPAC Name", "name": "Preferred" },
                        "value": { "value": "alanine" }
                    },
                    {
                        "urn": { "label": "SMILES", "name": "Isomeric" },
                        "value": { "value": "C[C@@H](N)C(=O)O" }
                    }
                ]
            }]
        });
        assert_eq!(
            isomeric_from_record(&record).as_deref(),
            Some("C[C@@H](N)C(=O)O")
        );
    }

    #[test]
    fn full_record_scan_ignores_unannotated_values() {
        let record = json!({
            "PC_Compounds": [{
                "props": [{
                    "urn": { "label": "SMILES", "name": "Isomeric" },
                    "value": { "value": "CCO" }
                }]
            }]
        });
        assert_eq!(isomeric_from_record(&record), None);
        assert_eq!(isomeric_from_record(&json!({})), None);
    }
}
