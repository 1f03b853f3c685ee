use crate::{clean_name, PubChemClient};
use anyhow::Result;
use tracing::*;

/// One successfully resolved input name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCompound {
    /// The name exactly as the user entered it.
    pub name: String,
    /// The SMILES string the service returned for it.
    pub smiles: String,
}

/// Outcome of a resolution run. A name lands in exactly one of the two
/// lists.
#[derive(Debug, Default)]
pub struct Resolution {
    pub resolved: Vec<ResolvedCompound>,
    pub unresolved: Vec<String>,
}

/// The lookup operations the pipeline needs from the remote service.
pub trait CompoundLookup {
    fn synonyms(&self, name: &str) -> Result<Vec<String>>;
    fn cid_for_name(&self, name: &str) -> Result<Option<String>>;
    fn smiles_for_cid(&self, cid: &str) -> Result<String>;
}

impl CompoundLookup for PubChemClient {
    fn synonyms(&self, name: &str) -> Result<Vec<String>> {
        PubChemClient::synonyms(self, name)
    }

    fn cid_for_name(&self, name: &str) -> Result<Option<String>> {
        PubChemClient::cid_for_name(self, name)
    }

    fn smiles_for_cid(&self, cid: &str) -> Result<String> {
        PubChemClient::smiles_for_cid(self, cid)
    }
}

/// Resolves each input name to a SMILES string, trying the original
/// spelling, the cleaned-up spelling, and then any synonyms the service
/// knows, in that order. The first candidate that yields an identifier and a
/// structure wins; names where every candidate fails are collected as
/// unresolved. Blank inputs are skipped entirely.
pub fn resolve_names<L: CompoundLookup>(lookup: &L, names: &[String]) -> Resolution {
    let mut resolution = Resolution::default();

    for raw in names {
        let original = raw.trim();
        if original.is_empty() {
            continue;
        }

        let cleaned = clean_name(original);
        let synonyms = lookup.synonyms(&cleaned).unwrap_or_else(|e| {
            warn!("Synonym lookup for '{}' failed: {}", cleaned, e);
            Vec::new()
        });
        let candidates = candidate_names(original, &cleaned, synonyms);

        let mut found = false;
        for candidate in &candidates {
            info!("Trying '{}'", candidate);
            let cid = match lookup.cid_for_name(candidate) {
                Ok(Some(cid)) => cid,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Lookup for '{}' failed: {}", candidate, e);
                    continue;
                }
            };
            match lookup.smiles_for_cid(&cid) {
                Ok(smiles) => {
                    resolution.resolved.push(ResolvedCompound {
                        name: original.to_string(),
                        smiles,
                    });
                    found = true;
                    break;
                }
                Err(e) => {
                    warn!("Structure fetch for CID {} failed: {}", cid, e);
                    continue;
                }
            }
        }

        if !found {
            error!("Could not resolve '{}'", original);
            resolution.unresolved.push(original.to_string());
        }
    }

    resolution
}

/// Orders the candidate spellings for one name: the original first, the
/// cleaned form second, synonyms after. Empty candidates are dropped,
/// duplicates are kept (a repeat attempt is harmless).
fn candidate_names(original: &str, cleaned: &str, synonyms: Vec<String>) -> Vec<String> {
    let mut candidates = vec![original.to_string(), cleaned.to_string()];
    candidates.extend(synonyms);
    candidates.retain(|candidate| !candidate.is_empty());
    candidates
}
