// JSON record loading: the builder itself never touches a file
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("record {index} in {path} is malformed: {source}")]
    Record {
        path: String,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Content-addressed artifact record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArtifactRecord {
    pub id: String,
    pub algorithm: String,
    pub digest: String,
}

/// Key/value metadata record attached to a subject in the knowledge graph.
/// The core consumes only `key` and `value`; the rest travels along for
/// traceability. `subject` is an arbitrary package tree and stays raw.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataRecord {
    pub id: String,
    pub subject: Value,
    pub key: String,
    pub value: String,
    pub timestamp: String,
    pub justification: String,
    pub origin: String,
    pub collector: String,
    #[serde(rename = "documentRef")]
    pub document_ref: String,
}

/// Package coordinate trees, nested type/namespace/name/version.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackageRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub package_type: String,
    pub namespaces: Vec<PackageNamespace>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackageNamespace {
    pub id: String,
    pub namespace: String,
    pub names: Vec<PackageName>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackageName {
    pub id: String,
    pub name: String,
    pub versions: Vec<PackageVersion>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackageVersion {
    pub id: String,
    pub purl: String,
    pub version: String,
    pub qualifiers: Vec<String>,
    pub subpath: String,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, IngestError> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| IngestError::Json {
        path: path.display().to_string(),
        source,
    })
}

pub fn load_artifacts(path: &Path) -> Result<Vec<ArtifactRecord>, IngestError> {
    read_json(path)
}

pub fn load_packages(path: &Path) -> Result<Vec<PackageRecord>, IngestError> {
    read_json(path)
}

/// Strict metadata load: one malformed record fails the whole file.
pub fn load_metadata(path: &Path) -> Result<Vec<MetadataRecord>, IngestError> {
    let raw: Vec<Value> = read_json(path)?;
    raw.into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).map_err(|source| IngestError::Record {
                path: path.display().to_string(),
                index,
                source,
            })
        })
        .collect()
}

/// Batch-tolerant metadata load: a record missing a required key aborts only
/// its own ingestion. File-level failures (unreadable, not a JSON array) are
/// still hard errors. Returns the records and the skipped count.
pub fn load_metadata_tolerant(path: &Path) -> Result<(Vec<MetadataRecord>, usize), IngestError> {
    let raw: Vec<Value> = read_json(path)?;
    let mut records = Vec::with_capacity(raw.len());
    let mut skipped = 0;
    for (index, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<MetadataRecord>(value) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(path = %path.display(), index, error = %err, "skipping malformed metadata record");
                skipped += 1;
            }
        }
    }
    Ok((records, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    const METADATA_DOC: &str = r#"[
        {
            "id": "72",
            "subject": {"id": "12", "type": "guac", "namespaces": []},
            "key": "cpe",
            "value": "cpe:2.3:a:apache:httpd:2.4.54:*:*:*:*:*:*:*",
            "timestamp": "2024-01-01T00:00:00Z",
            "justification": "scanner match",
            "origin": "osv",
            "collector": "collector-a",
            "documentRef": "doc-1"
        }
    ]"#;

    #[test]
    fn loads_metadata_records_with_document_ref_key() {
        let f = json_file(METADATA_DOC);
        let records = load_metadata(f.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "cpe");
        assert_eq!(records[0].document_ref, "doc-1");
    }

    #[test]
    fn strict_load_fails_on_missing_required_key() {
        // second record lacks "value"
        let f = json_file(
            r#"[
            {"id": "1", "subject": null, "key": "cpe", "value": "x", "timestamp": "t",
             "justification": "j", "origin": "o", "collector": "c", "documentRef": "d"},
            {"id": "2", "subject": null, "key": "cpe", "timestamp": "t",
             "justification": "j", "origin": "o", "collector": "c", "documentRef": "d"}
        ]"#,
        );
        let err = load_metadata(f.path()).unwrap_err();
        match err {
            IngestError::Record { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn tolerant_load_skips_malformed_records_and_counts_them() {
        let f = json_file(
            r#"[
            {"id": "1", "subject": null, "key": "cpe", "value": "x", "timestamp": "t",
             "justification": "j", "origin": "o", "collector": "c", "documentRef": "d"},
            {"id": "2", "subject": null, "key": "cpe", "timestamp": "t",
             "justification": "j", "origin": "o", "collector": "c", "documentRef": "d"}
        ]"#,
        );
        let (records, skipped) = load_metadata_tolerant(f.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(skipped, 1);
        assert_eq!(records[0].id, "1");
    }

    #[test]
    fn loads_nested_package_trees() {
        let f = json_file(
            r#"[
            {
                "id": "5",
                "type": "deb",
                "namespaces": [
                    {
                        "id": "6",
                        "namespace": "debian",
                        "names": [
                            {
                                "id": "7",
                                "name": "curl",
                                "versions": [
                                    {"id": "8", "purl": "pkg:deb/debian/curl@7.88",
                                     "version": "7.88", "qualifiers": [], "subpath": ""}
                                ]
                            }
                        ]
                    }
                ]
            }
        ]"#,
        );
        let packages = load_packages(f.path()).unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].namespaces[0].names[0].name, "curl");
        assert_eq!(
            packages[0].namespaces[0].names[0].versions[0].purl,
            "pkg:deb/debian/curl@7.88"
        );
    }

    #[test]
    fn loads_artifact_digests() {
        let f = json_file(
            r#"[{"id": "9", "algorithm": "sha256", "digest": "abc123"}]"#,
        );
        let artifacts = load_artifacts(f.path()).unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].algorithm, "sha256");
    }

    #[test]
    fn unreadable_file_is_an_io_error() {
        let err = load_metadata(Path::new("/nonexistent/HasMetadata.json")).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
