//! Wire types of the drive storage API.

use chrono::{DateTime, TimeZone as _, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Path separator of the drive namespace.
pub const SEPARATOR: char = '/';

/// MIME type used when nothing more specific is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// One remote object under a drive's namespace.
///
/// Entries are read-only projections of server state produced by a list
/// call; they are never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFileEntry", rename_all = "camelCase")]
pub struct FileEntry {
    /// Leaf display name (final path segment).
    pub name: String,
    /// Full addressable path, unique within a drive.
    pub path: String,
    pub is_directory: bool,
    pub size_bytes: u64,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl FileEntry {
    pub fn file(path: impl Into<String>, size_bytes: u64) -> Self {
        let path = path.into();
        Self {
            name: leaf_name(&path).to_owned(),
            path,
            is_directory: false,
            size_bytes,
            last_updated_at: None,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: leaf_name(&path).to_owned(),
            path,
            is_directory: true,
            size_bytes: 0,
            last_updated_at: None,
        }
    }

    pub fn with_updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_updated_at = Some(at);
        self
    }
}

/// Entry as the server sends it. Field names vary between storage backends,
/// so the common spellings are accepted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFileEntry {
    #[serde(default)]
    name: Option<String>,
    path: String,
    #[serde(default, alias = "isDirectory", alias = "dir")]
    is_dir: bool,
    #[serde(default, alias = "sizeBytes")]
    size: u64,
    #[serde(
        default,
        alias = "lastUpdatedAt",
        alias = "lastModified",
        alias = "modTime",
        deserialize_with = "deserialize_timestamp"
    )]
    updated_at: Option<DateTime<Utc>>,
}

impl From<RawFileEntry> for FileEntry {
    fn from(raw: RawFileEntry) -> Self {
        let name = match raw.name {
            Some(name) if !name.is_empty() => name,
            _ => leaf_name(&raw.path).to_owned(),
        };
        Self {
            name,
            path: raw.path,
            is_directory: raw.is_dir,
            size_bytes: raw.size,
            last_updated_at: raw.updated_at,
        }
    }
}

/// Accepts RFC 3339 strings or epoch milliseconds; anything else is `None`.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    })
}

/// Envelope of the list endpoint: `{ "data": [...] }`.
///
/// A missing or `null` `data` field is an empty listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub data: Option<Vec<FileEntry>>,
}

/// Opaque metadata object returned by the upload endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerMetadata(pub serde_json::Value);

/// Body of the create-directory endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CreateDirRequest {
    pub path: String,
}

/// Body of the copy and move endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub old_path: String,
    pub new_path: String,
    pub over_write: bool,
}

/// A file ready to be sent to the upload endpoint.
///
/// The server stores it under `filename` inside the destination folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: OCTET_STREAM.to_owned(),
            data,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }
}

/// Final segment of a drive path (`/a/b.yml` -> `b.yml`, `/a/dir/` -> `dir`).
pub fn leaf_name(path: &str) -> &str {
    path.trim_end_matches(SEPARATOR)
        .rsplit(SEPARATOR)
        .next()
        .unwrap_or_default()
}

/// Folder form of a path: always ends with the separator.
pub fn as_folder(path: &str) -> String {
    if path.ends_with(SEPARATOR) {
        path.to_owned()
    } else {
        format!("{path}{SEPARATOR}")
    }
}

/// Path of `name` inside `folder`.
pub fn join_path(folder: &str, name: &str) -> String {
    format!("{}{}", as_folder(folder), name.trim_start_matches(SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_name() {
        assert_eq!(leaf_name("/retail/audio/a.mp3"), "a.mp3");
        assert_eq!(leaf_name("/retail/audio/"), "audio");
        assert_eq!(leaf_name("a.mp3"), "a.mp3");
        assert_eq!(leaf_name(""), "");
    }

    #[test]
    fn test_folder_helpers() {
        assert_eq!(as_folder("/retail/map"), "/retail/map/");
        assert_eq!(as_folder("/retail/map/"), "/retail/map/");
        assert_eq!(join_path("/retail/map", "/floor.pgm"), "/retail/map/floor.pgm");
    }

    #[test]
    fn test_entry_deserialization_accepts_aliases() {
        let json = r#"[
            {"name": "a.mp3", "path": "/audio/a.mp3", "isDir": false, "size": 10, "updatedAt": "2025-03-01T08:00:00Z"},
            {"path": "/audio/sub/", "isDirectory": true},
            {"path": "/audio/b.wav", "sizeBytes": 7, "lastModified": 1700000000000}
        ]"#;
        let entries: Vec<FileEntry> = serde_json::from_str(json).unwrap();

        assert_eq!(entries[0].name, "a.mp3");
        assert_eq!(entries[0].size_bytes, 10);
        assert!(entries[0].last_updated_at.is_some());

        assert_eq!(entries[1].name, "sub");
        assert!(entries[1].is_directory);

        assert_eq!(entries[2].name, "b.wav");
        assert_eq!(entries[2].size_bytes, 7);
        assert_eq!(
            entries[2].last_updated_at.map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
    }

    #[test]
    fn test_unparseable_timestamp_is_none() {
        let entry: FileEntry =
            serde_json::from_str(r#"{"path": "/x", "updatedAt": "yesterday"}"#).unwrap();
        assert!(entry.last_updated_at.is_none());
    }

    #[test]
    fn test_list_response_null_data_is_empty() {
        let resp: ListResponse = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(resp.data.unwrap_or_default().is_empty());
        let resp: ListResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.data.is_none());
    }

    #[test]
    fn test_transfer_request_uses_server_field_names() {
        let body = TransferRequest {
            old_path: "/a".to_owned(),
            new_path: "/b".to_owned(),
            over_write: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"oldPath": "/a", "newPath": "/b", "overWrite": true})
        );
    }
}
