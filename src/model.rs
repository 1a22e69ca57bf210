use serde::{Deserialize, Deserializer};

/// One physical file that belongs to a duplicate group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub oid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mxfs_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mxfs_filename: String,
    #[serde(default)]
    pub maybe_asset_folder: Option<String>,
    #[serde(default)]
    pub maybe_type: Option<String>,
    #[serde(default)]
    pub maybe_project: Option<String>,
    #[serde(default, rename = "checkSum")]
    pub maybe_checksum: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub byte_size: u64,
}

impl DuplicateEntry {
    pub fn media_type(&self) -> Option<&str> {
        non_empty(&self.maybe_type)
    }

    pub fn project(&self) -> Option<&str> {
        non_empty(&self.maybe_project)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// A duplicate group: a representative path, the declared number of
/// duplicates and the member entries in report order.
///
/// `duplicate_count` is taken from the report as-is and need not match
/// `duplicates_data.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DuplicateRecord {
    #[serde(default, rename = "mxfsPath", deserialize_with = "null_as_default")]
    pub mxfs_path: String,
    #[serde(
        default,
        rename = "duplicateNumber",
        deserialize_with = "null_as_default"
    )]
    pub duplicate_count: i64,
    #[serde(
        default,
        rename = "DuplicatesData",
        alias = "duplicatesData",
        deserialize_with = "null_as_default"
    )]
    pub duplicates_data: Vec<DuplicateEntry>,
}

/// The whole decoded report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DuplicatesReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub dupes_count: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub item_count: i64,
    #[serde(
        default,
        rename = "Duplicates",
        alias = "duplicates",
        deserialize_with = "null_as_default"
    )]
    pub duplicates: Vec<DuplicateRecord>,
}

impl DuplicatesReport {
    /// Share of items that are duplicates, as a percentage. `None` when the
    /// report has no items.
    pub fn dupe_percentage(&self) -> Option<f64> {
        if self.item_count == 0 {
            None
        } else {
            Some(self.dupes_count as f64 / self.item_count as f64 * 100.0)
        }
    }
}

/// The derived output row for one duplicate group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SummaryRecord {
    pub mxfs_path: String,
    pub maybe_type: String,
    pub maybe_project: String,
    pub duplicate_count: i64,
    pub individual_file_size: u64,
    pub total_size: u64,
}

pub const SUMMARY_HEADER: [&str; 6] = [
    "File path",
    "Duplicates",
    "Project ID",
    "Media type",
    "Total duplicated size",
    "Individual file size",
];

impl SummaryRecord {
    /// Fields in `SUMMARY_HEADER` column order.
    pub fn to_csv_row(&self) -> [String; 6] {
        [
            self.mxfs_path.clone(),
            self.duplicate_count.to_string(),
            self.maybe_project.clone(),
            self.maybe_type.clone(),
            self.total_size.to_string(),
            self.individual_file_size.to_string(),
        ]
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
