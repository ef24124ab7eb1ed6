//! Core types for remedy

use serde::{Deserialize, Serialize};

/// A remediation action and the systems it applies to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    /// Issue identifier (e.g. `advisor:some_rule|SOME_KEY`)
    pub id: String,
    /// System identifiers the issue should be remediated on
    #[serde(default)]
    pub systems: Vec<String>,
    /// Preferred resolution, if not the default one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

impl Issue {
    /// Create an issue with the default resolution
    pub fn new(id: impl Into<String>, systems: Vec<String>) -> Self {
        Self {
            id: id.into(),
            systems,
            resolution: None,
        }
    }
}

/// A bounded slice of one issue's systems, produced by packing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fragment {
    /// Identifier of the issue this slice belongs to
    pub id: String,
    /// Systems in this slice
    pub systems: Vec<String>,
    /// Resolution carried over from the issue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

/// Fragments destined for one network request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Batch {
    /// Fragments in submission order
    pub fragments: Vec<Fragment>,
}

impl Batch {
    /// Number of fragments in the batch
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether the batch holds no fragments
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Total systems across all fragments
    pub fn system_count(&self) -> usize {
        self.fragments.iter().map(|f| f.systems.len()).sum()
    }
}

/// One issue entry inside a request payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayloadIssue {
    /// Issue identifier
    pub id: String,
    /// Systems to add for this issue
    pub systems: Vec<String>,
    /// Resolution override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

impl From<&Fragment> for PayloadIssue {
    fn from(fragment: &Fragment) -> Self {
        Self {
            id: fragment.id.clone(),
            systems: fragment.systems.clone(),
            resolution: fragment.resolution.clone(),
        }
    }
}

/// The `add` section of a request payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddSection {
    /// Issues (with systems) to add
    pub issues: Vec<PayloadIssue>,
    /// Systems added without issues; always empty for bulk submissions
    pub systems: Vec<String>,
}

/// Body of a create or update request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemediationPayload {
    /// Content to add to the plan
    pub add: AddSection,
    /// Whether systems may be rebooted automatically
    pub auto_reboot: bool,
    /// Plan name, only sent on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Response of a create request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedRemediation {
    /// Identifier of the new plan; a response without one is unusable
    #[serde(default)]
    pub id: Option<String>,
}

/// Overall outcome of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Every batch was applied
    Success,
    /// The plan exists but some batches failed
    PartialFailure,
    /// No usable plan exists
    CompleteFailure,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::PartialFailure => "partial_failure",
            Self::CompleteFailure => "complete_failure",
        };
        f.write_str(s)
    }
}

/// Pagination metadata of a page or aggregate
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    /// Total number of rows in the collection
    #[serde(default)]
    pub total: u64,
}

/// One backend response unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page<T> {
    /// Rows of this page; absent means zero rows
    pub data: Option<Vec<T>>,
    /// Pagination metadata
    #[serde(default)]
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Build a page from rows and the collection total
    pub fn new(data: Vec<T>, total: u64) -> Self {
        Self {
            data: Some(data),
            meta: PageMeta { total },
        }
    }
}

/// Merge of all pages of one full-fetch pass
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregateResult<T> {
    /// All rows, in page order
    pub data: Vec<T>,
    /// Total as reported by the first page
    pub meta: PageMeta,
}

/// A remediation plan as listed by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemediationSummary {
    /// Plan identifier
    pub id: String,
    /// Plan name
    #[serde(default)]
    pub name: Option<String>,
    /// Auto-reboot flag
    #[serde(default)]
    pub auto_reboot: bool,
    /// Number of systems in the plan
    #[serde(default)]
    pub system_count: u64,
    /// Number of issues in the plan
    #[serde(default)]
    pub issue_count: u64,
    /// Last update timestamp as reported by the backend
    #[serde(default)]
    pub updated_at: Option<String>,
}
