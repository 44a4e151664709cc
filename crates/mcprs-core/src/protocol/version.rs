//! # Version Negotiation
//!
//! Centralized version management for the Model Context Protocol (MCP).
//!
//! Three versions are tracked: two frozen stable releases and a `draft`
//! tracker that always points at the newest in-development revision. The
//! draft tracker interoperates with the latest stable release; two stable
//! releases interoperate only when identical. Negotiation never silently
//! falls back to a version the peer didn't ask for — an unsatisfiable
//! request is reported as `-32001` (`MCPError::unsupported_protocol_version`).

use crate::error::{MCPError, MCPResult};

/// The oldest version this crate understands.
pub const VERSION_2024_11_05: &str = "2024-11-05";
/// The latest stable, frozen version.
pub const VERSION_2025_03_26: &str = "2025-03-26";
/// The unstable tracker, always compatible with the latest stable release.
pub const VERSION_DRAFT: &str = "draft";

/// Default protocol version this crate advertises when none is specified.
pub const PROTOCOL_VERSION: &str = VERSION_2025_03_26;

/// All versions this crate understands, oldest first; `draft` ranks newest.
pub const SUPPORTED_VERSIONS: &[&str] = &[VERSION_2024_11_05, VERSION_2025_03_26, VERSION_DRAFT];

fn rank(version: &str) -> Option<usize> {
    SUPPORTED_VERSIONS.iter().position(|v| *v == version)
}

/// Strip a leading `v`/`V` and map the aliases `latest`/`current` to the
/// newest stable release.
pub fn normalize_version(version: &str) -> String {
    let trimmed = version.trim();
    let stripped = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    match stripped {
        "latest" | "current" => VERSION_2025_03_26.to_string(),
        other => other.to_string(),
    }
}

/// The compatibility matrix: equal versions are always compatible; `draft`
/// additionally interoperates with the latest stable release.
pub fn versions_compatible(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    (a == VERSION_DRAFT && b == VERSION_2025_03_26) || (b == VERSION_DRAFT && a == VERSION_2025_03_26)
}

/// Whether this crate recognizes `version` at all (after normalization).
pub fn is_supported_version(version: &str) -> bool {
    rank(&normalize_version(version)).is_some()
}

/// Whether `version` supports `feature`. Used to drive the version adapters
/// that normalize content shape differences (audio content, tool
/// annotations, progress messages, batching) across protocol revisions.
pub fn version_supports_feature(version: &str, feature: &str) -> bool {
    let v = normalize_version(version);
    match feature {
        "batching" | "audio_content" | "progress_message" | "tool_annotations" => {
            v != VERSION_2024_11_05
        }
        _ => false,
    }
}

/// Pick the highest-ranked version present in both `a` and `b` under the
/// compatibility matrix. `None` if no compatible pair exists. Commutative:
/// `negotiate_versions(a, b) == negotiate_versions(b, a)`.
pub fn negotiate_versions(a: &[String], b: &[String]) -> Option<String> {
    let mut best: Option<(usize, String)> = None;
    for raw_a in a {
        let va = normalize_version(raw_a);
        let Some(ra) = rank(&va) else { continue };
        for raw_b in b {
            let vb = normalize_version(raw_b);
            let Some(rb) = rank(&vb) else { continue };
            if !versions_compatible(&va, &vb) {
                continue;
            }
            let (candidate, candidate_rank) = if ra >= rb { (va.clone(), ra) } else { (vb.clone(), rb) };
            if best.as_ref().map(|(r, _)| candidate_rank > *r).unwrap_or(true) {
                best = Some((candidate_rank, candidate));
            }
        }
    }
    best.map(|(_, v)| v)
}

/// Negotiate against this crate's default supported-version set.
pub fn negotiate_version(requested_version: &str) -> MCPResult<String> {
    VersionNegotiator::default().negotiate(requested_version)
}

/// Version negotiator for one side (client or server) of a handshake.
#[derive(Debug, Clone)]
pub struct VersionNegotiator {
    supported_versions: Vec<String>,
}

impl VersionNegotiator {
    /// Create a negotiator advertising exactly `supported_versions`.
    pub fn new(supported_versions: Vec<String>) -> Self {
        Self { supported_versions }
    }

    /// A negotiator advertising every version this crate understands.
    pub fn default() -> Self {
        Self::new(SUPPORTED_VERSIONS.iter().map(|v| v.to_string()).collect())
    }

    /// Negotiate against a single peer-requested version string. Returns the
    /// highest-ranked mutually compatible version, or
    /// `MCPError::unsupported_protocol_version` (wire code `-32001`) if none
    /// exists.
    pub fn negotiate(&self, requested_version: &str) -> MCPResult<String> {
        let requested = normalize_version(requested_version);
        negotiate_versions(&[requested.clone()], &self.supported_versions)
            .ok_or_else(|| MCPError::unsupported_protocol_version(requested))
    }

    /// All versions this negotiator advertises.
    pub fn supported_versions(&self) -> &[String] {
        &self.supported_versions
    }

    /// Whether this negotiator advertises `version` (after normalization).
    pub fn supports_version(&self, version: &str) -> bool {
        let normalized = normalize_version(version);
        self.supported_versions
            .iter()
            .any(|v| normalize_version(v) == normalized)
    }

    /// The highest-ranked version this negotiator advertises.
    pub fn get_preferred_version(&self) -> Option<String> {
        self.supported_versions
            .iter()
            .filter_map(|v| rank(&normalize_version(v)).map(|r| (r, v.clone())))
            .max_by_key(|(r, _)| *r)
            .map(|(_, v)| v)
    }
}
