//! Artifact identity: logical names and the history filename convention
//!
//! Every conversion result is written as `<logicalName>.<versionStamp>.json`.
//! The logical name is the stable identity shared by all historical versions
//! of one conversion target; the version stamp is fixed-width and
//! zero-padded, so descending string order over full filenames equals
//! descending recency order.

use std::path::{Path, PathBuf};

use crate::config::RESULT_FILE_EXTENSION;

/// One stored conversion-output file belonging to a logical result identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: PathBuf,
    file_name: String,
}

impl Artifact {
    pub(crate) fn new(path: PathBuf, file_name: String) -> Self {
        Self { path, file_name }
    }

    /// Full filesystem path; uniquely identifies the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, the recency sort key.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Derives the logical result name from a result file path by stripping the
/// trailing `<versionStamp>.<ext>` (the final two extensions).
///
/// `patient-123.20240101000000.json` → `patient-123`. A name with fewer
/// than two extensions is returned with whatever extensions it has removed.
/// Returns `None` when the path has no usable UTF-8 file name.
pub fn logical_name(path: impl AsRef<Path>) -> Option<String> {
    let stem = path.as_ref().file_stem()?.to_str()?;
    let stem = Path::new(stem).file_stem()?.to_str()?;
    Some(stem.to_string())
}

/// Whether `file_name` has the history shape `<logicalName>.<anything>.json`
/// for this logical name.
///
/// Matching is case-sensitive and purely structural: the middle segment is
/// not validated as a version stamp (an empty middle matches, mirroring the
/// `name.*.json` glob this convention comes from). `<logicalName>.json`
/// itself never matches, and a logical name that is a strict prefix of
/// another never cross-matches.
pub fn is_artifact_of(file_name: &str, logical_name: &str) -> bool {
    file_name
        .strip_prefix(logical_name)
        .and_then(|rest| rest.strip_prefix('.'))
        .and_then(|rest| rest.strip_suffix(RESULT_FILE_EXTENSION))
        .and_then(|rest| rest.strip_suffix('.'))
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("patient-123.20240101000000.json", "patient-123")]
    #[case("/results/nested/patient-123.20240102120000.json", "patient-123")]
    #[case("report.v2.final.20240101000000.json", "report.v2.final")]
    #[case("patient-123.json", "patient-123")]
    #[case("patient-123", "patient-123")]
    fn logical_name_strips_trailing_stamp_and_extension(
        #[case] path: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(logical_name(path).as_deref(), Some(expected));
    }

    #[rstest]
    #[case("patient-123.20240101000000.json", true)]
    #[case("patient-123.not-a-stamp.json", true)]
    #[case("patient-123..json", true)]
    #[case("patient-123.json", false)]
    #[case("patient-123.20240101000000.xml", false)]
    #[case("patient-1234.20240101000000.json", false)]
    #[case("patient-12.20240101000000.json", false)]
    #[case("Patient-123.20240101000000.json", false)]
    #[case("patient-123.20240101000000.JSON", false)]
    fn is_artifact_of_matches_history_shape_only(#[case] file_name: &str, #[case] matches: bool) {
        assert_eq!(is_artifact_of(file_name, "patient-123"), matches);
    }

    #[test]
    fn logical_name_of_artifact_round_trips_through_matching() {
        let name = logical_name("obs-042.20240103000000.json").unwrap();
        assert!(is_artifact_of("obs-042.20240101000000.json", &name));
        assert!(!is_artifact_of("obs-0421.20240101000000.json", &name));
    }
}
