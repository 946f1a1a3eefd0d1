//! Filename-driven compliance rule.
//!
//! Until a real checker exists, the violation count and the vessel label are
//! derived from the uploaded file's name. Two names are special-cased:
//! anything containing `iteration1` is the non-compliant "vessel1" sample and
//! anything containing `iteration2` is the compliant "vessel1 P1" sample.
//!
//! Both ingestion and the result views go through [`ComplianceRule`], so
//! replacing the rule is a matter of handing a different implementation to
//! the application state.

use rand::Rng;

/// Upper bound (inclusive) for counts assigned to names no pattern matches.
pub const MAX_RANDOM_ISSUES: i32 = 4;

const NON_COMPLIANT_SAMPLE: &str = "iteration1";
const COMPLIANT_SAMPLE: &str = "iteration2";
const NON_COMPLIANT_VESSEL: &str = "vessel1";
const COMPLIANT_VESSEL: &str = "vessel1 P1";

/// Derived compliance outcome for one result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub vessel_name: String,
    pub issues_detected: i32,
    pub is_compliant: bool,
    pub report_filename: String,
}

pub trait ComplianceRule: Send + Sync {
    /// Violation count recorded when a file is first ingested.
    fn issue_count(&self, original_name: &str) -> i32;

    /// Outcome presented to clients, given the count stored at ingestion.
    fn assess(&self, original_name: &str, stored_issues: i32) -> Assessment;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilenamePatternRule;

impl ComplianceRule for FilenamePatternRule {
    fn issue_count(&self, original_name: &str) -> i32 {
        let lower = original_name.to_lowercase();
        if lower.contains(NON_COMPLIANT_SAMPLE) {
            4
        } else if lower.contains(COMPLIANT_SAMPLE) {
            0
        } else {
            rand::rng().random_range(0..=MAX_RANDOM_ISSUES)
        }
    }

    fn assess(&self, original_name: &str, stored_issues: i32) -> Assessment {
        let lower = original_name.to_lowercase();
        let vessel_name = vessel_name(original_name);
        let vessel_lower = vessel_name.to_lowercase();

        // The name patterns win over whatever count was stored.
        let (issues_detected, is_compliant) = if lower.contains(NON_COMPLIANT_SAMPLE)
            || vessel_lower == NON_COMPLIANT_VESSEL
            || (vessel_lower.contains(NON_COMPLIANT_VESSEL) && !vessel_lower.contains("p1"))
        {
            (4, false)
        } else if lower.contains(COMPLIANT_SAMPLE) || vessel_lower.contains("vessel1 p1") {
            (0, true)
        } else {
            let issues = stored_issues.max(0);
            (issues, issues == 0)
        };

        Assessment {
            report_filename: report_filename(&vessel_name),
            vessel_name,
            issues_detected,
            is_compliant,
        }
    }
}

/// Display label for a file: its name without the extension, unless it is
/// one of the two sample names.
pub fn vessel_name(original_name: &str) -> String {
    let lower = original_name.to_lowercase();
    if lower.contains(NON_COMPLIANT_SAMPLE) {
        NON_COMPLIANT_VESSEL.to_string()
    } else if lower.contains(COMPLIANT_SAMPLE) {
        COMPLIANT_VESSEL.to_string()
    } else {
        strip_extension(original_name).to_string()
    }
}

pub fn report_filename(vessel_name: &str) -> String {
    format!("{}.pdf", vessel_name)
}

/// Drop a trailing `.ext` where `ext` is non-empty and holds no `/` or `.`.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => {
            let ext = &name[idx + 1..];
            if ext.is_empty() || ext.contains('/') {
                name
            } else {
                &name[..idx]
            }
        }
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_count_for_sample_names() {
        let rule = FilenamePatternRule;
        assert_eq!(rule.issue_count("iteration1.png"), 4);
        assert_eq!(rule.issue_count("Report-ITERATION1-final.pdf"), 4);
        assert_eq!(rule.issue_count("iteration2.png"), 0);
        assert_eq!(rule.issue_count("ITERATION2.txt"), 0);
    }

    #[test]
    fn test_issue_count_for_other_names_is_bounded() {
        let rule = FilenamePatternRule;
        for _ in 0..200 {
            let n = rule.issue_count("hull-survey.jpg");
            assert!((0..=MAX_RANDOM_ISSUES).contains(&n));
        }
    }

    #[test]
    fn test_vessel_name() {
        assert_eq!(vessel_name("iteration1.png"), "vessel1");
        assert_eq!(vessel_name("iteration2.png"), "vessel1 P1");
        assert_eq!(vessel_name("readme.txt"), "readme");
        assert_eq!(vessel_name("archive.tar.gz"), "archive.tar");
        assert_eq!(vessel_name("noext"), "noext");
        assert_eq!(vessel_name("trailing."), "trailing.");
        assert_eq!(vessel_name("dir.d/file"), "dir.d/file");
    }

    #[test]
    fn test_assess_non_compliant_sample_overrides_stored_count() {
        let a = FilenamePatternRule.assess("iteration1.png", 0);
        assert_eq!(a.vessel_name, "vessel1");
        assert_eq!(a.issues_detected, 4);
        assert!(!a.is_compliant);
        assert_eq!(a.report_filename, "vessel1.pdf");
    }

    #[test]
    fn test_assess_compliant_sample_overrides_stored_count() {
        let a = FilenamePatternRule.assess("iteration2.png", 3);
        assert_eq!(a.vessel_name, "vessel1 P1");
        assert_eq!(a.issues_detected, 0);
        assert!(a.is_compliant);
        assert_eq!(a.report_filename, "vessel1 P1.pdf");
    }

    #[test]
    fn test_assess_vessel_names_match_patterns_too() {
        let a = FilenamePatternRule.assess("Vessel1.jpg", 0);
        assert_eq!(a.issues_detected, 4);
        assert!(!a.is_compliant);

        let b = FilenamePatternRule.assess("vessel1 p1.jpg", 2);
        assert_eq!(b.issues_detected, 0);
        assert!(b.is_compliant);
    }

    #[test]
    fn test_assess_other_names_use_stored_count() {
        let a = FilenamePatternRule.assess("readme.txt", 2);
        assert_eq!(a.vessel_name, "readme");
        assert_eq!(a.issues_detected, 2);
        assert!(!a.is_compliant);
        assert_eq!(a.report_filename, "readme.pdf");

        let b = FilenamePatternRule.assess("Unknown", 0);
        assert!(b.is_compliant);
        assert_eq!(b.report_filename, "Unknown.pdf");
    }
}
