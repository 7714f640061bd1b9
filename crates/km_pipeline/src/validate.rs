//! crates/km_pipeline/src/validate.rs
//! Semantic validation before any computation. The dataset's structural
//! invariants are already enforced by km_core/km_io; this pass checks params
//! against the profile and flags inputs that are valid but likely unintended.

use km_core::{Method, Params, PreferenceProfile, WeightScheme};

/// Above this many alternatives the cubic assignment step gets slow.
pub const LARGE_PROFILE_ALTERNATIVES: usize = 500;

/// Issue severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Where the issue occurred.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityRef {
    Root,
    Param(&'static str),
}

/// One validation finding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub where_: EntityRef,
}

/// Deterministic report: pass = (no Error); ordering of issues is stable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub pass: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn first_error_message(&self) -> String {
        self.errors()
            .next()
            .map(|i| format!("{}: {}", i.code, i.message))
            .unwrap_or_default()
    }
}

/// Top-level entry point.
pub fn validate(profile: &PreferenceProfile, params: &Params) -> ValidationReport {
    let mut issues = Vec::new();
    issues.extend(check_param_domains(params));
    issues.extend(check_params_vs_profile(profile, params));
    issues.extend(check_profile_size(profile));

    let pass = !issues.iter().any(|i| i.severity == Severity::Error);
    ValidationReport { pass, issues }
}

fn check_param_domains(params: &Params) -> Vec<ValidationIssue> {
    match params.validate() {
        Ok(()) => Vec::new(),
        Err(e) => vec![ValidationIssue {
            severity: Severity::Error,
            code: "params.domain",
            message: e.to_string(),
            where_: EntityRef::Root,
        }],
    }
}

fn check_params_vs_profile(profile: &PreferenceProfile, params: &Params) -> Vec<ValidationIssue> {
    let mut out = Vec::new();
    let m = profile.alternative_count();

    if params.method != Method::PositionWeighted && params.weighting != WeightScheme::Uniform {
        out.push(ValidationIssue {
            severity: Severity::Warning,
            code: "params.unused_weighting",
            message: format!(
                "weighting '{}' is ignored by method '{}'",
                params.weighting, params.method
            ),
            where_: EntityRef::Param("weighting"),
        });
    }

    if params.method == Method::PositionWeighted
        && params.weighting == WeightScheme::TopK
        && params.top_k as usize >= m
    {
        out.push(ValidationIssue {
            severity: Severity::Warning,
            code: "params.top_k_covers_all",
            message: format!("top_k={} ≥ {m} alternatives; equivalent to uniform weighting", params.top_k),
            where_: EntityRef::Param("top_k"),
        });
    }
    out
}

fn check_profile_size(profile: &PreferenceProfile) -> Vec<ValidationIssue> {
    let m = profile.alternative_count();
    if m > LARGE_PROFILE_ALTERNATIVES {
        vec![ValidationIssue {
            severity: Severity::Warning,
            code: "profile.large",
            message: format!("{m} alternatives; assignment cost grows as m³"),
            where_: EntityRef::Root,
        }]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use km_core::{Alternative, Ranking, RankingEntry};

    fn profile(m: usize) -> PreferenceProfile {
        let alts: Vec<Alternative> = (0..m).map(|i| format!("a{i}").parse().unwrap()).collect();
        let e = RankingEntry::new(Ranking::from_order(alts).unwrap(), 1).unwrap();
        PreferenceProfile::new(vec![e]).unwrap()
    }

    #[test]
    fn defaults_pass_cleanly() {
        let r = validate(&profile(3), &Params::default());
        assert!(r.pass);
        assert!(r.issues.is_empty());
    }

    #[test]
    fn bad_alpha_fails() {
        let p = Params { alpha: f64::INFINITY, ..Params::default() };
        let r = validate(&profile(3), &p);
        assert!(!r.pass);
        assert!(r.first_error_message().starts_with("params.domain"));
    }

    #[test]
    fn unused_weighting_and_wide_top_k_warn() {
        let p = Params { weighting: WeightScheme::Linear, ..Params::default() };
        let r = validate(&profile(3), &p);
        assert!(r.pass);
        assert_eq!(r.issues[0].code, "params.unused_weighting");

        let p = Params {
            method: Method::PositionWeighted,
            weighting: WeightScheme::TopK,
            top_k: 3,
            ..Params::default()
        };
        let r = validate(&profile(3), &p);
        assert!(r.pass);
        assert_eq!(r.issues[0].where_, EntityRef::Param("top_k"));
    }
}
