//! # Version Parsing and Derivation
//!
//! This module is the version engine of `verstamp`: it turns one free-form
//! version token into the family of version strings the different file kinds
//! consume.
//!
//! ## Process
//!
//! 1.  **Parsing**: The input token is matched against the grammar
//!     `MAJOR.MINOR.BUILD[.REVISION][-SUFFIX]` and decomposed into
//!     [`VersionComponents`]. Malformed input yields `None`, never a panic;
//!     the caller aborts the run with a distinct exit code.
//!
//! 2.  **Suffix Normalization**: A raw pre-release suffix is canonicalized
//!     into one of a fixed set of labels plus an optional numeric qualifier.
//!     `pre-alpha`/`pre-beta` lose their hyphen; an unrecognized token falls
//!     back to plain `alpha` with no number. The fallback is deliberately
//!     lossy and is documented behavior, not an error.
//!
//! 3.  **Derivation**: Components and normalized suffix are rendered into a
//!     [`DerivedVersionSet`] holding the four textual variants (release,
//!     package, file, assembly). The set is computed once per run and shared
//!     read-only across every target file.

use std::fmt;
use std::sync::LazyLock;

use log::warn;
use regex::Regex;

/// Matches the `MAJOR.MINOR.BUILD[.REVISION][-SUFFIX]` grammar.
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<major>\d+)\.(?<minor>\d+)\.(?<build>\d+)(?:\.(?<revision>\d+))?(?:-(?<suffix>[0-9A-Za-z]+))?$")
        .expect("invalid version grammar pattern")
});

/// Matches a recognized pre-release suffix token with optional trailing digits.
static SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?<label>alpha|beta|prealpha|prebeta|pre-alpha|pre-beta)(?<number>\d*)$")
        .expect("invalid suffix pattern")
});

/// The structured components of a parsed version string.
///
/// `major`, `minor` and `build` are always present; `revision` only when the
/// input supplied four numeric segments, `raw_suffix` only when a `-suffix`
/// was present. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionComponents {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub revision: Option<u32>,
    pub raw_suffix: Option<String>,
}

impl VersionComponents {
    /// Parse a version token into components.
    ///
    /// Returns `None` if the token is empty, has fewer than three numeric
    /// segments, or any segment fails to parse as a non-negative integer.
    pub fn parse(input: &str) -> Option<VersionComponents> {
        let captures = VERSION_RE.captures(input.trim())?;

        // The grammar guarantees digit runs, but a run longer than u32 still
        // has to be rejected rather than wrapped.
        let major = captures["major"].parse().ok()?;
        let minor = captures["minor"].parse().ok()?;
        let build = captures["build"].parse().ok()?;

        let revision = match captures.name("revision") {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };

        let raw_suffix = captures.name("suffix").map(|m| m.as_str().to_string());

        Some(VersionComponents {
            major,
            minor,
            build,
            revision,
            raw_suffix,
        })
    }
}

/// The closed set of recognized pre-release labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixLabel {
    Alpha,
    Beta,
    PreAlpha,
    PreBeta,
}

impl SuffixLabel {
    /// The canonical textual form (hyphens in `pre-alpha`/`pre-beta` are
    /// canonicalized away).
    pub fn as_str(&self) -> &'static str {
        match self {
            SuffixLabel::Alpha => "alpha",
            SuffixLabel::Beta => "beta",
            SuffixLabel::PreAlpha => "prealpha",
            SuffixLabel::PreBeta => "prebeta",
        }
    }
}

impl fmt::Display for SuffixLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canonicalized pre-release suffix: a label plus an optional numeric
/// qualifier (`beta7` -> `Beta`, `7`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSuffix {
    pub label: SuffixLabel,
    pub number: Option<u32>,
}

impl NormalizedSuffix {
    /// Canonicalize a raw suffix token.
    ///
    /// - absent or blank -> `None`
    /// - recognized label with optional trailing digits -> that label + digits
    /// - anything else -> `Alpha` with no number (lossy fallback; the
    ///   original token is discarded)
    pub fn normalize(raw: Option<&str>) -> Option<NormalizedSuffix> {
        let raw = raw?.trim();
        if raw.is_empty() {
            return None;
        }

        if let Some(captures) = SUFFIX_RE.captures(raw) {
            let label = match captures["label"].to_ascii_lowercase().as_str() {
                "alpha" => SuffixLabel::Alpha,
                "beta" => SuffixLabel::Beta,
                "prealpha" | "pre-alpha" => SuffixLabel::PreAlpha,
                _ => SuffixLabel::PreBeta,
            };
            let digits = &captures["number"];
            let number = if digits.is_empty() {
                None
            } else {
                match digits.parse() {
                    Ok(number) => Some(number),
                    Err(_) => {
                        warn!("suffix qualifier {digits} exceeds the numeric range; dropping it");
                        None
                    }
                }
            };
            Some(NormalizedSuffix { label, number })
        } else {
            Some(NormalizedSuffix {
                label: SuffixLabel::Alpha,
                number: None,
            })
        }
    }

    /// Render as a version-string fragment with the leading separator, e.g.
    /// `-beta7`. An absent suffix renders as the empty string.
    fn render(suffix: Option<&NormalizedSuffix>) -> String {
        match suffix {
            Some(s) => match s.number {
                Some(n) => format!("-{}{}", s.label, n),
                None => format!("-{}", s.label),
            },
            None => String::new(),
        }
    }
}

/// The four textual version renderings consumed by the file adapters.
///
/// Built once per invocation and reused for every target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedVersionSet {
    /// Suffix-augmented triplet, never a revision. The primary field in
    /// Release mode.
    pub release: String,
    /// Triplet, revision (defaulting to 0) and suffix. The primary field
    /// outside Release mode and the package-manifest version.
    pub package: String,
    /// Numeric-only file version (no suffix).
    pub file: String,
    /// Numeric-only assembly version; the fourth segment is forced to `0`
    /// so assembly binding does not break on every build.
    pub assembly: String,
}

impl DerivedVersionSet {
    /// Render all four variants from parsed components.
    ///
    /// With `no_revision` set, the fourth numeric segment is omitted from
    /// every rendering.
    pub fn derive(components: &VersionComponents, no_revision: bool) -> DerivedVersionSet {
        let suffix = NormalizedSuffix::normalize(components.raw_suffix.as_deref());
        let suffix = NormalizedSuffix::render(suffix.as_ref());

        let triplet = format!(
            "{}.{}.{}",
            components.major, components.minor, components.build
        );
        let revision = components.revision.unwrap_or(0);

        DerivedVersionSet {
            release: format!("{triplet}{suffix}"),
            package: if no_revision {
                format!("{triplet}{suffix}")
            } else {
                format!("{triplet}.{revision}{suffix}")
            },
            file: if no_revision {
                triplet.clone()
            } else {
                format!("{triplet}.{revision}")
            },
            assembly: if no_revision {
                triplet.clone()
            } else {
                format!("{triplet}.0")
            },
        }
    }
}
