//! Trail filter engine.
//!
//! Filtering is a pure, order-preserving selection over a sequence of trails.
//! A [`TrailFilter`] is compiled once from [`FilterParams`] and can then be
//! applied to any sequence of trail references, including an earlier result.
//!
//! # Example
//!
//! ```
//! use trailfinder::catalog::default_trails;
//! use trailfinder::filter::{DifficultyFilter, FilterParams, TrailFilter};
//! use trailfinder::trail::Difficulty;
//!
//! let trails = default_trails();
//! let params = FilterParams {
//!     difficulty: DifficultyFilter::Only(Difficulty::Hard),
//!     ..FilterParams::default()
//! };
//!
//! let visible = TrailFilter::new(params).apply(&trails);
//! assert_eq!(visible.len(), 2);
//! ```

use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::Error;
use crate::trail::{Difficulty, Trail};

/// Upper end of the gain selector when nothing narrows it.
pub const DEFAULT_GAIN_MAX_M: f64 = 1500.0;

/// Upper end of the altitude selector when nothing narrows it.
pub const DEFAULT_ALTITUDE_MAX_M: f64 = 4000.0;

/// Difficulty selector: every grade, or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DifficultyFilter {
    /// No difficulty restriction.
    #[default]
    All,
    /// Only trails of this grade.
    Only(Difficulty),
}

impl DifficultyFilter {
    /// Whether a trail of the given grade passes.
    #[must_use]
    pub fn admits(self, difficulty: Difficulty) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == difficulty,
        }
    }
}

impl std::fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(d) => d.fmt(f),
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl From<Difficulty> for DifficultyFilter {
    fn from(difficulty: Difficulty) -> Self {
        Self::Only(difficulty)
    }
}

/// What the altitude check does with a trail lacking highest/lowest data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingAltitude {
    /// The altitude check is skipped for that trail.
    Pass,
    /// The trail fails the altitude check.
    #[default]
    Reject,
}

/// An inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound, inclusive.
    pub min: f64,
    /// Upper bound, inclusive.
    pub max: f64,
}

impl Bounds {
    /// Create a range.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies within the range. An inverted range holds nothing.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// The full set of selectors that decide which trails are visible.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    /// Free-text query matched against name, location and description.
    pub query: String,
    /// Difficulty selector.
    pub difficulty: DifficultyFilter,
    /// Accepted elevation gain in metres.
    pub gain: Bounds,
    /// Accepted altitude window in metres.
    pub altitude: Bounds,
    /// Handling of trails without altitude data.
    pub missing_altitude: MissingAltitude,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self::widest(DEFAULT_GAIN_MAX_M, DEFAULT_ALTITUDE_MAX_M)
    }
}

impl FilterParams {
    /// Parameters that admit every consistent trail within the given maxima.
    #[must_use]
    pub fn widest(gain_max_m: f64, altitude_max_m: f64) -> Self {
        Self {
            query: String::new(),
            difficulty: DifficultyFilter::All,
            gain: Bounds::new(0.0, gain_max_m),
            altitude: Bounds::new(0.0, altitude_max_m),
            missing_altitude: MissingAltitude::default(),
        }
    }

    /// Clear the query and widen every selector back to the given maxima.
    ///
    /// The missing-altitude policy is configuration, not a selector, so it
    /// survives a reset.
    pub fn reset(&mut self, gain_max_m: f64, altitude_max_m: f64) {
        let policy = self.missing_altitude;
        *self = Self::widest(gain_max_m, altitude_max_m);
        self.missing_altitude = policy;
    }

    /// The query as it is matched: trimmed, empty when blank.
    #[must_use]
    pub fn normalized_query(&self) -> &str {
        self.query.trim()
    }
}

/// Text matcher compiled from the query.
#[derive(Debug)]
enum QueryMatcher {
    /// Blank query, everything matches.
    Any,
    /// Escaped literal, case-insensitive.
    Pattern(Regex),
    /// Lowercased literal, used if the pattern cannot be compiled.
    Folded(String),
}

impl QueryMatcher {
    fn compile(query: &str) -> Self {
        if query.is_empty() {
            return Self::Any;
        }

        match RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Self::Pattern(regex),
            Err(e) => {
                warn!(error = %e, "Query too large for pattern matching, using plain search");
                Self::Folded(query.to_lowercase())
            }
        }
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Pattern(regex) => regex.is_match(text),
            Self::Folded(needle) => text.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// A compiled, reusable trail filter.
#[derive(Debug)]
pub struct TrailFilter {
    params: FilterParams,
    matcher: QueryMatcher,
}

impl TrailFilter {
    /// Compile a filter from its parameters.
    #[must_use]
    pub fn new(params: FilterParams) -> Self {
        let matcher = QueryMatcher::compile(params.normalized_query());
        Self { params, matcher }
    }

    /// The parameters this filter was built from.
    #[must_use]
    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// Whether a single trail passes every predicate.
    #[must_use]
    pub fn matches(&self, trail: &Trail) -> bool {
        self.matches_text(trail)
            && self.params.difficulty.admits(trail.difficulty)
            && self.params.gain.contains(trail.elevation_gain_m)
            && self.matches_altitude(trail)
    }

    /// Select the passing trails, keeping their relative order.
    pub fn apply<'a, I>(&self, trails: I) -> Vec<&'a Trail>
    where
        I: IntoIterator<Item = &'a Trail>,
    {
        let visible: Vec<&Trail> = trails.into_iter().filter(|t| self.matches(t)).collect();
        debug!(
            visible = visible.len(),
            difficulty = %self.params.difficulty,
            "Filtered trails"
        );
        visible
    }

    fn matches_text(&self, trail: &Trail) -> bool {
        self.matcher.is_match(&trail.name)
            || self.matcher.is_match(&trail.location)
            || self.matcher.is_match(&trail.description)
    }

    fn matches_altitude(&self, trail: &Trail) -> bool {
        let Some((lowest, highest)) = trail.altitude_bounds() else {
            trace!(trail = %trail.id, policy = ?self.params.missing_altitude, "No altitude data");
            return self.params.missing_altitude == MissingAltitude::Pass;
        };

        highest >= self.params.altitude.min
            && lowest <= self.params.altitude.max
            && highest >= lowest
    }
}

/// Filter `trails` with `params` in one step.
pub fn filter_trails<'a, I>(trails: I, params: &FilterParams) -> Vec<&'a Trail>
where
    I: IntoIterator<Item = &'a Trail>,
{
    TrailFilter::new(params.clone()).apply(trails)
}
