//! Groove cross-section area table and configuration matching.
//!
//! Each entry holds two quadratics in plate thickness, one for the inside
//! groove and one for the outside groove, fitted per joint configuration.
//! Requests that do not hit an entry exactly are served by the nearest entry
//! in (inside angle, outside angle, root gap) space.

use std::cmp::Ordering;
use std::fmt;

/// Area in mm² taken up by the pre-deposited seal bead on sealed joints.
pub const SEAL_AREA_MM2: f64 = 15.0;

/// Configuration used when no entry shares the requested seal flag.
pub const DEFAULT_KEY: ConfigurationKey = ConfigurationKey::new(80, 80, 8, false);

/// Joint configuration: rounded angles and gap, plus the seal flag.
///
/// Ordering is lexicographic over the fields in declaration order, which is
/// the canonical table order used for tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigurationKey {
    pub inside_angle: i32,
    pub outside_angle: i32,
    pub root_gap: i32,
    pub seal: bool,
}

impl ConfigurationKey {
    pub const fn new(inside_angle: i32, outside_angle: i32, root_gap: i32, seal: bool) -> Self {
        Self {
            inside_angle,
            outside_angle,
            root_gap,
            seal,
        }
    }

    /// Key for raw request values, rounded to the nearest degree / mm.
    pub fn from_dimensions(inside_angle: f64, outside_angle: f64, root_gap: f64, seal: bool) -> Self {
        Self::new(
            inside_angle.round() as i32,
            outside_angle.round() as i32,
            root_gap.round() as i32,
            seal,
        )
    }

    /// Squared Euclidean distance over angles and gap. The seal flag is not
    /// part of the space.
    fn distance_squared(&self, other: &Self) -> f64 {
        let di = f64::from(self.inside_angle) - f64::from(other.inside_angle);
        let do_ = f64::from(self.outside_angle) - f64::from(other.outside_angle);
        let dg = f64::from(self.root_gap) - f64::from(other.root_gap);
        di * di + do_ * do_ + dg * dg
    }
}

impl fmt::Display for ConfigurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.inside_angle, self.outside_angle, self.root_gap)?;
        if self.seal {
            write!(f, "-in")?;
        }
        Ok(())
    }
}

/// `a·t² + b·t + c`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadratic {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Quadratic {
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    pub fn eval(&self, t: f64) -> f64 {
        self.a * t * t + self.b * t + self.c
    }

    pub fn coefficients(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }
}

/// One row of the area table.
#[derive(Debug, Clone, Copy)]
pub struct AreaFormulaEntry {
    pub key: ConfigurationKey,
    pub inside: Quadratic,
    pub outside: Quadratic,
}

impl AreaFormulaEntry {
    /// Inside groove area in mm². Sealed joints lose the seal bead area.
    pub fn inside_area(&self, thickness: f64) -> f64 {
        let area = self.inside.eval(thickness);
        if self.key.seal {
            area - SEAL_AREA_MM2
        } else {
            area
        }
    }

    /// Outside groove area in mm².
    pub fn outside_area(&self, thickness: f64) -> f64 {
        self.outside.eval(thickness)
    }
}

const fn entry(
    key: (i32, i32, i32, bool),
    inside: (f64, f64, f64),
    outside: (f64, f64, f64),
) -> AreaFormulaEntry {
    AreaFormulaEntry {
        key: ConfigurationKey::new(key.0, key.1, key.2, key.3),
        inside: Quadratic::new(inside.0, inside.1, inside.2),
        outside: Quadratic::new(outside.0, outside.1, outside.2),
    }
}

/// Fitted area formulas, sorted by key.
///
/// Sealed rows share coefficients with their unsealed counterpart.
pub static AREA_FORMULAS: &[AreaFormulaEntry] = &[
    entry((50, 60, 3, false), (0.1172, -0.6418, 9.5), (0.1436, -0.8125, 11.2)),
    entry((60, 60, 4, false), (0.1451, -0.9034, 13.6), (0.1451, -0.9034, 13.6)),
    entry((60, 70, 3, false), (0.1438, -0.7216, 22.4), (0.1762, -1.0341, 18.7)),
    entry((60, 70, 3, true), (0.1438, -0.7216, 22.4), (0.1762, -1.0341, 18.7)),
    entry((60, 70, 4, false), (0.1446, -0.8127, 24.8), (0.1771, -1.1054, 20.3)),
    entry((60, 70, 4, true), (0.1446, -0.8127, 24.8), (0.1771, -1.1054, 20.3)),
    entry((60, 70, 5, false), (0.1459, -0.8862, 27.5), (0.1783, -1.1769, 22.6)),
    entry((60, 70, 5, true), (0.1459, -0.8862, 27.5), (0.1783, -1.1769, 22.6)),
    entry((70, 70, 5, false), (0.1759, -1.2148, 18.4), (0.1759, -1.2148, 18.4)),
    entry((70, 80, 6, false), (0.1768, -1.3021, 19.1), (0.2087, -1.5874, 19.6)),
    entry((80, 80, 6, false), (0.2081, -1.5412, 17.8), (0.2081, -1.5412, 17.8)),
    entry((80, 80, 8, false), (0.2098, -1.6782, 20.0), (0.2098, -1.6782, 20.0)),
    entry((80, 80, 10, false), (0.2115, -1.7346, 24.6), (0.2115, -1.7346, 24.6)),
    entry((90, 90, 8, false), (0.2493, -2.0215, 21.7), (0.2493, -2.0215, 21.7)),
    entry((90, 90, 10, false), (0.2511, -2.0873, 26.3), (0.2511, -2.0873, 26.3)),
];

/// How the request was matched against the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigMatch {
    Exact(ConfigurationKey),
    Nearest {
        requested: ConfigurationKey,
        selected: ConfigurationKey,
        distance: f64,
    },
    /// No entry shares the seal flag; the default configuration was used.
    Default {
        requested: ConfigurationKey,
    },
}

impl ConfigMatch {
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }

    /// Key whose formulas were evaluated.
    pub fn selected(&self) -> ConfigurationKey {
        match *self {
            Self::Exact(key) => key,
            Self::Nearest { selected, .. } => selected,
            Self::Default { .. } => DEFAULT_KEY,
        }
    }

    /// Label reported to clients.
    pub fn label(&self) -> String {
        match self {
            Self::Exact(key) => key.to_string(),
            Self::Nearest { requested, selected, .. } => {
                format!("{selected} (nearest to {requested})")
            }
            Self::Default { requested } => format!("{DEFAULT_KEY} (default for {requested})"),
        }
    }
}

/// Resolved groove areas for one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrooveAreas {
    pub inside: f64,
    pub outside: f64,
    pub matched: ConfigMatch,
}

/// Table lookup by exact key.
pub fn find(key: &ConfigurationKey) -> Option<&'static AreaFormulaEntry> {
    find_in(AREA_FORMULAS, key)
}

fn find_in<'a>(table: &'a [AreaFormulaEntry], key: &ConfigurationKey) -> Option<&'a AreaFormulaEntry> {
    table
        .binary_search_by(|entry| entry.key.cmp(key))
        .ok()
        .map(|idx| &table[idx])
}

/// Entry closest to `key` among those with the same seal flag. The first
/// minimum in table order wins.
fn nearest_in<'a>(
    table: &'a [AreaFormulaEntry],
    key: &ConfigurationKey,
) -> Option<(&'a AreaFormulaEntry, f64)> {
    table
        .iter()
        .filter(|entry| entry.key.seal == key.seal)
        .map(|entry| (entry, entry.key.distance_squared(key)))
        .fold(None, |best, (entry, d2)| match best {
            Some((_, best_d2)) if d2.partial_cmp(&best_d2) != Some(Ordering::Less) => best,
            _ => Some((entry, d2)),
        })
        .map(|(entry, d2)| (entry, d2.sqrt()))
}

/// Groove areas for a joint at the given thickness.
pub fn resolve(
    inside_angle: f64,
    outside_angle: f64,
    root_gap: f64,
    thickness: f64,
    seal: bool,
) -> GrooveAreas {
    resolve_in(
        AREA_FORMULAS,
        ConfigurationKey::from_dimensions(inside_angle, outside_angle, root_gap, seal),
        thickness,
    )
}

fn resolve_in(table: &[AreaFormulaEntry], requested: ConfigurationKey, thickness: f64) -> GrooveAreas {
    let (entry, matched) = if let Some(entry) = find_in(table, &requested) {
        tracing::debug!(config = %requested, "exact area formula match");
        (entry, ConfigMatch::Exact(requested))
    } else if let Some((entry, distance)) = nearest_in(table, &requested) {
        tracing::info!(
            requested = %requested,
            selected = %entry.key,
            distance,
            "no exact area formula, using nearest configuration"
        );
        let matched = ConfigMatch::Nearest {
            requested,
            selected: entry.key,
            distance,
        };
        (entry, matched)
    } else {
        tracing::warn!(requested = %requested, "no configuration with matching seal flag");
        (&DEFAULT_ENTRY, ConfigMatch::Default { requested })
    };

    GrooveAreas {
        inside: entry.inside_area(thickness),
        outside: entry.outside_area(thickness),
        matched,
    }
}

/// Formulas for [`DEFAULT_KEY`], kept apart from the table so the fallback
/// never depends on its contents.
static DEFAULT_ENTRY: AreaFormulaEntry =
    entry((80, 80, 8, false), (0.2098, -1.6782, 20.0), (0.2098, -1.6782, 20.0));

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_table_sorted_and_unique() {
        for pair in AREA_FORMULAS.windows(2) {
            assert!(pair[0].key < pair[1].key, "{} !< {}", pair[0].key, pair[1].key);
        }
    }

    #[test]
    fn test_table_contains_default_key() {
        let entry = find(&DEFAULT_KEY).unwrap();
        assert_eq!(entry.inside, DEFAULT_ENTRY.inside);
        assert_eq!(entry.outside, DEFAULT_ENTRY.outside);
    }

    #[test]
    fn test_areas_positive_for_positive_thickness() {
        for entry in AREA_FORMULAS {
            for t in [1.0, 4.0, 10.0, 40.0, 80.0] {
                assert!(entry.inside_area(t) > 0.0, "{} inside at {t}", entry.key);
                assert!(entry.outside_area(t) > 0.0, "{} outside at {t}", entry.key);
            }
        }
    }

    #[test]
    fn test_exact_match_80_80_8() {
        let areas = resolve(80.0, 80.0, 8.0, 40.0, false);

        assert!(approx(areas.inside, 288.552));
        assert!(approx(areas.outside, 288.552));
        assert!(areas.matched.is_exact());
        assert_eq!(areas.matched.label(), "80-80-8");
    }

    #[test]
    fn test_inputs_rounded_before_lookup() {
        let areas = resolve(79.6, 80.4, 7.5, 40.0, false);

        assert!(areas.matched.is_exact());
        assert_eq!(areas.matched.selected(), DEFAULT_KEY);
    }

    #[test]
    fn test_nearest_match_75_75_8() {
        let areas = resolve(75.0, 75.0, 8.0, 40.0, false);

        match areas.matched {
            ConfigMatch::Nearest { requested, selected, distance } => {
                assert_eq!(requested, ConfigurationKey::new(75, 75, 8, false));
                assert_eq!(selected, DEFAULT_KEY);
                assert!(approx(distance, 50f64.sqrt()));
            }
            other => panic!("expected nearest match, got {other:?}"),
        }
        let label = areas.matched.label();
        assert!(label.contains("nearest"));
        assert!(label.contains("75-75-8"));
        assert!(label.contains("80-80-8"));
        assert!(approx(areas.inside, 288.552));
    }

    #[test]
    fn test_nearest_respects_seal_flag() {
        // 80-80-8 is closer, but only sealed rows are candidates.
        let areas = resolve(80.0, 80.0, 8.0, 40.0, true);

        assert_eq!(areas.matched.selected(), ConfigurationKey::new(60, 70, 5, true));
        assert!(!areas.matched.is_exact());
    }

    #[test]
    fn test_seal_variant_subtracts_seal_area() {
        let plain = resolve(60.0, 70.0, 3.0, 31.4, false);
        let sealed = resolve(60.0, 70.0, 3.0, 31.4, true);

        assert!(sealed.matched.is_exact());
        assert_eq!(sealed.matched.label(), "60-70-3-in");
        assert!(approx(plain.inside - sealed.inside, SEAL_AREA_MM2));
        assert!(approx(plain.outside, sealed.outside));
    }

    #[test]
    fn test_tie_broken_by_table_order() {
        // 60-70-4 is equidistant from 60-70-3 and 60-70-5.
        let table = [
            entry((60, 70, 3, false), (0.1, 0.0, 1.0), (0.1, 0.0, 1.0)),
            entry((60, 70, 5, false), (0.2, 0.0, 2.0), (0.2, 0.0, 2.0)),
        ];
        let areas = resolve_in(&table, ConfigurationKey::new(60, 70, 4, false), 10.0);

        assert_eq!(areas.matched.selected(), ConfigurationKey::new(60, 70, 3, false));
        assert!(approx(areas.inside, 11.0));
    }

    #[test]
    fn test_default_when_no_seal_candidates() {
        let table = [entry((60, 70, 3, false), (0.1, 0.0, 1.0), (0.1, 0.0, 1.0))];
        let areas = resolve_in(&table, ConfigurationKey::new(60, 70, 3, true), 40.0);

        assert_eq!(areas.matched, ConfigMatch::Default {
            requested: ConfigurationKey::new(60, 70, 3, true),
        });
        assert_eq!(areas.matched.label(), "80-80-8 (default for 60-70-3-in)");
        assert!(approx(areas.inside, 288.552));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(ConfigurationKey::new(60, 70, 3, true).to_string(), "60-70-3-in");
        assert_eq!(ConfigurationKey::new(80, 80, 10, false).to_string(), "80-80-10");
    }
}
