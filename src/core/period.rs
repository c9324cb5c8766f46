use serde::{Deserialize, Serialize};

/// Built-in period presets understood by the reserved `period` filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PeriodPreset {
    /// Inclusive 2015..=2019.
    PreCovid,
    /// 2020 onwards.
    Since2020,
}

impl PeriodPreset {
    /// Parses a preset label. Returns `None` for unrecognized labels.
    ///
    /// Callers treat labels containing `All` as a no-op before parsing.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        let compact: String = label
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == '–' || c == '—' { '-' } else { c })
            .collect();
        match compact.as_str() {
            "2015-2019" => Some(Self::PreCovid),
            ">=2020" | "≥2020" | "2020+" | "2020-" => Some(Self::Since2020),
            _ => None,
        }
    }

    /// Inclusive numeric year range covered by the preset.
    #[must_use]
    pub const fn year_range(self) -> (f64, f64) {
        match self {
            Self::PreCovid => (2015.0, 2019.0),
            Self::Since2020 => (2020.0, f64::INFINITY),
        }
    }

    #[must_use]
    pub fn contains(self, year: f64) -> bool {
        let (start, end) = self.year_range();
        year >= start && year <= end
    }
}

/// Returns true when the preset label disables period narrowing.
#[must_use]
pub fn is_unbounded_period(label: &str) -> bool {
    label.contains("All")
}
