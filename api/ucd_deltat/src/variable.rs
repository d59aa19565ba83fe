use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

/// Season of the year, in the order the chart and dropdowns list them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    pub fn name(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayPeriod {
    Day,
    Night,
}

impl DayPeriod {
    pub fn name(&self) -> &'static str {
        match self {
            DayPeriod::Day => "Day",
            DayPeriod::Night => "Night",
        }
    }
}

/// One of the eight seasonal ΔT mean columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeltaTVariable {
    pub season: Season,
    pub period: DayPeriod,
}

impl DeltaTVariable {
    /// Dropdown order
    pub const ALL: [DeltaTVariable; 8] = [
        DeltaTVariable::new(Season::Winter, DayPeriod::Day),
        DeltaTVariable::new(Season::Winter, DayPeriod::Night),
        DeltaTVariable::new(Season::Spring, DayPeriod::Day),
        DeltaTVariable::new(Season::Spring, DayPeriod::Night),
        DeltaTVariable::new(Season::Summer, DayPeriod::Day),
        DeltaTVariable::new(Season::Summer, DayPeriod::Night),
        DeltaTVariable::new(Season::Fall, DayPeriod::Day),
        DeltaTVariable::new(Season::Fall, DayPeriod::Night),
    ];

    pub const fn new(season: Season, period: DayPeriod) -> Self {
        Self { season, period }
    }

    /// Attribute / column name used by both datasets
    pub fn key(&self) -> &'static str {
        match (self.season, self.period) {
            (Season::Winter, DayPeriod::Day) => "DeltaT_Winter_Day_mean",
            (Season::Winter, DayPeriod::Night) => "DeltaT_Winter_Night_mean",
            (Season::Spring, DayPeriod::Day) => "DeltaT_Spring_Day_mean",
            (Season::Spring, DayPeriod::Night) => "DeltaT_Spring_Night_mean",
            (Season::Summer, DayPeriod::Day) => "DeltaT_Summer_Day_mean",
            (Season::Summer, DayPeriod::Night) => "DeltaT_Summer_Night_mean",
            (Season::Fall, DayPeriod::Day) => "DeltaT_Fall_Day_mean",
            (Season::Fall, DayPeriod::Night) => "DeltaT_Fall_Night_mean",
        }
    }

    /// Human readable label, e.g. "Summer (Night)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.season.name(), self.period.name())
    }

    /// Position in [`DeltaTVariable::ALL`]
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|v| v == self).unwrap_or_default()
    }
}

impl Default for DeltaTVariable {
    fn default() -> Self {
        Self::new(Season::Summer, DayPeriod::Night)
    }
}

impl fmt::Display for DeltaTVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DeltaTVariable {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.key() == s)
            .ok_or_else(|| anyhow!("Unknown ΔT variable: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_is_summer_night() {
        assert_eq!(DeltaTVariable::default().key(), "DeltaT_Summer_Night_mean");
        assert_eq!(DeltaTVariable::default().index(), 5);
    }

    #[test]
    fn test_keys_are_distinct_and_parse_back() {
        for variable in DeltaTVariable::ALL {
            assert_eq!(variable.key().parse::<DeltaTVariable>().unwrap(), variable);
        }
        let keys: HashSet<_> = DeltaTVariable::ALL.iter().map(|v| v.key()).collect();
        assert_eq!(keys.len(), 8);
    }

    #[test]
    fn test_labels() {
        assert_eq!(DeltaTVariable::ALL[0].label(), "Winter (Day)");
        assert_eq!(DeltaTVariable::ALL[7].label(), "Fall (Night)");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!("DeltaT_Monsoon_Day_mean".parse::<DeltaTVariable>().is_err());
        assert!("deltat_summer_night_mean".parse::<DeltaTVariable>().is_err());
    }
}
