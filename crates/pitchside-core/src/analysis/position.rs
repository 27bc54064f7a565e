// Per-position averages of a selectable player metric.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::analysis::{mean, round_to};
use crate::dataset::PlayerRecord;

/// Metric the teams page can average by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Feature {
    Wage,
    Age,
    Overall,
    Height,
    Weight,
    Value,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::Wage,
        Feature::Age,
        Feature::Overall,
        Feature::Height,
        Feature::Weight,
        Feature::Value,
    ];

    /// Column label, as the source export names it.
    pub fn label(self) -> &'static str {
        match self {
            Feature::Wage => "Wage(£)",
            Feature::Age => "Age",
            Feature::Overall => "Overall",
            Feature::Height => "Height(m.)",
            Feature::Weight => "Weight(Kg.)",
            Feature::Value => "Value(£)",
        }
    }

    pub fn of(self, player: &PlayerRecord) -> Option<f64> {
        match self {
            Feature::Wage => Some(player.wage),
            Feature::Age => player.age.map(f64::from),
            Feature::Overall => Some(f64::from(player.overall)),
            Feature::Height => Some(player.height_m),
            Feature::Weight => Some(player.weight_kg),
            Feature::Value => Some(player.value),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feature '{0}' (expected one of: wage, age, overall, height, weight, value)")]
pub struct UnknownFeature(pub String);

impl FromStr for Feature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Feature::ALL
            .into_iter()
            .find(|f| {
                let label = f.label().to_ascii_lowercase();
                label == wanted || label.split('(').next() == Some(wanted.as_str())
            })
            .ok_or_else(|| UnknownFeature(s.to_string()))
    }
}

/// Mean of a feature for one position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionMean {
    pub position: String,
    pub mean: f64,
}

/// Mean of `feature` per position, ordered by position name and rounded to
/// two decimals. Players without a position or without a value for the
/// feature are left out.
pub fn position_means<'a>(
    roster: impl IntoIterator<Item = &'a PlayerRecord>,
    feature: Feature,
) -> Vec<PositionMean> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for player in roster {
        let (Some(position), Some(value)) = (player.position.as_deref(), feature.of(player)) else {
            continue;
        };
        groups.entry(position).or_default().push(value);
    }

    groups
        .into_iter()
        .filter_map(|(position, values)| {
            mean(values).map(|m| PositionMean {
                position: position.to_string(),
                mean: round_to(m, 2),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::loader::{load_season_from_reader, LoadOptions};

    fn roster() -> Vec<PlayerRecord> {
        let csv_data = "\
,Name,Age,Overall,Value(£),Wage(£),Release Clause(£),Height(cm.),Weight(lbs.),Club,Position
0,A,20,80,100,10,1,180,160,X,ST
1,B,25,70,50,5,1,190,180,X,GK
2,C,31,91,150,15,1,170,140,X,ST
3,D,,60,20,2,1,200,200,X,GK
4,E,22,65,20,2,1,200,200,X,";
        load_season_from_reader(csv_data.as_bytes(), "t.csv", &LoadOptions::default())
            .unwrap()
            .into_players()
    }

    #[test]
    fn grouped_sorted_and_rounded() {
        let players = roster();
        let means = position_means(&players, Feature::Overall);
        assert_eq!(
            means,
            vec![
                PositionMean { position: "GK".into(), mean: 65.0 },
                PositionMean { position: "ST".into(), mean: 85.5 },
            ]
        );
    }

    #[test]
    fn missing_values_skipped() {
        let players = roster();
        let means = position_means(&players, Feature::Age);
        assert_eq!(means[0].position, "GK");
        assert_eq!(means[0].mean, 25.0);
    }

    #[test]
    fn height_uses_meters() {
        let players = roster();
        let means = position_means(&players, Feature::Height);
        assert_eq!(means[0].mean, 1.95);
    }

    #[test]
    fn feature_parsing() {
        assert_eq!("wage".parse::<Feature>(), Ok(Feature::Wage));
        assert_eq!("Value(£)".parse::<Feature>(), Ok(Feature::Value));
        assert_eq!(" HEIGHT ".parse::<Feature>(), Ok(Feature::Height));
        assert!("speed".parse::<Feature>().is_err());
    }
}
