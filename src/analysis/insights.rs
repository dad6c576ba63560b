use serde::{Deserialize, Serialize};

use super::{
    Driver, LapComparison,
    attribution::CornerTypeVerdict,
};

/// Display names of the two drivers being compared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverNames {
    pub reference: String,
    pub challenger: String,
}

impl DriverNames {
    pub fn new(reference: impl Into<String>, challenger: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            challenger: challenger.into(),
        }
    }

    pub fn name(&self, driver: Driver) -> &str {
        match driver {
            Driver::Reference => &self.reference,
            Driver::Challenger => &self.challenger,
        }
    }
}

impl Default for DriverNames {
    fn default() -> Self {
        Self::new("A", "B")
    }
}

/// Insight categories, declared in the order insights are presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InsightCategory {
    OverallPace,
    BiggestGain,
    StrongestSector,
    StraightLine,
    BrakingZone,
    Aggression,
    LaterBraking,
    CornerSummary,
    CornerType,
    CornerDetail,
    Anomalies,
    BrakingRisk,
    Strategy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub category: InsightCategory,
    pub message: String,
}

impl Insight {
    fn new(category: InsightCategory, message: String) -> Self {
        Self { category, message }
    }
}

impl std::fmt::Display for Insight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Renders the results of a comparison into ranked statements.
pub fn synthesize(comparison: &LapComparison, names: &DriverNames) -> Vec<Insight> {
    let reference = names.name(Driver::Reference);
    let mut insights = Vec::new();

    let faster = comparison.delta.faster_overall();
    insights.push(Insight::new(
        InsightCategory::OverallPace,
        format!(
            "{} is faster overall than {} on this lap.",
            names.name(faster),
            names.name(faster.other())
        ),
    ));

    if let Some(gain) = comparison.delta.biggest_gain() {
        insights.push(Insight::new(
            InsightCategory::BiggestGain,
            format!(
                "Biggest time gain for {} occurs around {} meters.",
                reference, gain.distance as i64
            ),
        ));
    }

    insights.push(Insight::new(
        InsightCategory::StrongestSector,
        format!(
            "{} is strongest in {}.",
            reference,
            comparison.sectors.strongest.description()
        ),
    ));

    if let Some(straight_line) = comparison.speed_advantage.straight_line {
        let (better, worse) = ordered(names, straight_line > 0.);
        insights.push(Insight::new(
            InsightCategory::StraightLine,
            format!("{better} has superior straight-line speed compared to {worse}."),
        ));
    }

    if let Some(braking_zone) = comparison.speed_advantage.braking_zone {
        let (later, _) = ordered(names, braking_zone >= 0.);
        insights.push(Insight::new(
            InsightCategory::BrakingZone,
            format!("{later} brakes later into heavy braking zones."),
        ));
    }

    let (more, less) = ordered(
        names,
        comparison.reference.hazards.strategy.consistency_index
            > comparison.challenger.hazards.strategy.consistency_index,
    );
    insights.push(Insight::new(
        InsightCategory::Aggression,
        format!("{more} is driving more aggressively than {less} (higher speed variance)."),
    ));

    let (later, earlier) = ordered(
        names,
        comparison.reference.brake_samples < comparison.challenger.brake_samples,
    );
    insights.push(Insight::new(
        InsightCategory::LaterBraking,
        format!("{later} brakes later than {earlier}."),
    ));

    corner_insights(comparison, names, &mut insights);

    let hazards = &comparison.reference.hazards;
    insights.push(Insight::new(
        InsightCategory::Anomalies,
        format!(
            "Detected {} anomalous slow zones for {}.",
            hazards.anomalies.len(),
            reference
        ),
    ));
    insights.push(Insight::new(
        InsightCategory::BrakingRisk,
        format!(
            "{} high-risk braking zones detected for {}.",
            hazards.risky_braking.len(),
            reference
        ),
    ));
    insights.push(Insight::new(
        InsightCategory::Strategy,
        format!(
            "Recommended strategy for {}: {}. {}",
            reference,
            hazards.strategy.strategy,
            hazards.strategy.strategy.reason()
        ),
    ));

    insights.sort_by_key(|insight| insight.category);
    insights
}

fn corner_insights(comparison: &LapComparison, names: &DriverNames, insights: &mut Vec<Insight>) {
    let reference = names.name(Driver::Reference);
    let summary = &comparison.summary;

    let Some(stronger) = summary.stronger() else {
        insights.push(Insight::new(
            InsightCategory::CornerSummary,
            "No corners detected, corner-by-corner attribution is unavailable.".to_string(),
        ));
        return;
    };

    let (winner, other) = (names.name(stronger), names.name(stronger.other()));
    let message = match stronger {
        Driver::Reference => format!(
            "{winner} is stronger in technical corner sections and gains time in more turns than {other}."
        ),
        Driver::Challenger => format!(
            "{winner} is stronger in corner exits and braking zones, gaining advantage over {other}."
        ),
    };
    insights.push(Insight::new(InsightCategory::CornerSummary, message));

    let breakdown = &comparison.speed_classes;
    let verdict = match breakdown.verdict() {
        CornerTypeVerdict::SlowCornerSpecialist => {
            format!("{reference} is significantly stronger in slow technical hairpins.")
        }
        CornerTypeVerdict::HighSpeedSpecialist => {
            format!("{reference} gains major time in high-speed sweepers and flowing sections.")
        }
        CornerTypeVerdict::Balanced => {
            format!("{reference} shows balanced performance across corner types.")
        }
    };
    insights.push(Insight::new(
        InsightCategory::CornerType,
        format!(
            "Slow corners gained by {reference}: {}. Medium speed corners gained by {reference}: {}. High speed corners gained by {reference}: {}. {verdict}",
            breakdown.slow_gains, breakdown.medium_gains, breakdown.fast_gains
        ),
    ));

    for attribution in &comparison.attributions {
        insights.push(Insight::new(
            InsightCategory::CornerDetail,
            format!(
                "Turn {}: {} gains {:.3}s",
                attribution.corner.number,
                names.name(attribution.gaining),
                attribution.magnitude()
            ),
        ));
    }
}

/// `(reference, challenger)` when `reference_first`, the other way round otherwise.
fn ordered(names: &DriverNames, reference_first: bool) -> (&str, &str) {
    if reference_first {
        (&names.reference, &names.challenger)
    } else {
        (&names.challenger, &names.reference)
    }
}
