//! Static marketing knowledge: sector profiles and lead-scoring weights.
//!
//! The tables here are a representative slice; the full catalogue is
//! configuration data maintained outside the engineering surface.

use serde::{Deserialize, Serialize};

/// Go-to-market profile for one sector.
#[derive(Debug, Clone, Serialize)]
pub struct SectorProfile {
    pub sector: &'static str,
    pub summary: &'static str,
    pub buying_triggers: &'static [&'static str],
    pub preferred_channels: &'static [&'static str],
    pub avg_deal_cycle_days: u32,
}

pub const SECTOR_PROFILES: &[SectorProfile] = &[
    SectorProfile {
        sector: "saas",
        summary: "Product-led B2B software; short cycles, self-serve entry points.",
        buying_triggers: &["new funding round", "head of growth hired", "tool consolidation"],
        preferred_channels: &["product trials", "founder outreach", "community"],
        avg_deal_cycle_days: 35,
    },
    SectorProfile {
        sector: "fintech",
        summary: "Regulated money movement; compliance gates every purchase.",
        buying_triggers: &["license approval", "new market entry", "audit finding"],
        preferred_channels: &["analyst briefings", "events", "direct sales"],
        avg_deal_cycle_days: 90,
    },
    SectorProfile {
        sector: "healthcare",
        summary: "Clinical and payer systems; procurement is committee-driven.",
        buying_triggers: &["EHR migration", "value-based care initiative", "staffing shortage"],
        preferred_channels: &["conferences", "peer referrals", "RFPs"],
        avg_deal_cycle_days: 180,
    },
    SectorProfile {
        sector: "manufacturing",
        summary: "Plant-floor and supply-chain operations; ROI must be demonstrable.",
        buying_triggers: &["line expansion", "quality incident", "ERP refresh"],
        preferred_channels: &["trade shows", "channel partners", "pilot programs"],
        avg_deal_cycle_days: 120,
    },
];

/// Looks up a sector profile by name, case-insensitively.
#[must_use]
pub fn sector_profile(sector: &str) -> Option<&'static SectorProfile> {
    let needle = sector.trim();
    SECTOR_PROFILES
        .iter()
        .find(|profile| profile.sector.eq_ignore_ascii_case(needle))
}

/// Names of every known sector, in table order.
#[must_use]
pub fn sector_names() -> Vec<&'static str> {
    SECTOR_PROFILES.iter().map(|profile| profile.sector).collect()
}

const SECTOR_FIT_POINTS: f64 = 30.0;
const FUNDING_POINTS: f64 = 20.0;
const EMPLOYEE_POINTS_MAX: f64 = 25.0;
const SIGNAL_POINTS: f64 = 5.0;
const SIGNAL_POINTS_MAX: f64 = 25.0;

/// Inputs for the lead fit score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreInput {
    pub sector: String,
    pub employee_count: Option<u32>,
    #[serde(default)]
    pub has_funding: bool,
    #[serde(default)]
    pub signals: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreComponent {
    pub name: &'static str,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub total: f64,
    pub components: Vec<ScoreComponent>,
}

/// Computes a deterministic 0..=100 fit score with a component breakdown.
#[must_use]
pub fn score_lead(input: &ScoreInput) -> ScoreBreakdown {
    let sector_points = if sector_profile(&input.sector).is_some() {
        SECTOR_FIT_POINTS
    } else {
        0.0
    };
    let employee_points = input.employee_count.map_or(0.0, employee_band_points);
    let funding_points = if input.has_funding { FUNDING_POINTS } else { 0.0 };
    let signal_count = input
        .signals
        .iter()
        .filter(|signal| !signal.trim().is_empty())
        .count();
    #[allow(clippy::cast_precision_loss)]
    let signal_points = (signal_count as f64 * SIGNAL_POINTS).min(SIGNAL_POINTS_MAX);

    let components = vec![
        ScoreComponent {
            name: "sector_fit",
            points: sector_points,
        },
        ScoreComponent {
            name: "company_size",
            points: employee_points,
        },
        ScoreComponent {
            name: "funding",
            points: funding_points,
        },
        ScoreComponent {
            name: "signals",
            points: signal_points,
        },
    ];
    let total = components
        .iter()
        .map(|component| component.points)
        .sum::<f64>()
        .clamp(0.0, 100.0);

    ScoreBreakdown { total, components }
}

const fn employee_band_points(employee_count: u32) -> f64 {
    match employee_count {
        0..=9 => 5.0,
        10..=49 => 15.0,
        50..=249 => EMPLOYEE_POINTS_MAX,
        250..=999 => 20.0,
        _ => 10.0,
    }
}
