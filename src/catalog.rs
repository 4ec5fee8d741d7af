use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::formula::{Estimate, Formula, OnEmpty, PLAYING_TIME_90S};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MetricFamily {
    Attack,
    Defense,
    Possession,
    Passing,
    SetPieces,
    Impact,
    Efficiency,
    Composite,
}

impl MetricFamily {
    pub const ALL: [MetricFamily; 8] = [
        MetricFamily::Attack,
        MetricFamily::Defense,
        MetricFamily::Possession,
        MetricFamily::Passing,
        MetricFamily::SetPieces,
        MetricFamily::Impact,
        MetricFamily::Efficiency,
        MetricFamily::Composite,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MetricFamily::Attack => "Attack",
            MetricFamily::Defense => "Defense",
            MetricFamily::Possession => "Possession",
            MetricFamily::Passing => "Passing",
            MetricFamily::SetPieces => "Set Pieces",
            MetricFamily::Impact => "Player Impact",
            MetricFamily::Efficiency => "Efficiency",
            MetricFamily::Composite => "Composite",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRule {
    pub name: &'static str,
    pub family: MetricFamily,
    /// All of these must exist in the raw table for the rule to run.
    pub requires: &'static [&'static str],
    pub formula: Formula,
    pub default: f64,
    /// Approximated from a proxy rather than measured directly.
    pub estimate: bool,
}

impl MetricRule {
    pub fn is_computable(&self, columns: &HashSet<&str>) -> bool {
        self.requires.iter().all(|c| columns.contains(c))
    }
}

const fn rule(
    name: &'static str,
    family: MetricFamily,
    requires: &'static [&'static str],
    formula: Formula,
    default: f64,
) -> MetricRule {
    MetricRule {
        name,
        family,
        requires,
        formula,
        default,
        estimate: false,
    }
}

const fn estimate(
    name: &'static str,
    family: MetricFamily,
    requires: &'static [&'static str],
    estimate: Estimate,
    default: f64,
) -> MetricRule {
    MetricRule {
        name,
        family,
        requires,
        formula: Formula::Estimate(estimate),
        default,
        estimate: true,
    }
}

const fn pct(num: &'static [&'static str], den: &'static [&'static str], on_empty: OnEmpty) -> Formula {
    Formula::Ratio {
        num,
        den,
        scale: 100.0,
        on_empty,
    }
}

const fn per_unit(
    num: &'static [&'static str],
    den: &'static [&'static str],
    on_empty: OnEmpty,
) -> Formula {
    Formula::Ratio {
        num,
        den,
        scale: 1.0,
        on_empty,
    }
}

const N90: &str = PLAYING_TIME_90S;
const SH: &str = "Standard Sh";
const SOT: &str = "Standard SoT";
const GLS: &str = "Performance Gls";
const GPK: &str = "Performance G-PK";
const XG: &str = "Expected xG";
const NPXG: &str = "Expected npxG";
const XA: &str = "Expected xA";
const AST: &str = "Ast";
const KP: &str = "KP";
const PRGP: &str = "PrgP";
const TOTAL_ATT: &str = "Total Att";
const TOTAL_CMP_PCT: &str = "Total Cmp%";
const TOUCHES: &str = "Touches Touches";
const CARRIES: &str = "Carries Carries";
const PRGC: &str = "Carries PrgC";
const CPA: &str = "Carries CPA";
const FINAL_THIRD: &str = "Carries 1/3";
const MIS: &str = "Carries Mis";
const DIS: &str = "Carries Dis";
const TKL: &str = "Tackles Tkl";
const TKLW: &str = "Tackles TklW";
const INT: &str = "Int";
const CLR: &str = "Clr";
const BLOCKS: &str = "Blocks Blocks";
const GCA: &str = "GCA GCA";
const SCA: &str = "SCA SCA";
const CK: &str = "Pass Types CK";

const GCA_TYPES: &[&str] = &[
    "GCA Types PassLive",
    "GCA Types PassDead",
    "GCA Types TO",
    "GCA Types Sh",
    "GCA Types Fld",
    "GCA Types Def",
];
const SCA_TYPES: &[&str] = &[
    "SCA Types PassLive",
    "SCA Types PassDead",
    "SCA Types TO",
    "SCA Types Sh",
    "SCA Types Fld",
    "SCA Types Def",
];
const BLOCK_TYPES: &[&str] = &["Blocks Sh", "Blocks Pass"];
const TACKLE_THIRDS: &[&str] = &["Tackles Def 3rd", "Tackles Mid 3rd", "Tackles Att 3rd"];
const TOUCH_THIRDS: &[&str] = &["Touches Def 3rd", "Touches Mid 3rd", "Touches Att 3rd"];
const CORNER_TYPES: &[&str] = &["Corner Kicks In", "Corner Kicks Out", "Corner Kicks Str"];
const BALL_LOSS: &[&str] = &[MIS, DIS, CARRIES];

use MetricFamily::{Attack, Composite, Defense, Efficiency, Impact, Passing, Possession, SetPieces};
use OnEmpty::{Default as Dflt, Zero};

static CATALOG: &[MetricRule] = &[
    // Attack
    rule("Shots Per 90", Attack, &[SH, N90], Formula::Per90(&[SH]), 12.0),
    rule("Shot on Target %", Attack, &[SH, SOT], pct(&[SOT], &[SH], Zero), 35.0),
    rule("xG Per Shot", Attack, &[SH, XG], per_unit(&[XG], &[SH], Zero), 0.1),
    rule("Goals Per Shot", Attack, &[SH, GLS], per_unit(&[GLS], &[SH], Zero), 0.1),
    rule("Conversion Rate", Attack, &[SH, GLS], pct(&[GLS], &[SH], Zero), 10.0),
    rule("Goals per SoT", Attack, &[SOT, GLS], per_unit(&[GLS], &[SOT], Zero), 0.3),
    rule(
        "G-xG",
        Attack,
        &[GLS, XG],
        Formula::Differential {
            actual: &[GLS],
            expected: &[XG],
        },
        0.0,
    ),
    rule("Non-Penalty Goals", Attack, &[GPK, NPXG], Formula::Total(GPK), 0.0),
    rule("Non-Penalty xG", Attack, &[GPK, NPXG], Formula::Total(NPXG), 0.0),
    rule("Non-Penalty Goals Per 90", Attack, &[GPK, N90], Formula::Per90(&[GPK]), 1.2),
    rule(
        "Penalty Conversion %",
        Attack,
        &["Performance PK", "Standard PKatt"],
        pct(&["Performance PK"], &["Standard PKatt"], Zero),
        75.0,
    ),
    rule("GCA Per 90", Attack, &[GCA, N90], Formula::Per90(&[GCA]), 2.0),
    rule("GCA PassLive %", Attack, GCA_TYPES, Formula::Share { member: "GCA Types PassLive", family: GCA_TYPES }, 70.0),
    rule("GCA PassDead %", Attack, GCA_TYPES, Formula::Share { member: "GCA Types PassDead", family: GCA_TYPES }, 8.0),
    rule("GCA TO %", Attack, GCA_TYPES, Formula::Share { member: "GCA Types TO", family: GCA_TYPES }, 6.0),
    rule("GCA Sh %", Attack, GCA_TYPES, Formula::Share { member: "GCA Types Sh", family: GCA_TYPES }, 7.0),
    rule("GCA Fld %", Attack, GCA_TYPES, Formula::Share { member: "GCA Types Fld", family: GCA_TYPES }, 6.0),
    rule("GCA Def %", Attack, GCA_TYPES, Formula::Share { member: "GCA Types Def", family: GCA_TYPES }, 3.0),
    rule(
        "Box Touches %",
        Attack,
        &["Touches Att Pen", TOUCHES],
        pct(&["Touches Att Pen"], &[TOUCHES], Dflt),
        7.0,
    ),
    rule("Carries into Box Per 90", Attack, &[CPA, N90], Formula::Per90(&[CPA]), 2.0),
    rule("Passes into Box Per 90", Attack, &["PPA", N90], Formula::Per90(&["PPA"]), 5.0),
    // Defense
    rule("Tackles Per 90", Defense, &[TKL, N90], Formula::Per90(&[TKL]), 15.0),
    rule("Tackle Success %", Defense, &[TKL, TKLW], pct(&[TKLW], &[TKL], Zero), 65.0),
    rule("Interceptions Per 90", Defense, &[INT, N90], Formula::Per90(&[INT]), 10.0),
    rule(
        "Tackles+Interceptions Per 90",
        Defense,
        &[TKL, INT, N90],
        Formula::Per90(&[TKL, INT]),
        25.0,
    ),
    rule("Blocks Per 90", Defense, &[BLOCKS, N90], Formula::Per90(&[BLOCKS]), 8.0),
    rule("Shot Blocks %", Defense, BLOCK_TYPES, Formula::Share { member: "Blocks Sh", family: BLOCK_TYPES }, 50.0),
    rule("Pass Blocks %", Defense, BLOCK_TYPES, Formula::Share { member: "Blocks Pass", family: BLOCK_TYPES }, 50.0),
    rule("Clearances Per 90", Defense, &[CLR, N90], Formula::Per90(&[CLR]), 20.0),
    rule("Errors Per 90", Defense, &["Err", N90], Formula::Per90(&["Err"]), 0.5),
    rule("Def 3rd Tackles %", Defense, TACKLE_THIRDS, Formula::Share { member: "Tackles Def 3rd", family: TACKLE_THIRDS }, 50.0),
    rule("Mid 3rd Tackles %", Defense, TACKLE_THIRDS, Formula::Share { member: "Tackles Mid 3rd", family: TACKLE_THIRDS }, 35.0),
    rule("Att 3rd Tackles %", Defense, TACKLE_THIRDS, Formula::Share { member: "Tackles Att 3rd", family: TACKLE_THIRDS }, 15.0),
    rule(
        "Aerial Duels Won %",
        Defense,
        &["Aerial Duels Won", "Aerial Duels Lost"],
        pct(&["Aerial Duels Won"], &["Aerial Duels Won", "Aerial Duels Lost"], Dflt),
        50.0,
    ),
    rule(
        "Pressure Success %",
        Defense,
        &["Pressure Succ%", "Pressure Press"],
        Formula::MeanOfRatios {
            value: "Pressure Succ%",
            denominator: "Pressure Press",
        },
        30.0,
    ),
    rule(
        "Recoveries Per 90",
        Defense,
        &["Performance Recov", N90],
        Formula::Per90(&["Performance Recov"]),
        35.0,
    ),
    // Possession
    estimate("Possession %", Possession, &[TOUCHES], Estimate::Constant(50.0), 50.0),
    rule("Touches Per 90", Possession, &[TOUCHES, N90], Formula::Per90(&[TOUCHES]), 500.0),
    rule("Def 3rd Touch %", Possession, TOUCH_THIRDS, Formula::Share { member: "Touches Def 3rd", family: TOUCH_THIRDS }, 30.0),
    rule("Mid 3rd Touch %", Possession, TOUCH_THIRDS, Formula::Share { member: "Touches Mid 3rd", family: TOUCH_THIRDS }, 50.0),
    rule("Att 3rd Touch %", Possession, TOUCH_THIRDS, Formula::Share { member: "Touches Att 3rd", family: TOUCH_THIRDS }, 20.0),
    rule(
        "Att Pen Touch %",
        Possession,
        &["Touches Att Pen", TOUCHES],
        pct(&["Touches Att Pen"], &[TOUCHES], Dflt),
        5.0,
    ),
    rule(
        "Def Pen Touch %",
        Possession,
        &["Touches Def Pen", TOUCHES],
        pct(&["Touches Def Pen"], &[TOUCHES], Dflt),
        3.0,
    ),
    rule(
        "Touches in Attacking Third",
        Possession,
        &["Touches Att 3rd"],
        Formula::PerPlayer(&["Touches Att 3rd"]),
        160.0,
    ),
    rule("Progressive Carries Per 90", Possession, &[PRGC, N90], Formula::Per90(&[PRGC]), 30.0),
    rule("Progressive Carry %", Possession, &[PRGC, CARRIES], pct(&[PRGC], &[CARRIES], Dflt), 10.0),
    rule(
        "Carries into Final Third Per 90",
        Possession,
        &[FINAL_THIRD, N90],
        Formula::Per90(&[FINAL_THIRD]),
        15.0,
    ),
    rule(
        "Progressive Passes Received Per 90",
        Possession,
        &["Receiving PrgR", N90],
        Formula::Per90(&["Receiving PrgR"]),
        25.0,
    ),
    rule("Miscontrols per 100 Touches", Possession, BALL_LOSS, pct(&[MIS], &[CARRIES], Dflt), 3.0),
    rule("Dispossessed per 100 Touches", Possession, BALL_LOSS, pct(&[DIS], &[CARRIES], Dflt), 2.0),
    rule(
        "Carry Success %",
        Possession,
        BALL_LOSS,
        Formula::Retained {
            total: CARRIES,
            lost: &[MIS, DIS],
        },
        95.0,
    ),
    rule(
        "Take-On Success %",
        Possession,
        &["Take-Ons Succ", "Take-Ons Att"],
        pct(&["Take-Ons Succ"], &["Take-Ons Att"], Dflt),
        55.0,
    ),
    rule("Take-Ons Per 90", Possession, &["Take-Ons Att", N90], Formula::Per90(&["Take-Ons Att"]), 8.0),
    rule(
        "Successful Take-Ons Per 90",
        Possession,
        &["Take-Ons Succ", N90],
        Formula::Per90(&["Take-Ons Succ"]),
        4.5,
    ),
    // Passing
    rule(
        "Short Pass Completion %",
        Passing,
        &["Short Cmp", "Short Att"],
        pct(&["Short Cmp"], &["Short Att"], Zero),
        88.0,
    ),
    rule(
        "Medium Pass Completion %",
        Passing,
        &["Medium Cmp", "Medium Att"],
        pct(&["Medium Cmp"], &["Medium Att"], Zero),
        80.0,
    ),
    rule(
        "Long Pass Completion %",
        Passing,
        &["Long Cmp", "Long Att"],
        pct(&["Long Cmp"], &["Long Att"], Zero),
        55.0,
    ),
    rule(
        "Pass Completion %",
        Passing,
        &[TOTAL_CMP_PCT, TOTAL_ATT],
        Formula::MeanOfRatios {
            value: TOTAL_CMP_PCT,
            denominator: TOTAL_ATT,
        },
        80.0,
    ),
    rule(
        "Avg Pass Distance",
        Passing,
        &["Total TotDist", TOTAL_ATT],
        per_unit(&["Total TotDist"], &[TOTAL_ATT], Dflt),
        18.0,
    ),
    rule("Progressive Passes Per 90", Passing, &[PRGP, N90], Formula::Per90(&[PRGP]), 35.0),
    rule("Progressive Pass Ratio", Passing, &[PRGP, TOTAL_ATT], pct(&[PRGP], &[TOTAL_ATT], Dflt), 10.0),
    rule(
        "Progressive Pass Distance Per 90",
        Passing,
        &["Total PrgDist", N90],
        Formula::Per90(&["Total PrgDist"]),
        400.0,
    ),
    rule("Key Passes Per 90", Passing, &[KP, N90], Formula::Per90(&[KP]), 1.5),
    rule("xA Per 90", Passing, &[XA, N90], Formula::Per90(&[XA]), 0.2),
    rule("Assist Rate", Passing, &[AST, KP], pct(&[AST], &[KP], Dflt), 10.0),
    rule("xA per Key Pass", Passing, &[XA, KP], per_unit(&[XA], &[KP], Dflt), 0.1),
    rule(
        "A-xA",
        Passing,
        &[AST, XA],
        Formula::Differential {
            actual: &[AST],
            expected: &[XA],
        },
        0.0,
    ),
    rule("xAG Per 90", Passing, &["xAG", N90], Formula::Per90(&["xAG"]), 0.25),
    rule("SCA Per 90", Passing, &[SCA, N90], Formula::Per90(&[SCA]), 3.0),
    rule("SCA PassLive %", Passing, SCA_TYPES, Formula::Share { member: "SCA Types PassLive", family: SCA_TYPES }, 72.0),
    rule("SCA PassDead %", Passing, SCA_TYPES, Formula::Share { member: "SCA Types PassDead", family: SCA_TYPES }, 8.0),
    rule("SCA TO %", Passing, SCA_TYPES, Formula::Share { member: "SCA Types TO", family: SCA_TYPES }, 6.0),
    rule("SCA Sh %", Passing, SCA_TYPES, Formula::Share { member: "SCA Types Sh", family: SCA_TYPES }, 6.0),
    rule("SCA Fld %", Passing, SCA_TYPES, Formula::Share { member: "SCA Types Fld", family: SCA_TYPES }, 5.0),
    rule("SCA Def %", Passing, SCA_TYPES, Formula::Share { member: "SCA Types Def", family: SCA_TYPES }, 3.0),
    // Set pieces
    estimate(
        "Corners Per Match",
        SetPieces,
        &[CK],
        Estimate::CornersPerMatch {
            corners: CK,
            fallback: 5.0,
        },
        5.0,
    ),
    rule("In Corner %", SetPieces, CORNER_TYPES, Formula::Share { member: "Corner Kicks In", family: CORNER_TYPES }, 25.0),
    rule("Out Corner %", SetPieces, CORNER_TYPES, Formula::Share { member: "Corner Kicks Out", family: CORNER_TYPES }, 60.0),
    rule("Str Corner %", SetPieces, CORNER_TYPES, Formula::Share { member: "Corner Kicks Str", family: CORNER_TYPES }, 15.0),
    estimate(
        "Direct Corners %",
        SetPieces,
        &[CK, "Corner Kicks Str"],
        Estimate::DirectCorners {
            corners: CK,
            straight: "Corner Kicks Str",
            fallback: 85.0,
        },
        85.0,
    ),
    estimate(
        "Corner Success Rate (%)",
        SetPieces,
        &[CK],
        Estimate::CornerSuccess {
            corners: CK,
            delivered_in: "Corner Kicks In",
            fallback: 30.0,
        },
        30.0,
    ),
    estimate(
        "Corner to Shot %",
        SetPieces,
        &[CK, "SCA Types PassDead"],
        Estimate::CornerToShot {
            corners: CK,
            dead_ball_sca: "SCA Types PassDead",
        },
        25.0,
    ),
    // Player impact
    rule("+/-", Impact, &["Team Success +/-"], Formula::Mean("Team Success +/-"), 0.0),
    rule("+/- per 90", Impact, &["Team Success +/-90"], Formula::Mean("Team Success +/-90"), 0.0),
    rule("On-Off +/-", Impact, &["Team Success On-Off"], Formula::Mean("Team Success On-Off"), 0.0),
    rule(
        "xG +/-",
        Impact,
        &["Team Success (xG) xG+/-"],
        Formula::Mean("Team Success (xG) xG+/-"),
        0.0,
    ),
    rule(
        "xG +/- per 90",
        Impact,
        &["Team Success (xG) xG+/-90"],
        Formula::Mean("Team Success (xG) xG+/-90"),
        0.0,
    ),
    rule(
        "xG On-Off",
        Impact,
        &["Team Success (xG) On-Off"],
        Formula::Mean("Team Success (xG) On-Off"),
        0.0,
    ),
    rule("Points per Match", Impact, &["Team Success PPM"], Formula::Mean("Team Success PPM"), 1.5),
    rule("G+A Per 90", Impact, &[GLS, AST, N90], Formula::Per90(&[GLS, AST]), 0.4),
    rule("G+A-PK Per 90", Impact, &[GPK, AST, N90], Formula::Per90(&[GPK, AST]), 0.35),
    rule("xG+xA Per 90", Impact, &[XG, XA, N90], Formula::Per90(&[XG, XA]), 0.4),
    rule("npxG+xA Per 90", Impact, &[NPXG, XA, N90], Formula::Per90(&[NPXG, XA]), 0.35),
    // Efficiency
    rule(
        "Goal Impact per 100 Touches",
        Efficiency,
        &[GLS, AST, TOUCHES],
        pct(&[GLS, AST], &[TOUCHES], Dflt),
        0.8,
    ),
    rule(
        "xG+xA per 100 Touches",
        Efficiency,
        &[XG, XA, TOUCHES],
        pct(&[XG, XA], &[TOUCHES], Dflt),
        0.8,
    ),
    rule("SCA per 100 Touches", Efficiency, &[SCA, TOUCHES], pct(&[SCA], &[TOUCHES], Dflt), 5.0),
    rule("Progressive Pass %", Efficiency, &[PRGP, TOTAL_ATT], pct(&[PRGP], &[TOTAL_ATT], Dflt), 12.0),
    rule("Key Pass %", Efficiency, &[KP, TOTAL_ATT], pct(&[KP], &[TOTAL_ATT], Dflt), 3.0),
    rule(
        "Final Third Entry per Carry %",
        Efficiency,
        &[FINAL_THIRD, CARRIES],
        pct(&[FINAL_THIRD], &[CARRIES], Dflt),
        5.0,
    ),
    rule("Box Entry per Carry %", Efficiency, &[CPA, CARRIES], pct(&[CPA], &[CARRIES], Dflt), 1.5),
    // Composite
    rule(
        "Offensive Efficiency",
        Composite,
        &[GLS, AST, XG, XA],
        per_unit(&[GLS, AST], &[XG, XA], Dflt),
        1.0,
    ),
    rule(
        "Offensive Value Added",
        Composite,
        &[GLS, AST, "Expected G-xG", "Expected A-xAG", PRGP, PRGC],
        Formula::OffensiveValueAdded {
            over_expected: &["Expected G-xG", "Expected A-xAG"],
            progressive: &[PRGP, PRGC],
        },
        0.0,
    ),
    rule(
        "Defensive Value Metric",
        Composite,
        &[INT, TKLW, CLR, BLOCKS],
        Formula::PerPlayer(&[INT, TKLW, CLR, BLOCKS]),
        50.0,
    ),
    rule(
        "Direct Play Index",
        Composite,
        &[TOTAL_ATT, TOTAL_CMP_PCT, "Long Att"],
        Formula::DirectPlayIndex {
            long_attempts: "Long Att",
            total_attempts: TOTAL_ATT,
            completion_pct: TOTAL_CMP_PCT,
        },
        100.0,
    ),
    rule(
        "Pressing Intensity",
        Composite,
        TACKLE_THIRDS,
        Formula::PressingIntensity {
            attacking: "Tackles Att 3rd",
            middle: "Tackles Mid 3rd",
            defensive: "Tackles Def 3rd",
        },
        1.5,
    ),
];

/// Per-player columns kept in the player projection when present, in output order.
const PLAYER_METRIC_COLUMNS: &[&str] = &[
    GLS,
    "Performance Ast",
    "Performance G+A",
    GPK,
    SH,
    SOT,
    "Standard SoT%",
    XG,
    "Expected G-xG",
    GCA,
    "GCA GCA90",
    XA,
    NPXG,
    TOUCHES,
    "Touches Att Pen",
    "Touches Att 3rd",
    "Touches Mid 3rd",
    "Touches Def 3rd",
    CARRIES,
    PRGC,
    FINAL_THIRD,
    CPA,
    "Receiving PrgR",
    "Take-Ons Att",
    "Take-Ons Succ",
    "Take-Ons Succ%",
    TOTAL_ATT,
    "Total Cmp",
    TOTAL_CMP_PCT,
    PRGP,
    KP,
    AST,
    "xAG",
    "Short Cmp%",
    "Medium Cmp%",
    "Long Cmp%",
    SCA,
    "SCA SCA90",
    TKL,
    TKLW,
    INT,
    BLOCKS,
    CLR,
    "Aerial Duels Won",
    "Aerial Duels Won%",
    "Performance Recov",
    CK,
    "Corner Kicks In",
    "Corner Kicks Out",
    "Corner Kicks Str",
    N90,
    "Playing Time Min",
];

static INDEX: Lazy<HashMap<&'static str, usize>> =
    Lazy::new(|| CATALOG.iter().enumerate().map(|(i, r)| (r.name, i)).collect());

static PLAYER_COLUMNS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut seen: HashSet<&'static str> = HashSet::new();
    let mut out = Vec::new();
    let rule_sources = CATALOG.iter().flat_map(|r| r.requires.iter().copied());
    for column in PLAYER_METRIC_COLUMNS.iter().copied().chain(rule_sources) {
        if seen.insert(column) {
            out.push(column);
        }
    }
    out
});

pub fn rules() -> &'static [MetricRule] {
    CATALOG
}

pub fn rule_for(name: &str) -> Option<&'static MetricRule> {
    INDEX.get(name).map(|&i| &CATALOG[i])
}

pub fn position_of(name: &str) -> Option<usize> {
    INDEX.get(name).copied()
}

pub fn metric_names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|r| r.name)
}

pub fn family_rules(family: MetricFamily) -> impl Iterator<Item = &'static MetricRule> {
    CATALOG.iter().filter(move |r| r.family == family)
}

pub fn estimate_metrics() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().filter(|r| r.estimate).map(|r| r.name)
}

/// Known per-player metric columns: the projection list followed by any other rule source.
pub fn player_metric_columns() -> &'static [&'static str] {
    &PLAYER_COLUMNS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_are_unique() {
        let names: HashSet<&str> = metric_names().collect();
        assert_eq!(names.len(), rules().len());
        assert_eq!(INDEX.len(), rules().len());
    }

    #[test]
    fn defaults_are_finite() {
        for r in rules() {
            assert!(r.default.is_finite(), "{} has a non-finite default", r.name);
            assert!(!r.requires.is_empty(), "{} has no source columns", r.name);
        }
    }

    #[test]
    fn distribution_defaults_sum_to_hundred() {
        let mut families: HashMap<&[&str], f64> = HashMap::new();
        for r in rules() {
            if let Formula::Share { family, .. } = r.formula {
                *families.entry(family).or_insert(0.0) += r.default;
            }
        }
        assert_eq!(families.len(), 6);
        for (family, total) in families {
            assert!((total - 100.0).abs() < 1e-9, "{family:?} defaults sum to {total}");
        }
    }

    #[test]
    fn computable_requires_every_source() {
        let rule = rule_for("Shots Per 90").expect("known metric");
        let partial: HashSet<&str> = [SH].into_iter().collect();
        let full: HashSet<&str> = [SH, N90].into_iter().collect();
        assert!(!rule.is_computable(&partial));
        assert!(rule.is_computable(&full));
    }

    #[test]
    fn estimates_are_flagged() {
        let estimates: Vec<&str> = estimate_metrics().collect();
        assert!(estimates.contains(&"Corners Per Match"));
        assert!(estimates.contains(&"Possession %"));
        assert!(!estimates.contains(&"Shots Per 90"));
    }

    #[test]
    fn player_columns_cover_rule_sources() {
        let cols: HashSet<&str> = player_metric_columns().iter().copied().collect();
        for r in rules() {
            for c in r.requires {
                assert!(cols.contains(c), "{c} missing from player columns");
            }
        }
        assert_eq!(player_metric_columns()[0], GLS);
    }
}
