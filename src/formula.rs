use crate::partition::LeaguePartition;

pub const PLAYING_TIME_90S: &str = "Playing Time 90s";

type Columns = &'static [&'static str];

/// What a ratio yields when its denominator sums to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnEmpty {
    /// "No attempts" is a real 0%, not missing data.
    Zero,
    /// The cell is undefined and falls back to the catalog default.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Formula {
    /// `sum(cols) / max(1, sum(Playing Time 90s))`.
    Per90(Columns),
    /// `scale * sum(num) / sum(den)`.
    Ratio {
        num: Columns,
        den: Columns,
        scale: f64,
        on_empty: OnEmpty,
    },
    /// Plain league total.
    Total(&'static str),
    /// `sum(cols) / row_count`.
    PerPlayer(Columns),
    /// Mean of a per-player value over players that carry it.
    Mean(&'static str),
    /// Mean of a per-player percentage over players with a nonzero denominator.
    MeanOfRatios {
        value: &'static str,
        denominator: &'static str,
    },
    /// `100 * sum(member) / sum(family)` for mutually exclusive sub-counts.
    Share {
        member: &'static str,
        family: Columns,
    },
    /// `sum(actual) - sum(expected)`.
    Differential { actual: Columns, expected: Columns },
    /// `100 * (sum(total) - sum(lost)) / sum(total)`.
    Retained { total: &'static str, lost: Columns },
    /// `(3 * attacking + 2 * middle + defensive) / (attacking + middle + defensive)`.
    PressingIntensity {
        attacking: &'static str,
        middle: &'static str,
        defensive: &'static str,
    },
    /// `(100 * long / total) / (mean(completion %) / 100)`.
    DirectPlayIndex {
        long_attempts: &'static str,
        total_attempts: &'static str,
        completion_pct: &'static str,
    },
    /// Finishing and creation over expectation plus progressive actions per player / 10.
    OffensiveValueAdded {
        over_expected: Columns,
        progressive: Columns,
    },
    Estimate(Estimate),
}

/// Proxies for values the raw data does not carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Estimate {
    Constant(f64),
    /// Corners over a round-robin match count built from distinct squads.
    CornersPerMatch { corners: &'static str, fallback: f64 },
    /// Share of corners delivered in-swinging, used as a success proxy.
    CornerSuccess {
        corners: &'static str,
        delivered_in: &'static str,
        fallback: f64,
    },
    /// Share of corners not played straight.
    DirectCorners {
        corners: &'static str,
        straight: &'static str,
        fallback: f64,
    },
    /// Dead-ball shot-creating actions attributed to corners, capped at 100%.
    CornerToShot {
        corners: &'static str,
        dead_ball_sca: &'static str,
    },
}

/// Dead-ball SCAs per corner that counts as a 100% corner-to-shot rate.
const CORNER_SCA_SPREAD: f64 = 1.5;

/// Divisor applied to progressive actions per player in Offensive Value Added.
const PROGRESSIVE_SCALE: f64 = 10.0;

impl Formula {
    /// `None` when the value is undefined for this league; the caller substitutes the catalog default.
    pub fn evaluate(&self, league: &LeaguePartition<'_>) -> Option<f64> {
        let value = match *self {
            Formula::Per90(cols) => {
                let events = league.sum_of(cols)?;
                let nineties = league.sum(PLAYING_TIME_90S)?;
                events / nineties.max(1.0)
            }
            Formula::Ratio {
                num,
                den,
                scale,
                on_empty,
            } => {
                let n = league.sum_of(num)?;
                let d = league.sum_of(den)?;
                ratio(n, d, scale, on_empty)?
            }
            Formula::Total(col) => league.sum(col)?,
            Formula::PerPlayer(cols) => {
                let total = league.sum_of(cols)?;
                total / league.row_count().max(1) as f64
            }
            Formula::Mean(col) => league.mean(col)?,
            Formula::MeanOfRatios { value, denominator } => {
                league.mean_of_ratios(value, denominator)?
            }
            Formula::Share { member, family } => {
                let total = league.sum_of(family)?;
                let part = league.sum(member)?;
                if total == 0.0 {
                    return None;
                }
                100.0 * part / total
            }
            Formula::Differential { actual, expected } => {
                league.sum_of(actual)? - league.sum_of(expected)?
            }
            Formula::Retained { total, lost } => {
                let total = league.sum(total)?;
                let lost = league.sum_of(lost)?;
                if total <= 0.0 {
                    return None;
                }
                100.0 * (total - lost) / total
            }
            Formula::PressingIntensity {
                attacking,
                middle,
                defensive,
            } => {
                let att = league.sum(attacking)?;
                let mid = league.sum(middle)?;
                let def = league.sum(defensive)?;
                let total = att + mid + def;
                if total <= 0.0 {
                    return None;
                }
                (3.0 * att + 2.0 * mid + def) / total
            }
            Formula::DirectPlayIndex {
                long_attempts,
                total_attempts,
                completion_pct,
            } => {
                let total = league.sum(total_attempts)?;
                let long = league.sum(long_attempts)?;
                let completion = league.mean(completion_pct)?;
                if total <= 0.0 || completion <= 0.0 {
                    return None;
                }
                (long / total * 100.0) / (completion / 100.0)
            }
            Formula::OffensiveValueAdded {
                over_expected,
                progressive,
            } => {
                let over = league.sum_of(over_expected)?;
                let players = league.row_count().max(1) as f64;
                let mut prog = 0.0;
                for col in progressive {
                    prog += league.sum(col)? / players / PROGRESSIVE_SCALE;
                }
                over + prog
            }
            Formula::Estimate(estimate) => estimate.evaluate(league)?,
        };
        value.is_finite().then_some(value)
    }
}

impl Estimate {
    fn evaluate(&self, league: &LeaguePartition<'_>) -> Option<f64> {
        match *self {
            Estimate::Constant(v) => Some(v),
            Estimate::CornersPerMatch { corners, fallback } => {
                let total = league.sum(corners)?;
                let teams = league.squad_count() as f64;
                let matches = teams * (teams - 1.0) / 2.0;
                if matches > 0.0 {
                    Some(total / matches)
                } else {
                    Some(fallback)
                }
            }
            Estimate::CornerSuccess {
                corners,
                delivered_in,
                fallback,
            } => {
                let total = league.sum(corners)?;
                match league.sum(delivered_in) {
                    Some(inswung) if total > 0.0 => Some(100.0 * inswung / total),
                    _ => Some(fallback),
                }
            }
            Estimate::DirectCorners {
                corners,
                straight,
                fallback,
            } => {
                let total = league.sum(corners)?;
                let straight = league.sum(straight)?;
                if total > 0.0 {
                    Some(100.0 - 100.0 * straight / total)
                } else {
                    Some(fallback)
                }
            }
            Estimate::CornerToShot {
                corners,
                dead_ball_sca,
            } => {
                let total = league.sum(corners)?;
                let sca = league.sum(dead_ball_sca)?;
                if total <= 0.0 {
                    return None;
                }
                Some(100.0 * (sca / (total * CORNER_SCA_SPREAD)).min(1.0))
            }
        }
    }
}

fn ratio(num: f64, den: f64, scale: f64, on_empty: OnEmpty) -> Option<f64> {
    if den > 0.0 {
        return Some(scale * num / den);
    }
    match on_empty {
        OnEmpty::Zero => Some(0.0),
        OnEmpty::Default => None,
    }
}
