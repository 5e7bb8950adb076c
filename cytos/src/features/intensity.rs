use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{DilateConfig, ErodeConfig, ShellConfig};
use crate::error::Result;
use crate::histogram::Histogram;
use crate::session::FeatureSession;

use super::FeatureInput;

/// Which voxels an intensity statistic is taken over.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    #[default]
    Object,
    Shell(ShellConfig),
    Eroded(ErodeConfig),
    Dilated(DilateConfig),
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Object => write!(f, "object"),
            Region::Shell(c) => write!(f, "shell{}_{}", c.dilation_iterations, c.erosion_iterations),
            Region::Eroded(c) => write!(f, "eroded{}", c.iterations),
            Region::Dilated(c) => write!(f, "dilated{}", c.iterations),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Statistic {
    #[default]
    Mean,
    StdDev,
    /// Nearest-rank quantile, `p` in `[0, 1]`.
    Quantile(f64),
    /// Mean of the `n` brightest voxels.
    MeanOfBrightest(u64),
    Max,
    Min,
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Mean => write!(f, "mean"),
            Statistic::StdDev => write!(f, "std_dev"),
            Statistic::Quantile(p) => write!(f, "quantile{:.0}", p * 100.0),
            Statistic::MeanOfBrightest(n) => write!(f, "brightest{n}"),
            Statistic::Max => write!(f, "max"),
            Statistic::Min => write!(f, "min"),
        }
    }
}

impl Statistic {
    fn apply(&self, hist: &Histogram, empty_value: f64) -> Result<f64> {
        Ok(match self {
            Statistic::Mean => hist.mean_or(empty_value),
            Statistic::StdDev => hist.std_dev_or(empty_value),
            Statistic::Quantile(p) => hist.quantile(*p)?.map_or(empty_value, f64::from),
            Statistic::MeanOfBrightest(n) => hist.extract_top_n(*n).mean_or(empty_value),
            Statistic::Max => hist.max_value().map_or(empty_value, f64::from),
            Statistic::Min => hist.min_value().map_or(empty_value, f64::from),
        })
    }
}

pub(super) fn intensity(
    input: &FeatureInput<'_>,
    session: &FeatureSession,
    channel_index: usize,
    region: &Region,
    statistic: &Statistic,
    exclude_zero: bool,
    empty_value: f64,
) -> Result<f64> {
    let channel = input.stack.channel(channel_index)?;
    let mask = input.mask;
    let region_mask = match region {
        Region::Object => None,
        Region::Shell(config) => Some(session.shell(mask, config)?),
        Region::Eroded(config) => Some(session.eroded(mask, config)?),
        Region::Dilated(config) => Some(session.dilated(mask, config)?),
    };
    let hist = session.histogram(
        channel_index,
        channel,
        region_mask.as_deref().unwrap_or(mask),
        exclude_zero,
    )?;
    statistic.apply(&hist, empty_value)
}
