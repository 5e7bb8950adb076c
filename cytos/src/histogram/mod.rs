//! Intensity histograms of channel values under a mask.


use crate::channel::{Channel, Voxels};
use crate::error::{Error, Result};
use crate::mask::ObjectMask;
use crate::voxel::{Voxel, VoxelBuffer};

/// Voxel counts per integer intensity in `0..=max_value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: Vec<u64>,
    total: u64,
}

impl Histogram {
    pub fn new(max_value: u32) -> Self {
        Self {
            counts: vec![0; max_value as usize + 1],
            total: 0,
        }
    }

    #[inline]
    pub fn max_bin(&self) -> u32 {
        (self.counts.len() - 1) as u32
    }

    /// Counts one voxel of `value`, clamped into the histogram's range.
    #[inline]
    pub fn increment(&mut self, value: u32) {
        self.increment_by(value, 1);
    }

    pub fn increment_by(&mut self, value: u32, count: u64) {
        let bin = (value as usize).min(self.counts.len() - 1);
        self.counts[bin] += count;
        self.total += count;
    }

    #[inline]
    pub fn count(&self, value: u32) -> u64 {
        self.counts.get(value as usize).copied().unwrap_or(0)
    }

    #[inline]
    pub fn total_count(&self) -> u64 {
        self.total
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    fn nonzero_bins(&self) -> impl DoubleEndedIterator<Item = (u32, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(v, &c)| (v as u32, c))
    }

    pub fn min_value(&self) -> Option<u32> {
        self.nonzero_bins().next().map(|(v, _)| v)
    }

    pub fn max_value(&self) -> Option<u32> {
        self.nonzero_bins().next_back().map(|(v, _)| v)
    }

    /// Sum of all counted intensities.
    pub fn sum(&self) -> f64 {
        self.nonzero_bins().map(|(v, c)| v as f64 * c as f64).sum()
    }

    pub fn mean(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.sum() / self.total as f64)
    }

    /// Population variance.
    pub fn variance(&self) -> Option<f64> {
        let mean = self.mean()?;
        let sum_sq: f64 = self
            .nonzero_bins()
            .map(|(v, c)| {
                let d = v as f64 - mean;
                d * d * c as f64
            })
            .sum();
        Some(sum_sq / self.total as f64)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    /// Mean, or `empty_value` when nothing was counted.
    #[inline]
    pub fn mean_or(&self, empty_value: f64) -> f64 {
        self.mean().unwrap_or(empty_value)
    }

    #[inline]
    pub fn std_dev_or(&self, empty_value: f64) -> f64 {
        self.std_dev().unwrap_or(empty_value)
    }

    /// Nearest-rank quantile: the smallest value whose cumulative count
    /// reaches `ceil(p * total)` (at least one voxel).
    ///
    /// `Ok(None)` for an empty histogram.
    pub fn quantile(&self, p: f64) -> Result<Option<u32>> {
        if !(0.0..=1.0).contains(&p) {
            return Err(Error::invalid("quantile", format!("{p} is not in [0, 1]")));
        }
        if self.is_empty() {
            return Ok(None);
        }
        let rank = nearest_rank(p, self.total);
        let mut cumulative = 0u64;
        for (v, c) in self.nonzero_bins() {
            cumulative += c;
            if cumulative >= rank {
                return Ok(Some(v));
            }
        }
        Ok(self.max_value())
    }

    /// Histogram of the `n` brightest voxels, taken from the highest values
    /// down. The lowest retained bin may be partial. Everything is kept when
    /// fewer than `n` voxels were counted.
    pub fn extract_top_n(&self, n: u64) -> Histogram {
        let mut out = Histogram::new(self.max_bin());
        let mut remaining = n;
        for (v, c) in self.nonzero_bins().rev() {
            if remaining == 0 {
                break;
            }
            let take = c.min(remaining);
            out.increment_by(v, take);
            remaining -= take;
        }
        out
    }

    /// Number of voxels with a value strictly greater than `value`.
    pub fn count_above(&self, value: u32) -> u64 {
        self.counts
            .iter()
            .skip(value as usize + 1)
            .sum()
    }

    /// Adds the counts of `other`, growing the range if needed.
    pub fn add(&mut self, other: &Histogram) {
        if other.counts.len() > self.counts.len() {
            self.counts.resize(other.counts.len(), 0);
        }
        for (dst, &src) in self.counts.iter_mut().zip(&other.counts) {
            *dst += src;
        }
        self.total += other.total;
    }
}

/// Largest bin a histogram built from a channel may have.
pub const MAX_HISTOGRAM_VALUE: u32 = (1 << 20) - 1;

/// `ceil(p * total)`, at least 1. Products within rounding noise of a whole
/// number count as that number, so `0.07 * 100` is rank 7.
fn nearest_rank(p: f64, total: u64) -> u64 {
    let exact = p * total as f64;
    let whole = exact.round();
    let rank = if (exact - whole).abs() <= exact.abs().max(1.0) * 1e-9 {
        whole
    } else {
        exact.ceil()
    };
    (rank as u64).clamp(1, total)
}

/// Histogram range for a channel: the full type range for integer types up to
/// 16 bits, otherwise the rounded channel maximum. Fails when that maximum is
/// beyond [`MAX_HISTOGRAM_VALUE`].
fn max_value_for(channel: &Channel) -> Result<u32> {
    match channel.voxels() {
        Voxels::U8(_) => Ok(u8::MAX as u32),
        Voxels::U16(_) => Ok(u16::MAX as u32),
        Voxels::I32(_) | Voxels::F32(_) => {
            let max = channel.max_value().map_or(0.0, |m| m.round().max(0.0));
            if max > MAX_HISTOGRAM_VALUE as f64 {
                return Err(Error::invalid(
                    "histogram",
                    format!("channel maximum {max} exceeds {MAX_HISTOGRAM_VALUE}"),
                ));
            }
            Ok(max as u32)
        }
    }
}

fn count_under_mask<T: Voxel>(
    hist: &mut Histogram,
    buffer: &VoxelBuffer<T>,
    mask: &ObjectMask,
    exclude_zero: bool,
) -> usize {
    let extent = buffer.extent();
    let mut skipped = 0;
    for p in mask.on_points() {
        if !extent.contains(p) {
            skipped += 1;
            continue;
        }
        let value: f64 = buffer.get(p).as_();
        let value = value.round().max(0.0) as u32;
        if exclude_zero && value == 0 {
            continue;
        }
        hist.increment(value);
    }
    skipped
}

/// Counts the channel intensity of every on voxel of `mask`.
///
/// On voxels outside the channel are skipped. Float and negative intensities
/// are rounded and clamped to the histogram's integer range, so a channel
/// normalized to `[0, 1]` only fills bins 0 and 1.
pub fn build(channel: &Channel, mask: &ObjectMask, exclude_zero: bool) -> Result<Histogram> {
    let mut hist = Histogram::new(max_value_for(channel)?);
    let skipped = match channel.voxels() {
        Voxels::U8(b) => count_under_mask(&mut hist, b, mask, exclude_zero),
        Voxels::U16(b) => count_under_mask(&mut hist, b, mask, exclude_zero),
        Voxels::I32(b) => count_under_mask(&mut hist, b, mask, exclude_zero),
        Voxels::F32(b) => count_under_mask(&mut hist, b, mask, exclude_zero),
    };
    if skipped > 0 {
        tracing::debug!(skipped, bbox = %mask.bbox(), "mask voxels outside the channel");
    }
    tracing::trace!(total = hist.total_count(), exclude_zero, "built histogram");
    Ok(hist)
}
