//! Parallel evaluation of a feature list over many objects.

use common::parallel::try_par_map_limited;

use crate::channel::ChannelStack;
use crate::error::Result;
use crate::features::{FeatureInput, FeatureList};
use crate::mask::ObjectMask;
use crate::session::FeatureSession;

/// One row of feature values per object, in input order.
///
/// Every object gets its own [`FeatureSession`]; at most `max_concurrent`
/// objects are evaluated at once. The first failing object aborts the run.
///
/// # Panics
///
/// Panics if `max_concurrent` is 0.
pub fn evaluate_objects(
    features: &FeatureList,
    masks: &[ObjectMask],
    stack: &dyn ChannelStack,
    max_concurrent: usize,
) -> Result<Vec<Vec<f64>>> {
    let rows = try_par_map_limited(masks, max_concurrent, |index, mask| {
        let session = FeatureSession::new();
        let row = features.calculate(&FeatureInput::new(mask, stack), &session);
        if let Err(err) = &row {
            tracing::warn!(index, %err, "feature evaluation failed");
        }
        row
    })?;
    tracing::debug!(
        objects = masks.len(),
        features = features.len(),
        "evaluated features"
    );
    Ok(rows)
}
