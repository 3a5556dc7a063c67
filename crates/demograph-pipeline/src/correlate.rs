//! Correlation of per-URL outcomes back to caller names.

use std::collections::HashMap;

use indexmap::IndexMap;

use demograph_models::{detection_rate, ImageBatch, ImageOutcome, Prediction};

/// Map every input name to the prediction for its URL.
///
/// The output key set equals the input name set exactly: names aliasing
/// one URL each get an independent copy of that URL's outcome, and a name
/// whose URL failed anywhere in the pipeline gets an explicit null
/// prediction, never an absence. Pure and idempotent.
pub fn correlate(
    batch: &ImageBatch,
    outcomes: &HashMap<String, ImageOutcome>,
) -> IndexMap<String, Prediction> {
    batch
        .iter()
        .map(|(name, url)| {
            let prediction = outcomes
                .get(url)
                .map(Prediction::from)
                .unwrap_or_else(Prediction::null);
            (name.clone(), prediction)
        })
        .collect()
}

/// Detection rate over the processed images, as a percentage rounded to
/// two decimals. Summary/report data only, not part of the caller
/// response.
pub fn batch_detection_rate(outcomes: &HashMap<String, ImageOutcome>) -> f64 {
    let detected = outcomes.values().filter(|o| o.is_detected()).count();
    detection_rate(detected, outcomes.len())
}
