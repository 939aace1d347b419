//! Wizard value store: merging step submissions.

use quickcluster_core::WizardValues;

/// Overlays `incoming` on `current`. Keys only in `current` are kept;
/// keys in `incoming` replace whatever `current` held.
pub fn merge(current: &WizardValues, incoming: &WizardValues) -> WizardValues {
    let mut merged = current.clone();
    for (key, value) in incoming.iter() {
        merged.insert(key, value.clone());
    }
    merged
}
