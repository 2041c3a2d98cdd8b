use crate::{error::ReporterError, types::ConstLabels};

/// Combine two const label sets.
///
/// Every label of `from` is kept. Labels of `to` are added, and a label name that
/// `from` already carries is a [`ReporterError::LabelCollision`].
pub fn merge_labels(from: &ConstLabels, to: &ConstLabels) -> Result<ConstLabels, ReporterError> {
    let mut merged = from.clone();
    for (label, value) in to {
        if merged.contains_key(label) {
            return Err(ReporterError::LabelCollision(label.to_owned()));
        }
        merged.insert(label.to_owned(), value.to_owned());
    }
    Ok(merged)
}
