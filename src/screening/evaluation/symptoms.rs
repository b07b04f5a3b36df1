use tracing::debug;

/// Counts reported symptoms found in the canonical vocabulary.
///
/// Matching trims the reported text and ignores case. Duplicates are counted
/// each time they are reported.
pub fn count_symptoms<R, C>(reported: &[R], canonical: &[C]) -> usize
where
    R: AsRef<str>,
    C: AsRef<str>,
{
    let count = reported
        .iter()
        .filter(|symptom| {
            let needle = symptom.as_ref().trim().to_lowercase();
            canonical
                .iter()
                .any(|known| known.as_ref().to_lowercase() == needle)
        })
        .count();
    debug!(count, "canonical symptoms counted");
    count
}
