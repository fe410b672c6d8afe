//! Skeleton-case normalization for media filenames.

/// Convert arbitrary text to skeleton case.
///
/// ASCII letters are lowercased, every run of characters outside `[a-z0-9]`
/// collapses to a single `-`, and leading/trailing dashes are dropped. Total
/// and idempotent; the empty string maps to itself.
pub fn normalize(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_dash = false;

    for ch in value.chars() {
        let lowered = ch.to_ascii_lowercase();
        if lowered.is_ascii_lowercase() || lowered.is_ascii_digit() {
            if pending_dash {
                out.push('-');
                pending_dash = false;
            }
            out.push(lowered);
        } else if !out.is_empty() {
            pending_dash = true;
        }
    }

    out
}
