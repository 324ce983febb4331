//! Purpose: Shared default output path derivation for the CLI.
//! Exports: `default_output_path`.
//! Role: Keep output naming policy in one place, away from argument handling.
//! Invariants: The split happens on the FIRST dot of the whole path string;
//! existing downstream tooling depends on this exact naming, dots and all.

/// Derive `<base>-cleaned.<ext>` from the input path string.
///
/// `base` is everything before the first dot and `ext` is the segment between
/// the first and second dots, so multi-dot names collapse: `a.b.c.geojson`
/// becomes `a-cleaned.b`. A path with no dot gets a literal `.geojson`.
pub(crate) fn default_output_path(input: &str) -> String {
    let mut parts = input.splitn(3, '.');
    let base = parts.next().unwrap_or(input);
    match parts.next() {
        Some(extension) => format!("{base}-cleaned.{extension}"),
        None => format!("{base}-cleaned.geojson"),
    }
}
