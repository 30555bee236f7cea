//! Public Land Survey System composite code.

/// Builds `S{section} T{township} R{range} {quarter call}` from the parts
/// that are present.
///
/// Quarters are taken coarse-first (`qtr1`, then `qtr2`) but written
/// `qtr2 + qtr1` when both are present, matching the registry's QTR
/// convention. `qtr1` alone is written as-is; a lone `qtr2` contributes
/// nothing.
///
/// Returns `None` when no part is present.
pub fn compose(
    section: Option<&str>,
    township: Option<&str>,
    range: Option<&str>,
    qtr1: Option<&str>,
    qtr2: Option<&str>,
) -> Option<String> {
    let mut parts = Vec::with_capacity(4);
    if let Some(section) = section {
        parts.push(format!("S{section}"));
    }
    if let Some(township) = township {
        parts.push(format!("T{township}"));
    }
    if let Some(range) = range {
        parts.push(format!("R{range}"));
    }
    match (qtr2, qtr1) {
        (Some(qtr2), Some(qtr1)) => parts.push(format!("{qtr2}{qtr1}")),
        (None, Some(qtr1)) => parts.push(qtr1.to_string()),
        (_, None) => {}
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
