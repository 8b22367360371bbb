//! IRI and label helpers shared by the parsers and the graph builder.

/// Local part of an IRI: the `#` fragment if present, else the last `/`
/// segment. Falls back to the input when that part is empty.
pub fn local_name(iri: &str) -> &str {
    let tail = match iri.rsplit_once('#') {
        Some((_, fragment)) => fragment,
        None => iri
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(iri),
    };
    if tail.is_empty() {
        iri
    } else {
        tail
    }
}

/// Human-facing label with the fallback chain
/// explicit label → preferred label → comment → local name → raw IRI.
///
/// Underscores are rendered as spaces.
pub fn display_label(
    label: Option<&str>,
    pref_label: Option<&str>,
    comment: Option<&str>,
    iri: &str,
) -> String {
    let raw = [label, pref_label, comment]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| local_name(iri));

    let rendered = raw.replace('_', " ").trim().to_string();
    if rendered.is_empty() {
        iri.to_string()
    } else {
        rendered
    }
}
