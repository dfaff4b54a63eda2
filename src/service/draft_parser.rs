use crate::model::draft::{DraftInput, NormalizedDraft, RuneChoices};

/// Splits a comma separated field, trimming every piece and dropping empty ones.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parses `slot:choice` pairs separated by commas.
///
/// Entries are split on every colon and only kept if that yields exactly two
/// non-empty parts, so `a:b:c` is dropped rather than read as `a -> b:c`.
/// Later slots overwrite earlier ones.
pub fn parse_runes(raw: &str) -> RuneChoices {
    let mut runes = RuneChoices::new();

    for entry in raw.split(',') {
        let parts = entry.split(':').collect::<Vec<_>>();
        if parts.len() != 2 {
            if !entry.trim().is_empty() {
                tracing::debug!("Dropping rune entry '{}': expected exactly one ':'", entry.trim());
            }
            continue;
        }

        let (key, value) = (parts[0].trim(), parts[1].trim());
        if key.is_empty() || value.is_empty() {
            tracing::debug!("Dropping rune entry '{}': empty slot or choice", entry.trim());
            continue;
        }

        runes.insert(key.to_string(), value.to_string());
    }

    runes
}

pub fn normalize_draft(input: &DraftInput) -> NormalizedDraft {
    NormalizedDraft {
        champions: parse_list(&input.champions_text),
        lanes: parse_list(&input.lanes_text),
        runes: parse_runes(&input.runes_text),
        patch: input.patch.clone(),
        blue_side: input.blue_side,
    }
}
