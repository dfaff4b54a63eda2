use std::collections::BTreeMap;

pub const DEFAULT_PATCH: &str = "14.10";

/// Rune slot -> rune choice.
pub type RuneChoices = BTreeMap<String, String>;

/// Draft exactly as typed into the form.
#[derive(Debug, Clone)]
pub struct DraftInput {
    pub champions_text: String,
    pub lanes_text: String,
    pub runes_text: String,
    pub patch: String,
    pub blue_side: bool,
}

impl Default for DraftInput {
    fn default() -> Self {
        Self {
            champions_text: String::new(),
            lanes_text: String::new(),
            runes_text: String::new(),
            patch: DEFAULT_PATCH.to_string(),
            blue_side: true,
        }
    }
}

/// Draft after normalization, ready to be sent to the prediction service.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDraft {
    pub champions: Vec<String>,
    pub lanes: Vec<String>,
    pub runes: RuneChoices,
    pub patch: String,
    pub blue_side: bool,
}
