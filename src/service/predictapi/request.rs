use json::{object::Object, JsonValue};

use crate::model::draft::NormalizedDraft;

pub fn build_request_body(draft: &NormalizedDraft) -> JsonValue {
    let mut runes = Object::new();
    for (slot, choice) in &draft.runes {
        runes.insert(slot, choice.as_str().into());
    }

    let mut body = Object::new();
    body.insert("champions", draft.champions.clone().into());
    body.insert("lanes", draft.lanes.clone().into());
    body.insert("runes", JsonValue::Object(runes));
    body.insert("patch", draft.patch.as_str().into());
    body.insert("blue_side", draft.blue_side.into());
    JsonValue::Object(body)
}
