pub mod draft_parser;
pub mod predictapi;
