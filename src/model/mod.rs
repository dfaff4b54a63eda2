pub mod draft;
pub mod health;
pub mod prediction;
