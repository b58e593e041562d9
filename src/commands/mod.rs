pub mod check_catalog;
pub mod discover;
