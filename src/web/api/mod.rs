pub mod catalog;
pub mod categories;
pub mod error;
pub mod view;
