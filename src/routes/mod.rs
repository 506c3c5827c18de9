pub mod categories;
pub mod daily;
pub mod export;
pub mod tracker;
