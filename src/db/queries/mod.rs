pub mod counters;
pub mod entries;
pub mod users;
