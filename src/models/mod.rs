pub mod entry;
pub mod user;

pub use entry::{cents_from_decimal, format_cents, Entry, EntryType, NewEntry};
pub use user::User;
