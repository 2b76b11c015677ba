pub mod database;
mod starboard;
pub mod structs;
