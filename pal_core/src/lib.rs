#![warn(clippy::pedantic)]
// ids go into the database as i64 and come back out as u64.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::unreadable_literal,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]

pub mod config;
pub mod data;
pub mod emojis;
