pub mod channels;
pub mod guilds;
pub mod messages;
pub mod misc;
pub mod reactions;
