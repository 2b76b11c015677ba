use std::sync::atomic::Ordering;

use pal_core::data::structs::{Data, Error};
use poise::serenity_prelude::{self as serenity, ActivityData, Ready};

pub async fn ready(ctx: &serenity::Context, ready: &Ready, data: &Data) -> Result<(), Error> {
    tracing::info!(
        "Logged in as {} in {} guild(s)",
        ready.user.tag(),
        ready.guilds.len()
    );

    // ready fires again on every reconnect.
    if data.has_started.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    ctx.set_activity(Some(ActivityData::watching(format!(
        "for {}help",
        data.config.prefix
    ))));

    tracing::info!(
        "Startup took {:.2}s",
        data.time_started.elapsed().as_secs_f64()
    );
    Ok(())
}
