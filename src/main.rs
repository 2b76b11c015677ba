#![warn(clippy::pedantic)]
#![allow(clippy::unreadable_literal)]

mod data;
mod error;

use std::sync::Arc;
use std::time::Duration;

use pal_core::config::BotConfig;
use pal_core::data::structs::Error;
use poise::serenity_prelude as serenity;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env loaded: {e}");
    }

    if let Err(e) = run().await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Error> {
    let config = BotConfig::from_env()?;
    let token = config.token.clone();
    let owners = config.owners.clone();

    let data = data::setup(config).await?;
    let pool = data.database.db.clone();

    let options = poise::FrameworkOptions {
        commands: pal_commands::commands(),
        owners,
        prefix_options: poise::PrefixFrameworkOptions {
            dynamic_prefix: Some(|ctx| Box::pin(data::dynamic_prefix(ctx))),
            mention_as_prefix: true,
            edit_tracker: Some(Arc::new(poise::EditTracker::for_timespan(
                Duration::from_secs(600),
            ))),
            ..Default::default()
        },

        on_error: |error| Box::pin(error::handler(error)),

        pre_command: |ctx| {
            Box::pin(async move {
                tracing::info!(
                    "{} ({}) ran `{}`",
                    ctx.author().name,
                    ctx.author().id,
                    ctx.invocation_string()
                );
            })
        },

        command_check: Some(|ctx| Box::pin(pal_commands::command_check(ctx))),

        event_handler: |ctx, event, framework, data| {
            Box::pin(pal_events::event_handler(ctx, event, framework, data))
        },

        skip_checks_for_owners: false,
        ..Default::default()
    };

    let framework = poise::Framework::builder()
        .options(options)
        .setup(move |_ctx, _ready, _framework| Box::pin(async move { Ok(data) }))
        .build();

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let mut settings = serenity::Settings::default();
    settings.max_messages = 1000;

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .cache_settings(settings)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        wait_until_shutdown().await;
        tracing::info!("Shutting down...");
        shard_manager.shutdown_all().await;
    });

    client.start().await?;
    pool.close().await;

    Ok(())
}

async fn wait_until_shutdown() {
    use tokio::signal::unix as signal;

    let (Ok(mut s1), Ok(mut s2), Ok(mut s3)) = (
        signal::signal(signal::SignalKind::hangup()),
        signal::signal(signal::SignalKind::interrupt()),
        signal::signal(signal::SignalKind::terminate()),
    ) else {
        tracing::warn!("Could not install signal handlers, falling back to ctrl-c");
        let _ = tokio::signal::ctrl_c().await;
        return;
    };

    tokio::select!(
        _ = s1.recv() => {},
        _ = s2.recv() => {},
        _ = s3.recv() => {},
    );
}
