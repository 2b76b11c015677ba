#![warn(clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::unreadable_literal,
    clippy::cast_precision_loss
)]

pub mod owner;
pub mod prefix;
pub mod starboard;
pub mod utils;

pub use pal_core::data::structs::{Command, Context, Data, Error, PrefixContext};

#[must_use]
pub fn commands() -> Vec<crate::Command> {
    starboard::commands()
        .into_iter()
        .chain(prefix::commands())
        .chain(owner::commands())
        .chain([help()])
        .collect()
}

/// Show help for a command.
#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Command to show help for"]
    #[rest]
    command: Option<String>,
) -> Result<(), Error> {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            extra_text_at_bottom: "Commands are guild only and need Manage Server unless noted.",
            ..Default::default()
        },
    )
    .await?;
    Ok(())
}

/// Refuses every command from blacklisted users, owners excepted.
pub async fn command_check(ctx: Context<'_>) -> Result<bool, Error> {
    let user_id = ctx.author().id;
    if ctx.data().is_owner(user_id) {
        return Ok(true);
    }

    Ok(!ctx.data().database.is_blacklisted(user_id))
}
