use pal_commands::utils::{bot_permissions, handle_cooldown};
use pal_core::data::structs::{Context, Data, Error};
use pal_core::emojis::{Question, X};
use poise::serenity_prelude::{self as serenity, CreateAllowedMentions, Permissions};

async fn handle_command_error(ctx: Context<'_>, error: Error) {
    tracing::warn!("Error in command `{}`: {error:?}", ctx.command().name);
    let _ = ctx.say("Something went wrong while running this command.").await;
}

async fn handle_not_owner_error(ctx: Context<'_>) {
    let _ = ctx.say("Only bot owners can call this command").await;
}

/// Replies when the bot can talk, otherwise reacts to the invoking message.
async fn reply_or_react<F>(ctx: Context<'_>, reaction: serenity::ReactionType, reply: F)
where
    F: std::future::Future<Output = ()>,
{
    match ctx {
        poise::Context::Application(_) => reply.await,
        poise::Context::Prefix(pctx) => {
            let Ok(permissions) = bot_permissions(ctx) else {
                return;
            };

            if permissions.send_messages() {
                reply.await;
            } else if permissions.add_reactions() {
                let _ = pctx.msg.react(ctx.http(), reaction).await;
            }
        }
    }
}

async fn handle_command_check_failed(ctx: Context<'_>, error: Option<Error>) {
    let text_response = async {
        let mut embed = serenity::CreateEmbed::new()
            .title("You do not have permission to access this command.")
            .colour(serenity::Colour::RED);
        if let Some(err) = error {
            embed = embed.description(err.to_string());
        }
        let msg = poise::CreateReply::default().embed(embed);
        let _ = ctx.send(msg).await;
    };

    reply_or_react(ctx, X::reaction(), text_response).await;
}

async fn handle_argument_parse_error(ctx: Context<'_>, input: Option<String>, error: Error) {
    let text_response = async {
        let usage = ctx
            .command()
            .help_text
            .as_deref()
            .unwrap_or("Please check the help menu for usage information");
        let response = match input {
            Some(input) => format!("**Cannot parse `{input}` as argument: {error}**\n{usage}"),
            None => format!("**{error}**\n{usage}"),
        };
        let mentions = CreateAllowedMentions::new()
            .everyone(false)
            .all_roles(false)
            .all_users(false);
        let _ = ctx
            .send(
                poise::CreateReply::default()
                    .content(response)
                    .allowed_mentions(mentions),
            )
            .await;
    };

    reply_or_react(ctx, Question::reaction(), text_response).await;
}

fn permission_list(permissions: Permissions) -> String {
    permissions
        .get_permission_names()
        .iter()
        .map(|p| format!("`{p}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

async fn handle_missing_user_permissions(ctx: Context<'_>, missing: Option<Permissions>) {
    let response = match missing {
        Some(missing) => format!(
            "You need {} to use this command.",
            permission_list(missing)
        ),
        None => "Could not check your permissions for this command.".to_owned(),
    };
    let _ = ctx
        .send(
            poise::CreateReply::default()
                .content(response)
                .ephemeral(true),
        )
        .await;
}

async fn handle_missing_bot_permissions(ctx: Context<'_>, missing: Permissions) {
    let text_response = async {
        let response = format!("I need {} to do that.", permission_list(missing));
        let _ = ctx.say(response).await;
    };

    reply_or_react(ctx, X::reaction(), text_response).await;
}

pub async fn handler(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => handle_command_error(ctx, error).await,
        poise::FrameworkError::NotAnOwner { ctx, .. } => handle_not_owner_error(ctx).await,
        poise::FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            handle_command_check_failed(ctx, error).await;
        }
        poise::FrameworkError::ArgumentParse {
            error, input, ctx, ..
        } => handle_argument_parse_error(ctx, input, error).await,
        poise::FrameworkError::MissingUserPermissions {
            missing_permissions,
            ctx,
            ..
        } => handle_missing_user_permissions(ctx, missing_permissions).await,
        poise::FrameworkError::MissingBotPermissions {
            missing_permissions,
            ctx,
            ..
        } => handle_missing_bot_permissions(ctx, missing_permissions).await,
        poise::FrameworkError::EventHandler { error, event, .. } => {
            tracing::warn!("Error in {} event handler: {error}", event.snake_case_name());
        }
        poise::FrameworkError::CooldownHit {
            remaining_cooldown,
            ctx,
            ..
        } => {
            let _ = handle_cooldown(remaining_cooldown, ctx).await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {}
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::warn!("Error while handling error: {e}");
            }
        }
    }
}
