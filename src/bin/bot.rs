use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use serenity::async_trait;
use serenity::model::application::interaction::Interaction;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use muse::commands::slash::{register_global_commands, register_guild_commands};
use muse::commands::CommandHandler;
use muse::config::Config;
use muse::replicate::ReplicateClient;

struct Handler {
    command_handler: Arc<CommandHandler>,
    test_guild_id: Option<GuildId>,
}

impl Handler {
    fn new(command_handler: CommandHandler, test_guild_id: Option<u64>) -> Self {
        Handler {
            command_handler: Arc::new(command_handler),
            test_guild_id: test_guild_id.map(GuildId),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected and ready!", ready.user.name);
        info!("Connected to {} guilds", ready.guilds.len());

        // Guild registration propagates instantly, global takes up to an hour
        let registration = match self.test_guild_id {
            Some(guild_id) => register_guild_commands(&ctx, guild_id).await,
            None => register_global_commands(&ctx).await,
        };

        if let Err(e) = registration {
            error!("Failed to register slash commands: {}", e);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            if let Err(e) = self.command_handler.handle_slash_command(&ctx, &command).await {
                error!("Error handling slash command '{}': {}", command.data.name, e);

                let error_message =
                    "❌ Sorry, I encountered an error processing your command. Please try again.";

                // Try to edit the deferred response, fallback to a new response if that fails
                if command
                    .edit_original_interaction_response(&ctx.http, |response| {
                        response.content(error_message)
                    })
                    .await
                    .is_err()
                {
                    let _ = command
                        .create_interaction_response(&ctx.http, |response| {
                            response
                                .kind(serenity::model::application::interaction::InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message.content(error_message)
                                })
                        })
                        .await;
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting muse with {} replies...", config.reply_style.as_str());

    let replicate = ReplicateClient::new(config.replicate_api_key.clone());
    let command_handler = CommandHandler::new(replicate, config.reply_style);
    let handler = Handler::new(command_handler, config.test_guild_id);

    // Slash commands arrive as interactions, no message intents needed
    let intents = GatewayIntents::GUILDS;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {}", e);
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");

    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {:?}", why);
        return Err(anyhow::anyhow!("Failed to establish gateway connection: {}", why));
    }

    Ok(())
}
