//! Dispatch for slash commands delivered over the gateway.

pub mod slash;

use anyhow::Result;
use log::{error, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;

use crate::models;
use crate::replicate::ReplicateClient;
use crate::reply::{self, ReplyStyle};
use slash::get_string_option;

#[derive(Clone)]
pub struct CommandHandler {
    replicate: ReplicateClient,
    reply_style: ReplyStyle,
}

impl CommandHandler {
    pub fn new(replicate: ReplicateClient, reply_style: ReplyStyle) -> Self {
        CommandHandler {
            replicate,
            reply_style,
        }
    }

    pub async fn handle_slash_command(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        info!(
            "Processing slash command: {} from user: {}",
            command.data.name, command.user.id
        );

        match command.data.name.as_str() {
            "imagine" => {
                self.handle_imagine(ctx, command).await?;
            }
            _ => {
                command
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message.content("Unknown command.")
                            })
                    })
                    .await?;
            }
        }

        Ok(())
    }

    async fn handle_imagine(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let prompt = get_string_option(&command.data.options, "prompt")
            .ok_or_else(|| anyhow::anyhow!("Missing prompt parameter"))?;
        let model = get_string_option(&command.data.options, "model");

        // Discord expects an acknowledgment within 3 seconds; generation
        // takes far longer, so defer before touching the inference API.
        command
            .create_interaction_response(&ctx.http, |response| {
                response.kind(InteractionResponseType::DeferredChannelMessageWithSource)
            })
            .await?;

        match self.generate(model.as_deref(), &prompt).await {
            Ok(image_url) => self.send_success(ctx, command, &prompt, &image_url).await,
            Err(e) => {
                error!("Image generation failed: {}", e);
                self.send_error(ctx, command, &e.to_string()).await
            }
        }
    }

    /// Resolves the model selection, runs it, and hands back the first
    /// generated image URL.
    async fn generate(&self, selector: Option<&str>, prompt: &str) -> Result<String> {
        let model = models::resolve(selector)?;
        let outputs = self.replicate.run(model, prompt).await?;
        outputs
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("The model returned no output"))
    }

    async fn send_success(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
        prompt: &str,
        image_url: &str,
    ) -> Result<()> {
        match self.reply_style {
            ReplyStyle::Embed => {
                let embed = reply::success_embed(
                    prompt,
                    image_url,
                    &command.user.name,
                    &command.user.face(),
                );
                let components = reply::download_button(image_url);

                command
                    .edit_original_interaction_response(&ctx.http, |response| {
                        response.set_embed(embed).set_components(components)
                    })
                    .await?;
            }
            ReplyStyle::Plain => {
                command
                    .edit_original_interaction_response(&ctx.http, |response| {
                        response.content(reply::plain_success(image_url))
                    })
                    .await?;
            }
        }

        Ok(())
    }

    async fn send_error(
        &self,
        ctx: &Context,
        command: &ApplicationCommandInteraction,
        message: &str,
    ) -> Result<()> {
        match self.reply_style {
            ReplyStyle::Embed => {
                let embed = reply::error_embed(message);
                command
                    .edit_original_interaction_response(&ctx.http, |response| {
                        response.set_embed(embed)
                    })
                    .await?;
            }
            ReplyStyle::Plain => {
                command
                    .edit_original_interaction_response(&ctx.http, |response| {
                        response.content(reply::plain_error(message))
                    })
                    .await?;
            }
        }

        Ok(())
    }
}
