//! Discord slash command definitions and registration.

mod imagine;

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::Command;
use serenity::model::application::interaction::application_command::CommandDataOption;
use serenity::model::id::GuildId;
use serenity::prelude::Context;

/// Creates all slash command definitions
pub fn create_slash_commands() -> Vec<CreateApplicationCommand> {
    let mut commands = Vec::new();

    // Image generation
    commands.extend(imagine::create_commands());

    commands
}

/// Registers all slash commands globally
pub async fn register_global_commands(ctx: &Context) -> Result<()> {
    let slash_commands = create_slash_commands();

    Command::set_global_application_commands(&ctx.http, |commands| {
        for command in slash_commands {
            commands.add_application_command(command);
        }
        commands
    })
    .await?;

    info!("Global slash commands registered successfully");
    Ok(())
}

/// Registers all slash commands for a specific guild (faster for testing)
pub async fn register_guild_commands(ctx: &Context, guild_id: GuildId) -> Result<()> {
    let slash_commands = create_slash_commands();

    guild_id
        .set_application_commands(&ctx.http, |commands| {
            for command in slash_commands {
                commands.add_application_command(command);
            }
            commands
        })
        .await?;

    info!(
        "Guild slash commands registered successfully for guild: {}",
        guild_id
    );
    Ok(())
}

/// Utility function to get string option from slash command
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models;
    use serde_json::json;

    #[test]
    fn test_create_slash_commands() {
        let commands = create_slash_commands();
        assert_eq!(commands.len(), 1, "Should have exactly one command");

        let name = commands[0].0.get("name").unwrap().as_str().unwrap();
        assert_eq!(name, "imagine");
    }

    #[test]
    fn test_imagine_command_options() {
        let commands = create_slash_commands();
        let options = commands[0].0.get("options").unwrap().as_array().unwrap();
        assert_eq!(options.len(), 2);

        let prompt = &options[0];
        assert_eq!(prompt.get("name").unwrap().as_str().unwrap(), "prompt");
        assert_eq!(prompt.get("required").unwrap().as_bool().unwrap(), true);
        assert!(prompt.get("choices").is_none());

        let model = &options[1];
        assert_eq!(model.get("name").unwrap().as_str().unwrap(), "model");
        assert_eq!(model.get("required").unwrap().as_bool().unwrap(), false);

        let choices = model.get("choices").unwrap().as_array().unwrap();
        assert_eq!(choices.len(), models::MODELS.len());
        for (choice, expected) in choices.iter().zip(models::MODELS) {
            assert_eq!(choice.get("name").unwrap().as_str().unwrap(), expected.label);
            assert_eq!(choice.get("value").unwrap().as_str().unwrap(), expected.id);
        }
    }

    #[test]
    fn test_get_string_option() {
        let options: Vec<CommandDataOption> = serde_json::from_value(json!([
            {"name": "prompt", "value": "a red fox in snow", "type": 3},
            {"name": "model", "value": "black-forest-labs/flux-schnell", "type": 3}
        ]))
        .unwrap();

        assert_eq!(
            get_string_option(&options, "prompt"),
            Some("a red fox in snow".to_string())
        );
        assert_eq!(
            get_string_option(&options, "model"),
            Some("black-forest-labs/flux-schnell".to_string())
        );
        assert_eq!(get_string_option(&options, "missing"), None);
    }
}
