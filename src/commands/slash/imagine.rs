//! Image generation slash command: /imagine

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

use crate::models;

/// Creates image generation commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_imagine_command()]
}

/// Creates the imagine command, with the model choice list generated from
/// the catalog so the descriptor can never drift from what the bot accepts.
fn create_imagine_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("imagine")
        .description("Generate an image using a prompt.")
        .create_option(|option| {
            option
                .name("prompt")
                .description("Enter your prompt")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            let option = option
                .name("model")
                .description("The image model")
                .kind(CommandOptionType::String)
                .required(false);
            for choice in models::MODELS {
                option.add_string_choice(choice.label, choice.id);
            }
            option
        })
        .to_owned()
}
