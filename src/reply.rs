//! Builds the user-facing payloads for the `imagine` command. The bot sends
//! either rich embeds or bare text depending on the configured `ReplyStyle`,
//! with both the success and error shapes defined here so the command
//! handler never assembles Discord payloads itself.

use serde::{Deserialize, Serialize};
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::component::ButtonStyle;

const ACCENT_COLOR: u32 = 0x44a3e3;
const ERROR_COLOR: u32 = 0xe32424;

// Discord rejects embed field values above this many characters.
const EMBED_FIELD_LIMIT: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplyStyle {
    Embed,
    Plain,
}

impl ReplyStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyStyle::Embed => "embed",
            ReplyStyle::Plain => "plain",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "embed" | "rich" => Some(ReplyStyle::Embed),
            "plain" | "text" => Some(ReplyStyle::Plain),
            _ => None,
        }
    }
}

/// Embed announcing a finished generation: the prompt as a labeled field,
/// the image itself, and a footer naming who asked for it.
pub fn success_embed(prompt: &str, image_url: &str, requested_by: &str, avatar_url: &str) -> CreateEmbed {
    CreateEmbed::default()
        .title("Image Generated")
        .field("Prompt", truncate_field(prompt), false)
        .image(image_url)
        .color(ACCENT_COLOR)
        .footer(|footer| {
            footer
                .text(format!("Requested by {}", requested_by))
                .icon_url(avatar_url)
        })
        .to_owned()
}

/// Link-style button pointing at the generated image.
pub fn download_button(image_url: &str) -> CreateComponents {
    CreateComponents::default()
        .create_action_row(|row| {
            row.create_button(|button| {
                button
                    .label("Download")
                    .style(ButtonStyle::Link)
                    .url(image_url)
            })
        })
        .to_owned()
}

/// Embed reporting a failed generation, with the error text in a code block.
pub fn error_embed(message: &str) -> CreateEmbed {
    CreateEmbed::default()
        .title("An error occurred")
        .description(format!("```{}```", message))
        .color(ERROR_COLOR)
        .to_owned()
}

pub fn plain_success(image_url: &str) -> String {
    image_url.to_string()
}

pub fn plain_error(message: &str) -> String {
    format!("❌ Image generation failed: {}", message)
}

fn truncate_field(value: &str) -> String {
    if value.chars().count() <= EMBED_FIELD_LIMIT {
        value.to_string()
    } else {
        let mut truncated: String = value.chars().take(EMBED_FIELD_LIMIT - 3).collect();
        truncated.push_str("...");
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_style_round_trips() {
        assert_eq!(ReplyStyle::from_str("embed"), Some(ReplyStyle::Embed));
        assert_eq!(ReplyStyle::from_str("Plain"), Some(ReplyStyle::Plain));
        assert_eq!(ReplyStyle::from_str("rich"), Some(ReplyStyle::Embed));
        assert_eq!(ReplyStyle::from_str("text"), Some(ReplyStyle::Plain));
        assert_eq!(ReplyStyle::from_str("fancy"), None);
        assert_eq!(ReplyStyle::Embed.as_str(), "embed");
        assert_eq!(ReplyStyle::Plain.as_str(), "plain");
    }

    #[test]
    fn test_success_embed_contents() {
        let embed = success_embed(
            "a red fox in snow",
            "https://example/img1.png",
            "somebody",
            "https://example/avatar.png",
        );

        assert_eq!(embed.0.get("title").unwrap().as_str().unwrap(), "Image Generated");

        let image = embed.0.get("image").unwrap();
        assert_eq!(image.get("url").unwrap().as_str().unwrap(), "https://example/img1.png");

        let fields = embed.0.get("fields").unwrap().as_array().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].get("name").unwrap().as_str().unwrap(), "Prompt");
        assert_eq!(fields[0].get("value").unwrap().as_str().unwrap(), "a red fox in snow");

        let footer = embed.0.get("footer").unwrap();
        assert_eq!(
            footer.get("text").unwrap().as_str().unwrap(),
            "Requested by somebody"
        );

        assert_eq!(embed.0.get("color").unwrap().as_u64().unwrap(), 0x44a3e3);
    }

    #[test]
    fn test_success_embed_truncates_long_prompt() {
        let long_prompt = "x".repeat(3000);
        let embed = success_embed(&long_prompt, "https://example/img.png", "somebody", "");

        let fields = embed.0.get("fields").unwrap().as_array().unwrap();
        let value = fields[0].get("value").unwrap().as_str().unwrap();
        assert_eq!(value.chars().count(), EMBED_FIELD_LIMIT);
        assert!(value.ends_with("..."));
    }

    #[test]
    fn test_download_button_links_to_image() {
        let components = download_button("https://example/img1.png");

        assert_eq!(components.0.len(), 1);
        let buttons = components.0[0].get("components").unwrap().as_array().unwrap();
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].get("label").unwrap().as_str().unwrap(), "Download");
        assert_eq!(
            buttons[0].get("url").unwrap().as_str().unwrap(),
            "https://example/img1.png"
        );
        // Link-style buttons carry a URL instead of a custom id.
        assert_eq!(buttons[0].get("style").unwrap().as_u64().unwrap(), 5);
        assert!(buttons[0].get("custom_id").is_none());
    }

    #[test]
    fn test_error_embed_contents() {
        let embed = error_embed("rate limited");

        assert_eq!(embed.0.get("title").unwrap().as_str().unwrap(), "An error occurred");
        let description = embed.0.get("description").unwrap().as_str().unwrap();
        assert!(description.contains("rate limited"));
        assert_eq!(embed.0.get("color").unwrap().as_u64().unwrap(), 0xe32424);
        assert!(embed.0.get("image").is_none());
        assert!(embed.0.get("fields").is_none());
    }

    #[test]
    fn test_plain_payloads() {
        assert_eq!(plain_success("https://example/img1.png"), "https://example/img1.png");

        let error = plain_error("rate limited");
        assert!(error.contains("rate limited"));
        assert_ne!(error, "rate limited");
    }
}
