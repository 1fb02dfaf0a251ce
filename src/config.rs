use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

use crate::reply::ReplyStyle;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub discord_token: String,
    pub replicate_api_key: String,
    pub reply_style: ReplyStyle,
    pub log_level: String,
    pub test_guild_id: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            discord_token: env::var("BOT_TOKEN")
                .map_err(|_| anyhow::anyhow!("BOT_TOKEN environment variable not set"))?,
            replicate_api_key: env::var("REPLICATE_API_KEY")
                .map_err(|_| anyhow::anyhow!("REPLICATE_API_KEY environment variable not set"))?,
            reply_style: match env::var("REPLY_STYLE") {
                Ok(raw) => ReplyStyle::from_str(&raw)
                    .ok_or_else(|| anyhow::anyhow!("REPLY_STYLE must be 'embed' or 'plain', got '{}'", raw))?,
                Err(_) => ReplyStyle::Embed,
            },
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            test_guild_id: match env::var("TEST_GUILD_ID") {
                Ok(raw) => Some(
                    raw.parse()
                        .map_err(|_| anyhow::anyhow!("TEST_GUILD_ID must be a numeric guild id, got '{}'", raw))?,
                ),
                Err(_) => None,
            },
        })
    }
}
