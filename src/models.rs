use anyhow::Result;

/// One selectable generation model: the Replicate model reference plus the
/// label shown in the slash command's choice list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelChoice {
    pub id: &'static str,
    pub label: &'static str,
}

/// Every model the bot offers. The first entry is the default when the user
/// leaves the `model` option empty. Ids are either `owner/name` (official
/// models) or `owner/name:version` (version-pinned community models); both
/// forms must stay under Discord's 100-character choice value limit.
pub const MODELS: &[ModelChoice] = &[
    ModelChoice {
        id: "black-forest-labs/flux-schnell",
        label: "FLUX.1 [schnell] - fast, good default",
    },
    ModelChoice {
        id: "stability-ai/sdxl:39ed52f2a78e934b3ba6e2a89f5b1c712de7dfea535525255b1aa35c5565e08b",
        label: "Stable Diffusion XL",
    },
    ModelChoice {
        id: "ai-forever/kandinsky-2.2:ad9d7879fbffa2874e1d909d1d37d9bc682889cc65b31f7bb00d2362619f194a",
        label: "Kandinsky 2.2",
    },
    ModelChoice {
        id: "playgroundai/playground-v2-1024px-aesthetic",
        label: "Playground v2 - aesthetic",
    },
];

pub fn default_model() -> &'static str {
    MODELS[0].id
}

/// Maps the user's optional `model` selection to a catalog entry. Discord
/// already restricts the option to the declared choices, but the value still
/// arrives as free text on the wire, so unknown ids are rejected here too.
pub fn resolve(selector: Option<&str>) -> Result<&'static str> {
    match selector {
        None => Ok(default_model()),
        Some(id) => MODELS
            .iter()
            .find(|choice| choice.id == id)
            .map(|choice| choice.id)
            .ok_or_else(|| anyhow::anyhow!("Unknown model '{}'", id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_is_first_entry() {
        assert_eq!(default_model(), MODELS[0].id);
    }

    #[test]
    fn test_resolve_without_selector_uses_default() {
        assert_eq!(resolve(None).unwrap(), default_model());
    }

    #[test]
    fn test_resolve_known_model() {
        for choice in MODELS {
            assert_eq!(resolve(Some(choice.id)).unwrap(), choice.id);
        }
    }

    #[test]
    fn test_resolve_unknown_model() {
        let result = resolve(Some("acme/not-a-model"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("acme/not-a-model"));
    }

    #[test]
    fn test_catalog_fits_discord_choice_limits() {
        assert!(MODELS.len() <= 25, "Discord allows at most 25 choices");
        for choice in MODELS {
            assert!(!choice.id.is_empty());
            assert!(choice.id.len() <= 100, "choice value too long: {}", choice.id);
            assert!(!choice.label.is_empty());
            assert!(choice.label.len() <= 100, "choice label too long: {}", choice.label);
        }
    }

    #[test]
    fn test_catalog_has_no_duplicate_ids() {
        for (i, a) in MODELS.iter().enumerate() {
            for b in &MODELS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
