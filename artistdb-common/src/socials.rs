//! Social code registry
//!
//! Static table of the social codes accepted in the artist file. Each entry
//! knows its display name, its profile link template and whether the avatar
//! service can derive an avatar from it. `x` is an alias of `twitter`.
//!
//! Build the table once with [`SocialRegistry::builtin`] and share the
//! reference; it is never mutated afterwards.

use crate::error::RegistryError;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Placeholder substituted with the username in profile templates
const USERNAME_PLACEHOLDER: &str = "<@>";

/// Protocol-relative base of the avatar service
pub const AVATAR_SERVICE_BASE: &str = "//unavatar.io";

/// One registered social code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialDefinition {
    pub code: &'static str,
    pub display_name: &'static str,
    /// Profile link template; `None` for avatar-only codes
    pub profile: Option<&'static str>,
    pub avatar_eligible: bool,
    pub special: bool,
}

/// Immutable lookup table of social codes
#[derive(Debug, Clone)]
pub struct SocialRegistry {
    entries: HashMap<&'static str, SocialDefinition>,
}

static BUILTIN: Lazy<SocialRegistry> = Lazy::new(SocialRegistry::new);

// (code, display name, profile template)
const AVATAR_CODES: &[(&str, &str, Option<&str>)] = &[
    ("deviantart", "DeviantArt", Some("deviantart.com/<@>")),
    ("dribbble", "Dribbble", Some("dribbble.com/<@>")),
    ("duckduckgo", "DuckDuckGo", None),
    ("facebook", "Facebook", Some("fb.com/<@>")),
    ("fb", "Facebook", Some("fb.com/<@>")),
    ("github", "GitHub", Some("github.com/<@>")),
    ("google", "Google", None),
    ("gravatar", "Gravatar", None),
    ("instagram", "Instagram", Some("instagram.com/<@>")),
    ("microlink", "Microlink", None),
    ("readcv", "ReadCV", Some("read.cv/<@>")),
    ("reddit", "Reddit", Some("reddit.com/user/<@>")),
    ("soundcloud", "SoundCloud", Some("soundcloud.com/<@>")),
    ("subscribestar", "SubscribeStar", Some("subscribestar.adult/<@>")),
    ("substack", "Substack", Some("<@>.substack.com/")),
    ("telegram", "Telegram", Some("t.me/<@>")),
    ("twitter", "𝕏", Some("twitter.com/<@>")),
    ("youtube", "YouTube", Some("youtube.com/@<@>")),
];

const EXTENDED_CODES: &[(&str, &str, Option<&str>)] = &[
    ("artstation", "ArtStation", Some("www.artstation.com/<@>")),
    ("bluesky", "BlueSky", Some("bsky.app/profile/<@>")),
    ("boosty", "Boosty", Some("boosty.to/<@>")),
    ("booth", "Booth.pm", Some("<@>.booth.pm")),
    ("bsky", "BlueSky", Some("bsky.app/profile/<@>")),
    ("carrd.co", "Carrd.co", Some("<@>.carrd.co")),
    ("fa", "FurAffinity 🐾", Some("www.furaffinity.net/user/<@>/")),
    ("fanbox", "PixivFanbox", Some("<@>.fanbox.cc")),
    ("gumroad", "Gumroad", Some("<@>.gumroad.com")),
    ("itaku", "Itaku", Some("itaku.ee/profile/<@>")),
    ("itch.io", "Itch.io", Some("itch.io/profile/<@>")),
    ("kofi", "Ko-fi 🍵", Some("ko-fi.com/<@>")),
    ("linktr.ee", "Linktr.ee 🌲", Some("linktr.ee/<@>")),
    ("lit.link", "Lit.link", Some("lit.link/<@>")),
    ("patreon", "Patreon", Some("www.patreon.com/<@>")),
    ("picarto", "Picarto", Some("www.picarto.tv/<@>")),
    ("pixiv", "Pixiv", Some("www.pixiv.net/en/users/<@>")),
    ("plurk", "Plurk", Some("plurk.com/<@>")),
    ("potofu.me", "Potofu.me", Some("potofu.me/<@>")),
    ("skeb", "Skeb.jp", Some("skeb.jp/@<@>")),
    ("threads", "Threads", Some("www.threads.net/@<@>")),
    ("tumblr", "Tumblr", Some("<@>.tumblr.com")),
    ("twitch", "Twitch", Some("www.twitch.tv/<@>")),
];

// Link-in-bio style pages rendered differently by the front end
const SPECIAL_CODES: &[&str] = &["potofu.me", "carrd.co", "linktr.ee", "lit.link"];

/// Map the `x` alias onto `twitter`; every other code is returned as is
pub fn normalize_code(code: &str) -> &str {
    if code == "x" {
        "twitter"
    } else {
        code
    }
}

impl SocialRegistry {
    /// Build the registry from the compiled-in tables
    pub fn new() -> Self {
        let mut entries = HashMap::new();

        let groups = [(AVATAR_CODES, true), (EXTENDED_CODES, false)];
        for (table, avatar_eligible) in groups {
            for &(code, display_name, profile) in table {
                entries.insert(
                    code,
                    SocialDefinition {
                        code,
                        display_name,
                        profile,
                        avatar_eligible,
                        special: SPECIAL_CODES.contains(&code),
                    },
                );
            }
        }

        Self { entries }
    }

    /// Process-wide shared instance
    pub fn builtin() -> &'static SocialRegistry {
        &BUILTIN
    }

    /// Definition for `code` (after `x` normalization)
    pub fn get(&self, code: &str) -> Option<&SocialDefinition> {
        self.entries.get(normalize_code(code))
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn is_avatar_eligible(&self, code: &str) -> bool {
        self.get(code).is_some_and(|def| def.avatar_eligible)
    }

    pub fn is_special(&self, code: &str) -> bool {
        self.get(code).is_some_and(|def| def.special)
    }

    /// Substitute `username` into the profile template of `code`
    pub fn resolve_profile_link(&self, username: &str, code: &str) -> Result<String, RegistryError> {
        let def = self
            .get(code)
            .ok_or_else(|| RegistryError::NotFound(code.to_string()))?;
        let template = def
            .profile
            .ok_or_else(|| RegistryError::NoProfileLink(code.to_string()))?;

        Ok(template.replacen(USERNAME_PLACEHOLDER, username, 1))
    }

    /// Protocol-relative avatar service URL for `username` on `code`
    pub fn resolve_avatar_link(&self, username: &str, code: &str) -> Result<String, RegistryError> {
        let def = self
            .get(code)
            .ok_or_else(|| RegistryError::NotFound(code.to_string()))?;
        if !def.avatar_eligible {
            return Err(RegistryError::NotAvatarEligible(code.to_string()));
        }

        Ok(format!("{}/{}/{}", AVATAR_SERVICE_BASE, def.code, username))
    }

    /// Combine the code's display name with a free-form description
    ///
    /// - display name only: `"Instagram"`
    /// - description only (unknown code): the description verbatim
    /// - both: `"Instagram | My bio"`
    pub fn format_description(&self, code: &str, raw: &str) -> Result<String, RegistryError> {
        let display_name = self.get(code).map(|def| def.display_name).unwrap_or("");

        match (display_name.is_empty(), raw.is_empty()) {
            (false, true) => Ok(display_name.to_string()),
            (true, false) => Ok(raw.to_string()),
            (false, false) => Ok(format!("{} | {}", display_name, raw)),
            (true, true) => Err(RegistryError::EmptyDescription(code.to_string())),
        }
    }
}

impl Default for SocialRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_is_twitter() {
        let registry = SocialRegistry::builtin();

        assert!(registry.is_supported("x"));
        assert_eq!(
            registry.resolve_profile_link("foo", "x").unwrap(),
            registry.resolve_profile_link("foo", "twitter").unwrap()
        );
        assert_eq!(registry.resolve_profile_link("foo", "x").unwrap(), "twitter.com/foo");
        assert_eq!(registry.is_avatar_eligible("x"), registry.is_avatar_eligible("twitter"));
        assert_eq!(
            registry.resolve_avatar_link("foo", "x").unwrap(),
            "//unavatar.io/twitter/foo"
        );
    }

    #[test]
    fn test_supported_covers_both_groups() {
        let registry = SocialRegistry::builtin();

        assert!(registry.is_supported("instagram"));
        assert!(registry.is_supported("patreon"));
        assert!(!registry.is_supported("myspace"));

        assert!(registry.is_avatar_eligible("instagram"));
        assert!(!registry.is_avatar_eligible("patreon"));
        assert!(!registry.is_avatar_eligible("myspace"));
    }

    #[test]
    fn test_profile_link_templates() {
        let registry = SocialRegistry::builtin();

        assert_eq!(registry.resolve_profile_link("alice", "instagram").unwrap(), "instagram.com/alice");
        assert_eq!(registry.resolve_profile_link("alice", "substack").unwrap(), "alice.substack.com/");
        assert_eq!(registry.resolve_profile_link("alice", "youtube").unwrap(), "youtube.com/@alice");
        assert_eq!(
            registry.resolve_profile_link("alice", "myspace"),
            Err(RegistryError::NotFound("myspace".into()))
        );
        assert_eq!(
            registry.resolve_profile_link("alice", "gravatar"),
            Err(RegistryError::NoProfileLink("gravatar".into()))
        );
    }

    #[test]
    fn test_avatar_link_requires_eligibility() {
        let registry = SocialRegistry::builtin();

        assert_eq!(
            registry.resolve_avatar_link("alice", "instagram").unwrap(),
            "//unavatar.io/instagram/alice"
        );
        assert_eq!(
            registry.resolve_avatar_link("alice", "patreon"),
            Err(RegistryError::NotAvatarEligible("patreon".into()))
        );
        assert_eq!(
            registry.resolve_avatar_link("alice", "myspace"),
            Err(RegistryError::NotFound("myspace".into()))
        );
    }

    #[test]
    fn test_format_description() {
        let registry = SocialRegistry::builtin();

        assert_eq!(registry.format_description("instagram", "").unwrap(), "Instagram");
        assert_eq!(registry.format_description("instagram", "My bio").unwrap(), "Instagram | My bio");
        assert_eq!(registry.format_description("myspace", "Old page").unwrap(), "Old page");
        assert_eq!(
            registry.format_description("myspace", ""),
            Err(RegistryError::EmptyDescription("myspace".into()))
        );
    }

    #[test]
    fn test_special_codes() {
        let registry = SocialRegistry::builtin();

        assert!(registry.is_special("linktr.ee"));
        assert!(registry.is_special("carrd.co"));
        assert!(!registry.is_special("instagram"));
        assert!(!registry.is_special("myspace"));
    }
}
