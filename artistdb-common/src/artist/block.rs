//! Artist block parsing
//!
//! A block is one artist: an info line followed by one or more social lines.
//!
//! ```text
//! <id>[,<displayName>][,<avatarSpec>][,<alias>,...]
//! [*]<social line>
//! ...
//! ```
//!
//! Social lines that fail to parse are logged and dropped. Every other
//! failure rejects the whole block.

use super::context::ParseContext;
use super::social::{SocialHandle, SocialRecord};
use crate::error::ParseError;
use crate::socials::SocialRegistry;
use tracing::warn;

/// URL prefix under which local avatar files are served
pub const AVATAR_MOUNT: &str = "/avatar";

/// Fields of the info line, split once
#[derive(Debug, Clone, PartialEq, Eq)]
struct InfoLine<'a> {
    username: String,
    display_name: Option<&'a str>,
    avatar: &'a str,
    aliases: Vec<String>,
}

impl<'a> InfoLine<'a> {
    fn parse(line: &'a str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = line.split(',').collect();

        let username = fields[0].trim().to_lowercase();
        if username.is_empty() {
            return Err(ParseError::MissingUsername);
        }

        let display_name = fields
            .get(1)
            .copied()
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "_");
        let avatar = fields.get(2).copied().map(str::trim).unwrap_or("");

        let mut aliases: Vec<String> = Vec::new();
        for field in fields.iter().skip(3) {
            let alias = field.trim().to_lowercase();
            if !alias.is_empty() && !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }

        Ok(Self { username, display_name, avatar, aliases })
    }
}

/// How the avatar of an artist is obtained
#[derive(Debug, Clone, PartialEq, Eq)]
enum AvatarSpec<'a> {
    Social(SocialHandle<'a>),
    LocalPath(&'a str),
    Infer,
}

impl<'a> AvatarSpec<'a> {
    fn parse(spec: &'a str) -> Result<Self, ParseError> {
        if spec.contains('@') {
            return SocialHandle::parse(spec)
                .map(AvatarSpec::Social)
                .ok_or_else(|| ParseError::WrongAvatarFormat(spec.to_string()));
        }
        if spec.starts_with('/') {
            return Ok(AvatarSpec::LocalPath(spec));
        }
        if spec.is_empty() || spec == "_" {
            return Ok(AvatarSpec::Infer);
        }
        Err(ParseError::WrongAvatarFormat(spec.to_string()))
    }
}

/// One fully resolved artist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistRecord {
    /// Lowercased username
    pub id: String,
    pub display_name: String,
    pub avatar: String,
    pub socials: Vec<SocialRecord>,
    /// Lowercased, deduplicated, in declaration order
    pub aliases: Vec<String>,
    /// The info line, untouched
    pub original: String,
}

impl ArtistRecord {
    /// Parse one block, claiming its username and aliases in `ctx`
    pub fn parse(
        registry: &SocialRegistry,
        block: &str,
        ctx: &mut ParseContext,
    ) -> Result<Self, ParseError> {
        let lines: Vec<&str> = block
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() < 2 {
            return Err(ParseError::NoSocialInfo);
        }

        let info = InfoLine::parse(lines[0])?;
        ctx.claim_username(&info.username)?;

        let display_name = info.display_name.unwrap_or(info.username.as_str()).to_string();

        for alias in &info.aliases {
            ctx.claim_alias(alias)?;
        }

        let mut socials = Vec::with_capacity(lines.len() - 1);
        for line in &lines[1..] {
            match SocialRecord::parse(registry, line) {
                Ok(social) => socials.push(social),
                Err(e) if e.is_recoverable() => {
                    warn!("Dropping social line '{}' of artist {}: {}", line, info.username, e)
                }
                Err(e) => return Err(e),
            }
        }

        let avatar = resolve_avatar(registry, &info, &socials)?;

        Ok(Self {
            id: info.username,
            display_name,
            avatar,
            socials,
            aliases: info.aliases,
            original: lines[0].to_string(),
        })
    }

    /// Stored social lines, newline-joined
    pub fn output_socials(&self) -> String {
        self.socials
            .iter()
            .map(SocialRecord::to_output_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn resolve_avatar(
    registry: &SocialRegistry,
    info: &InfoLine<'_>,
    socials: &[SocialRecord],
) -> Result<String, ParseError> {
    match AvatarSpec::parse(info.avatar)? {
        AvatarSpec::Social(handle) => {
            let handle = handle.oriented(registry);
            Ok(registry.resolve_avatar_link(handle.username, handle.code)?)
        }
        AvatarSpec::LocalPath(path) => Ok(format!("{}{}", AVATAR_MOUNT, path)),
        AvatarSpec::Infer => {
            let source = socials
                .iter()
                .find(|s| !s.custom_link && registry.is_avatar_eligible(&s.code))
                .ok_or_else(|| ParseError::AvatarInferenceFailed(info.username.clone()))?;
            Ok(registry.resolve_avatar_link(&source.username, &source.code)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, RegistryError};

    fn parse(block: &str) -> Result<ArtistRecord, ParseError> {
        let mut ctx = ParseContext::new();
        ArtistRecord::parse(SocialRegistry::builtin(), block, &mut ctx)
    }

    #[test]
    fn test_minimal_block() {
        let artist = parse("alice,,instagram@alice\nalice@instagram,My bio").unwrap();

        assert_eq!(artist.id, "alice");
        assert_eq!(artist.display_name, "alice");
        assert_eq!(artist.avatar, "//unavatar.io/instagram/alice");
        assert_eq!(artist.socials.len(), 1);
        assert_eq!(artist.socials[0].code, "instagram");
        assert_eq!(artist.socials[0].username, "alice");
        assert_eq!(artist.socials[0].description, "Instagram | My bio");
        assert!(artist.aliases.is_empty());
    }

    #[test]
    fn test_username_lowercased_and_display_name() {
        let artist = parse("Alice,Alice W.,_\nalice@instagram").unwrap();
        assert_eq!(artist.id, "alice");
        assert_eq!(artist.display_name, "Alice W.");

        let artist = parse("Bob,_\nbob@github").unwrap();
        assert_eq!(artist.display_name, "bob");
    }

    #[test]
    fn test_only_info_line() {
        assert_eq!(parse("alice,Alice,_"), Err(ParseError::NoSocialInfo));
        assert_eq!(parse("alice\n\n"), Err(ParseError::NoSocialInfo));
    }

    #[test]
    fn test_empty_username() {
        assert_eq!(parse(",Alice\nalice@instagram"), Err(ParseError::MissingUsername));
    }

    #[test]
    fn test_aliases_dedup_lowercase() {
        let artist = parse("alice,,_,Ally,ally,,AL\nalice@instagram").unwrap();
        assert_eq!(artist.aliases, vec!["ally".to_string(), "al".to_string()]);
    }

    #[test]
    fn test_alias_equal_to_own_username() {
        assert_eq!(
            parse("alice,,_,alice\nalice@instagram"),
            Err(ParseError::AliasInUsernamePool("alice".into()))
        );
    }

    #[test]
    fn test_bad_social_line_is_dropped() {
        let artist = parse("alice,,_\nnot a social\nalice@myspace\nalice@github").unwrap();

        assert_eq!(artist.socials.len(), 1);
        assert_eq!(artist.socials[0].code, "github");
    }

    #[test]
    fn test_avatar_local_path() {
        let artist = parse("alice,,/alice.png\nalice@patreon").unwrap();
        assert_eq!(artist.avatar, "/avatar/alice.png");
    }

    #[test]
    fn test_avatar_explicit_social() {
        let artist = parse("alice,,alice_x@x\nalice@patreon").unwrap();
        assert_eq!(artist.avatar, "//unavatar.io/twitter/alice_x");
    }

    #[test]
    fn test_avatar_code_first_order() {
        let artist = parse("alice,,instagram@alice_ig\nalice@patreon").unwrap();
        assert_eq!(artist.avatar, "//unavatar.io/instagram/alice_ig");
    }

    #[test]
    fn test_avatar_wrong_format() {
        assert_eq!(
            parse("alice,,alice.png\nalice@instagram"),
            Err(ParseError::WrongAvatarFormat("alice.png".into()))
        );
        assert_eq!(
            parse("alice,,a@b@instagram\nalice@instagram"),
            Err(ParseError::WrongAvatarFormat("a@b@instagram".into()))
        );
    }

    #[test]
    fn test_avatar_code_not_eligible() {
        let err = parse("alice,,alice@patreon\nalice@instagram").unwrap_err();
        assert_eq!(err, ParseError::Registry(RegistryError::NotAvatarEligible("patreon".into())));
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_infer_picks_first_eligible_in_file_order() {
        let block = "alice\n//alice.example,Site\nalice_p@patreon\nalice_gh@github\nalice_ig@instagram";
        let artist = parse(block).unwrap();
        assert_eq!(artist.avatar, "//unavatar.io/github/alice_gh");
    }

    #[test]
    fn test_infer_normalizes_x() {
        let artist = parse("alice,,_\nalice_x@x").unwrap();
        assert_eq!(artist.avatar, "//unavatar.io/twitter/alice_x");
    }

    #[test]
    fn test_infer_without_eligible_social() {
        assert_eq!(
            parse("alice,,_\nalice@patreon\n//alice.example,Site"),
            Err(ParseError::AvatarInferenceFailed("alice".into()))
        );
    }

    #[test]
    fn test_output_socials() {
        let artist = parse("alice,,_\nalice@instagram\n*//alice.example,Site").unwrap();
        assert_eq!(artist.output_socials(), "instagram.com/alice,Instagram\n*//alice.example,Site");
    }
}
