//! Common error types for ArtistDB
//!
//! Three layers:
//! - [`RegistryError`]: social code lookups
//! - [`ParseError`]: line and block grammar, cross-record uniqueness
//! - [`Error`]: everything a caller of the crate can see

use thiserror::Error;

/// Common result type for ArtistDB operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by [`crate::SocialRegistry`] lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("social code not found: {0}")]
    NotFound(String),

    #[error("social code does not support avatars: {0}")]
    NotAvatarEligible(String),

    #[error("social code has no profile link: {0}")]
    NoProfileLink(String),

    /// Unknown display name and empty raw description
    #[error("social code not found and description is empty: {0}")]
    EmptyDescription(String),
}

/// Coarse classification of a [`ParseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Lookup,
    Duplicate,
    Inference,
    IncompleteBlock,
}

/// Errors raised while parsing the artist file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Social line does not match `[*](//link,desc | user@code[,desc])`
    #[error("social must have a format of username@socialcode[,description] or //link,description: {line} ({reason})")]
    MalformedLine { line: String, reason: &'static str },

    #[error("custom social link needs a description: {0}")]
    MissingDescription(String),

    #[error("avatar must have a format of username@socialcode or /path, leave empty or use underscore to auto infer: {0}")]
    WrongAvatarFormat(String),

    #[error("artist info line has an empty username")]
    MissingUsername,

    #[error("social code is not supported: {0}")]
    UnsupportedSocialCode(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("duplicate username: {0}")]
    DuplicateUsername(String),

    #[error("duplicate alias: {0}")]
    DuplicateAlias(String),

    #[error("alias is already used as a username: {0}")]
    AliasInUsernamePool(String),

    #[error("username is already used as an alias: {0}")]
    UsernameInAliasPool(String),

    #[error("could not infer avatar from socials of {0}")]
    AvatarInferenceFailed(String),

    #[error("artist has no social info")]
    NoSocialInfo,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::MalformedLine { .. }
            | ParseError::MissingDescription(_)
            | ParseError::WrongAvatarFormat(_)
            | ParseError::MissingUsername
            | ParseError::Registry(RegistryError::EmptyDescription(_)) => ErrorKind::Format,
            ParseError::UnsupportedSocialCode(_) | ParseError::Registry(_) => ErrorKind::Lookup,
            ParseError::DuplicateUsername(_)
            | ParseError::DuplicateAlias(_)
            | ParseError::AliasInUsernamePool(_)
            | ParseError::UsernameInAliasPool(_) => ErrorKind::Duplicate,
            ParseError::AvatarInferenceFailed(_) => ErrorKind::Inference,
            ParseError::NoSocialInfo => ErrorKind::IncompleteBlock,
        }
    }

    /// Errors a social line can raise; the line is dropped, the block kept
    ///
    /// Format and lookup errors of the info line or the avatar spec reject
    /// the whole block and are not recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ParseError::MalformedLine { .. }
                | ParseError::MissingDescription(_)
                | ParseError::UnsupportedSocialCode(_)
                | ParseError::Registry(RegistryError::NoProfileLink(_))
                | ParseError::Registry(RegistryError::EmptyDescription(_))
        )
    }
}

/// Common error type across ArtistDB
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fatal error in one artist block; aborts the whole pass
    #[error("Parse error in artist block '{artist}': {source}")]
    Parse {
        artist: String,
        #[source]
        source: ParseError,
    },

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input (e.g. corrupt stored row)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let malformed = ParseError::MalformedLine { line: "x".into(), reason: "no @" };
        assert_eq!(malformed.kind(), ErrorKind::Format);
        assert!(malformed.is_recoverable());

        let lookup = ParseError::UnsupportedSocialCode("myspace".into());
        assert_eq!(lookup.kind(), ErrorKind::Lookup);
        assert!(lookup.is_recoverable());

        let empty = ParseError::from(RegistryError::EmptyDescription("zzz".into()));
        assert_eq!(empty.kind(), ErrorKind::Format);

        let not_found = ParseError::from(RegistryError::NotFound("zzz".into()));
        assert_eq!(not_found.kind(), ErrorKind::Lookup);

        assert_eq!(ParseError::DuplicateAlias("a".into()).kind(), ErrorKind::Duplicate);
        assert!(!ParseError::DuplicateAlias("a".into()).is_recoverable());
        assert!(ParseError::from(RegistryError::NoProfileLink("gravatar".into())).is_recoverable());
    }

    #[test]
    fn test_block_level_errors_are_not_recoverable() {
        let fatal = [
            ParseError::WrongAvatarFormat("nope".into()),
            ParseError::MissingUsername,
            ParseError::from(RegistryError::NotAvatarEligible("bandcamp".into())),
            ParseError::from(RegistryError::NotFound("myspace".into())),
            ParseError::AvatarInferenceFailed("a".into()),
            ParseError::NoSocialInfo,
        ];
        for err in fatal {
            assert!(!err.is_recoverable(), "{:?} should be fatal", err);
        }
        assert_eq!(ParseError::WrongAvatarFormat("nope".into()).kind(), ErrorKind::Format);
        assert_eq!(ParseError::AvatarInferenceFailed("a".into()).kind(), ErrorKind::Inference);
        assert_eq!(ParseError::NoSocialInfo.kind(), ErrorKind::IncompleteBlock);
    }
}
