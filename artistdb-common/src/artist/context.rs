//! Pass-scoped uniqueness state
//!
//! Usernames and aliases share one namespace: a name may be claimed once,
//! either as a username or as an alias. The context lives for exactly one
//! pass of the [`super::DatasetBuilder`].

use crate::error::ParseError;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct ParseContext {
    usernames: HashSet<String>,
    aliases: HashSet<String>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a (lowercased) username
    pub fn claim_username(&mut self, username: &str) -> Result<(), ParseError> {
        if self.usernames.contains(username) {
            return Err(ParseError::DuplicateUsername(username.to_string()));
        }
        if self.aliases.contains(username) {
            return Err(ParseError::UsernameInAliasPool(username.to_string()));
        }
        self.usernames.insert(username.to_string());
        Ok(())
    }

    /// Claim a (lowercased) alias
    pub fn claim_alias(&mut self, alias: &str) -> Result<(), ParseError> {
        if self.usernames.contains(alias) {
            return Err(ParseError::AliasInUsernamePool(alias.to_string()));
        }
        if self.aliases.contains(alias) {
            return Err(ParseError::DuplicateAlias(alias.to_string()));
        }
        self.aliases.insert(alias.to_string());
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty() && self.aliases.is_empty()
    }

    /// Forget every claim and release the memory
    pub fn reset(&mut self) {
        self.usernames = HashSet::new();
        self.aliases = HashSet::new();
    }
}
