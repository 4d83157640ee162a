//! Read-side models served to the route layer

use crate::{Error, Result};
use serde::Serialize;

/// One stored profile link, parsed back from `[*]<link>,<description>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredSocial {
    pub link: String,
    pub description: String,
    pub special: bool,
}

impl StoredSocial {
    pub fn parse(line: &str) -> Result<Self> {
        let (special, rest) = match line.strip_prefix('*') {
            Some(rest) => (true, rest),
            None => (false, line),
        };

        let fields: Vec<&str> = rest.split(',').collect();
        if fields.len() != 2 {
            return Err(Error::InvalidInput(format!("Invalid stored social line: {}", line)));
        }

        Ok(Self {
            link: fields[0].to_string(),
            description: fields[1].to_string(),
            special,
        })
    }
}

/// Artist as the front end sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredArtist {
    pub id: String,
    pub display_name: String,
    pub avatar: String,
    pub socials: Vec<StoredSocial>,
    pub aliases: Vec<String>,
}

impl StoredArtist {
    /// Avatar URL usable in a page; protocol-relative links become https
    pub fn avatar_url(&self) -> String {
        if self.avatar.starts_with("//") {
            format!("https:{}", self.avatar)
        } else {
            self.avatar.clone()
        }
    }
}
