//! Social line parsing
//!
//! One line per profile, in one of two shapes:
//!
//! ```text
//! [*]<username>@<code>[,<description>]
//! [*]//<link>,<description>
//! ```
//!
//! The leading `*` marks a special link. On the `@` path the registry decides
//! the special flag and the `*` is ignored; on the `//` path the `*` is kept.

use crate::error::ParseError;
use crate::socials::SocialRegistry;

/// `<username>@<code>`, exactly two non-empty parts
///
/// A username may not start with `*`, which would read back as the special
/// marker once serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialHandle<'a> {
    pub username: &'a str,
    pub code: &'a str,
}

impl<'a> SocialHandle<'a> {
    pub fn parse(s: &'a str) -> Option<Self> {
        let mut parts = s.split('@');
        let username = parts.next()?;
        let code = parts.next()?;
        if parts.next().is_some()
            || username.is_empty()
            || code.is_empty()
            || username.starts_with('*')
        {
            return None;
        }
        Some(Self { username, code })
    }

    /// Accept `<code>@<username>` when only the left part is a known code
    pub fn oriented(self, registry: &SocialRegistry) -> Self {
        if !registry.is_supported(self.code) && registry.is_supported(self.username) {
            Self { username: self.code, code: self.username }
        } else {
            self
        }
    }
}

/// One resolved profile link of an artist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialRecord {
    /// Username on the platform; empty for custom links
    pub username: String,
    /// Social code as written (`x` stays `x`); empty for custom links
    pub code: String,
    pub link: String,
    pub description: String,
    /// Description field as written on the line
    pub note: String,
    pub special: bool,
    pub custom_link: bool,
    /// The source line, untouched
    pub original: String,
}

fn malformed(line: &str, reason: &'static str) -> ParseError {
    ParseError::MalformedLine { line: line.to_string(), reason }
}

impl SocialRecord {
    /// Parse one social line against `registry`
    pub fn parse(registry: &SocialRegistry, line: &str) -> Result<Self, ParseError> {
        let (marked, rest) = match line.strip_prefix('*') {
            Some(rest) => (true, rest),
            None => (false, line),
        };

        let fields: Vec<&str> = rest.split(',').collect();
        if fields.len() > 2 {
            return Err(malformed(line, "more than two comma-separated fields"));
        }
        let head = fields[0];
        let note = fields.get(1).copied();

        if head.starts_with("//") {
            let description = match note {
                Some(d) if !d.is_empty() => d,
                _ => return Err(ParseError::MissingDescription(line.to_string())),
            };
            return Ok(Self {
                username: String::new(),
                code: String::new(),
                link: head.to_string(),
                description: description.to_string(),
                note: description.to_string(),
                special: marked,
                custom_link: true,
                original: line.to_string(),
            });
        }

        if head.starts_with('*') {
            return Err(malformed(line, "more than one leading *"));
        }
        if !head.contains('@') {
            return Err(malformed(line, "not using @ or //"));
        }
        let handle = SocialHandle::parse(head).ok_or_else(|| malformed(line, "split with @"))?;

        if !registry.is_supported(handle.code) {
            return Err(ParseError::UnsupportedSocialCode(handle.code.to_string()));
        }

        let note = note.unwrap_or("");
        let link = registry.resolve_profile_link(handle.username, handle.code)?;
        let description = registry.format_description(handle.code, note)?;

        Ok(Self {
            username: handle.username.to_string(),
            code: handle.code.to_string(),
            link,
            description,
            note: note.to_string(),
            special: registry.is_special(handle.code),
            custom_link: false,
            original: line.to_string(),
        })
    }

    fn star(&self) -> &'static str {
        if self.special {
            "*"
        } else {
            ""
        }
    }

    /// `[*]<link>,<description>` as stored for the front end
    pub fn to_output_line(&self) -> String {
        format!("{}{},{}", self.star(), self.link, self.description)
    }

    /// Line in the input grammar that parses back to this record
    pub fn to_source_line(&self) -> String {
        if self.custom_link {
            return format!("{}{},{}", self.star(), self.link, self.description);
        }

        let mut line = format!("{}{}@{}", self.star(), self.username, self.code);
        if !self.note.is_empty() {
            line.push(',');
            line.push_str(&self.note);
        }
        line
    }
}
