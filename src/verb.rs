//! HTTP verbs accepted by the script pipeline and their template classes.

use crate::error::ScriptError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Read,
    Create,
    Update,
    Replace,
    Delete,
}

impl Verb {
    pub const ALL: [Verb; 5] = [Verb::Read, Verb::Create, Verb::Update, Verb::Replace, Verb::Delete];

    /// Template file suffix. Update and replace share one template class.
    pub fn suffix(self) -> &'static str {
        match self {
            Verb::Read => ".read.sql",
            Verb::Create => ".write.sql",
            Verb::Update | Verb::Replace => ".update.sql",
            Verb::Delete => ".delete.sql",
        }
    }

    /// True for verbs that run inside a transaction.
    pub fn is_write(self) -> bool {
        !matches!(self, Verb::Read)
    }

    pub fn method(self) -> &'static str {
        match self {
            Verb::Read => "GET",
            Verb::Create => "POST",
            Verb::Update => "PATCH",
            Verb::Replace => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

impl FromStr for Verb {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "GET" => Verb::Read,
            "POST" => Verb::Create,
            "PATCH" => Verb::Update,
            "PUT" => Verb::Replace,
            "DELETE" => Verb::Delete,
            other => return Err(ScriptError::UnsupportedVerb(other.to_string())),
        })
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_methods() {
        for verb in Verb::ALL {
            assert_eq!(verb.method().parse::<Verb>().unwrap(), verb);
        }
    }

    #[test]
    fn rejects_other_methods() {
        for m in ["OPTIONS", "HEAD", "get", ""] {
            assert!(matches!(m.parse::<Verb>(), Err(ScriptError::UnsupportedVerb(_))));
        }
    }

    #[test]
    fn update_and_replace_share_suffix() {
        assert_eq!(Verb::Update.suffix(), Verb::Replace.suffix());
        assert!(!Verb::Read.is_write());
        assert!(Verb::Delete.is_write());
    }
}
