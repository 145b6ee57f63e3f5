// ── Entity identity ──
//
// `platform.object_id` identifiers, e.g. "light.lobby_tablet_screen".
// Normalized on construction so service-call lookups are exact string
// matches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier for one entity: a platform name and a slugified object id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Build from a platform and a free-form object name.
    ///
    /// The object name is slugified: lowercased, with whitespace and
    /// punctuation collapsed to underscores.
    pub fn new(platform: &str, object: &str) -> Self {
        Self(format!("{platform}.{}", slugify(object)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The platform segment ("light", "sensor", ...), if well-formed.
    pub fn platform(&self) -> Option<&str> {
        self.0.split_once('.').map(|(p, _)| p)
    }

    /// The object segment after the platform.
    pub fn object_id(&self) -> Option<&str> {
        self.0.split_once('.').map(|(_, o)| o)
    }
}

fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut last_was_sep = true;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }
    if slug.ends_with('_') {
        slug.pop();
    }
    slug
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_slugifies_object_name() {
        let id = EntityId::new("light", "Lobby Tablet Screen");
        assert_eq!(id.as_str(), "light.lobby_tablet_screen");
    }

    #[test]
    fn platform_and_object_segments() {
        let id: EntityId = "sensor.kiosk1_battery_level".parse().unwrap();
        assert_eq!(id.platform(), Some("sensor"));
        assert_eq!(id.object_id(), Some("kiosk1_battery_level"));
    }

    #[test]
    fn slugify_collapses_punctuation() {
        let id = EntityId::new("switch", "Back-Office  (2nd floor)");
        assert_eq!(id.as_str(), "switch.back_office_2nd_floor");
    }

    #[test]
    fn display_roundtrip() {
        let id = EntityId::from("media_player.kiosk1");
        assert_eq!(id.to_string(), "media_player.kiosk1");
    }
}
