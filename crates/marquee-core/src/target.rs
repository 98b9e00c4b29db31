//! Target specification normalization.
//!
//! Authoring data may describe a move's target as a single string
//! (`"enemy"`) or as a list of tags (`["team", "teamstrike"]`). Both forms are
//! normalized once, at the registry boundary, into a [`TargetSpec`]: one
//! [`BaseTarget`] chosen by fixed precedence plus the full ordered tag list.
//! Downstream code never sees the raw authored form.
//!
//! # Precedence
//!
//! `self` > `ally` > `enemy` > `team`/`party`. When no base tag is present the
//! base defaults to [`BaseTarget::Enemy`].
//!
//! # Example
//!
//! ```
//! use marquee_core::target::{BaseTarget, TargetInput, TargetSpec};
//!
//! let spec = TargetSpec::from_input(&TargetInput::Many(vec![
//!     "Enemy".into(),
//!     " self ".into(),
//!     "revive".into(),
//! ]));
//! assert_eq!(spec.base(), BaseTarget::SelfTarget);
//! assert_eq!(spec.tags(), ["enemy", "self", "revive"]);
//! assert!(spec.has_tag("revive"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// The side a move is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseTarget {
    /// The acting combatant.
    #[serde(rename = "self")]
    SelfTarget,
    /// One chosen party member.
    Ally,
    /// The opposing combatant.
    Enemy,
    /// Every living party member.
    Team,
}

impl BaseTarget {
    /// All bases, in precedence order.
    pub const ALL: [Self; 4] = [Self::SelfTarget, Self::Ally, Self::Enemy, Self::Team];

    /// Parses a single tag into a base target. `party` is an alias of `team`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "self" => Some(Self::SelfTarget),
            "ally" => Some(Self::Ally),
            "enemy" => Some(Self::Enemy),
            "team" | "party" => Some(Self::Team),
            _ => None,
        }
    }

    /// Returns the canonical tag for this base.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SelfTarget => "self",
            Self::Ally => "ally",
            Self::Enemy => "enemy",
            Self::Team => "team",
        }
    }
}

impl fmt::Display for BaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authored target: one string or a list of tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetInput {
    /// A single tag, such as `"enemy"`.
    One(String),
    /// An ordered list of tags.
    Many(Vec<String>),
}

impl TargetInput {
    fn raw_tags(&self) -> Vec<&str> {
        match self {
            Self::One(tag) => vec![tag.as_str()],
            Self::Many(tags) => tags.iter().map(String::as_str).collect(),
        }
    }
}

/// Normalized target: a base plus lowercase, deduplicated tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetSpec {
    base: BaseTarget,
    tags: Vec<String>,
}

impl TargetSpec {
    /// Creates a spec aimed at `base` with no extra modifiers.
    #[must_use]
    pub fn new(base: BaseTarget) -> Self {
        Self {
            base,
            tags: vec![base.as_str().to_string()],
        }
    }

    /// Normalizes an authored target.
    #[must_use]
    pub fn from_input(input: &TargetInput) -> Self {
        Self::from_tags(input.raw_tags())
    }

    /// Normalizes raw tags: trims, lowercases, drops empties and duplicates.
    pub fn from_tags<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags: Vec<String> = Vec::new();
        for tag in raw {
            let tag = tag.as_ref().trim().to_lowercase();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        let base = Self::precedence_base(&tags).unwrap_or(BaseTarget::Enemy);
        Self { base, tags }
    }

    fn precedence_base(tags: &[String]) -> Option<BaseTarget> {
        BaseTarget::ALL
            .into_iter()
            .find(|base| tags.iter().any(|t| BaseTarget::from_tag(t) == Some(*base)))
    }

    /// Returns the base target.
    #[must_use]
    pub const fn base(&self) -> BaseTarget {
        self.base
    }

    /// Returns every normalized tag in authored order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns true when `tag` (already lowercase) is present.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns true when any of `tags` is present.
    #[must_use]
    pub fn has_any(&self, tags: &[&str]) -> bool {
        tags.iter().any(|t| self.has_tag(t))
    }

    /// Returns every base named by the tags, in [`BaseTarget::ALL`] order.
    ///
    /// Unlike [`TargetSpec::base`], this keeps all bases, which is what preview
    /// labels need. Defaults to enemy when no base tag is present.
    #[must_use]
    pub fn bases(&self) -> Vec<BaseTarget> {
        let named: Vec<BaseTarget> = BaseTarget::ALL
            .into_iter()
            .filter(|base| self.tags.iter().any(|t| BaseTarget::from_tag(t) == Some(*base)))
            .collect();
        if named.is_empty() {
            vec![BaseTarget::Enemy]
        } else {
            named
        }
    }

    /// Returns true when the move reaches the whole team.
    #[must_use]
    pub fn hits_team(&self) -> bool {
        self.has_any(&["team", "party"])
    }
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self::new(BaseTarget::Enemy)
    }
}
