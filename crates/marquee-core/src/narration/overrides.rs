//! Fully authored narration.
//!
//! A [`TextOverride`] replaces generated narration for one move. Its effect
//! templates render in the order they were authored, not in canonical
//! priority order, so the table keeps JSON object order when it loads.
//!
//! ```json
//! {
//!   "sig:rocky:haymaker": {
//!     "intro": "{actor} winds up...",
//!     "effectText": { "damageDealt": "{enemy} eats {value} damage!" },
//!     "outro": ["The crowd goes wild."]
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use super::composer::cue_for;
use super::phase::{default_phase, Phase};
use super::template::{render_template, Names, HEADLINE};
use super::NarrationLine;
use crate::effect::{EffectKey, EffectMap, EffectValue};
use crate::moves::{MoveKey, TableError};

/// One line or several, as authored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
enum Lines {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl Lines {
    fn into_vec(self) -> Vec<String> {
        let raw = match self {
            Self::None => Vec::new(),
            Self::One(line) => vec![line],
            Self::Many(lines) => lines,
        };
        raw.into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Effect templates in authored order.
#[derive(Debug, Clone, Default)]
struct OrderedTemplates(Vec<(EffectKey, Vec<String>)>);

impl<'de> Deserialize<'de> for OrderedTemplates {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TemplatesVisitor;

        impl<'de> Visitor<'de> for TemplatesVisitor {
            type Value = OrderedTemplates;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from effect keys to templates")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, lines)) = map.next_entry::<String, Lines>()? {
                    entries.push((EffectKey::parse(&key), lines.into_vec()));
                }
                Ok(OrderedTemplates(entries))
            }
        }

        deserializer.deserialize_map(TemplatesVisitor)
    }
}

const fn show_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOverride {
    #[serde(default)]
    intro: Lines,
    #[serde(default)]
    effect_text: OrderedTemplates,
    #[serde(default)]
    outro: Lines,
    #[serde(default = "show_by_default")]
    show_effects: bool,
}

/// Authored narration for one move.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawOverride")]
pub struct TextOverride {
    /// Opening lines. Empty means the generic headline.
    pub intro: Vec<String>,
    /// Templates per effect key, in authored order.
    pub effect_text: Vec<(EffectKey, Vec<String>)>,
    /// Closing lines.
    pub outro: Vec<String>,
    /// When false, effect templates are skipped entirely.
    pub show_effects: bool,
}

impl From<RawOverride> for TextOverride {
    fn from(raw: RawOverride) -> Self {
        Self {
            intro: raw.intro.into_vec(),
            effect_text: raw.effect_text.0,
            outro: raw.outro.into_vec(),
            show_effects: raw.show_effects,
        }
    }
}

impl Default for TextOverride {
    fn default() -> Self {
        Self {
            intro: Vec::new(),
            effect_text: Vec::new(),
            outro: Vec::new(),
            show_effects: true,
        }
    }
}

impl TextOverride {
    /// Adds an intro line.
    #[must_use]
    pub fn with_intro(mut self, line: impl Into<String>) -> Self {
        self.intro.push(line.into());
        self
    }

    /// Adds an effect template.
    #[must_use]
    pub fn with_effect(mut self, key: EffectKey, template: impl Into<String>) -> Self {
        match self.effect_text.iter_mut().find(|(k, _)| *k == key) {
            Some((_, templates)) => templates.push(template.into()),
            None => self.effect_text.push((key, vec![template.into()])),
        }
        self
    }

    /// Adds an outro line.
    #[must_use]
    pub fn with_outro(mut self, line: impl Into<String>) -> Self {
        self.outro.push(line.into());
        self
    }

    /// Renders the authored lines for `effects`.
    ///
    /// Effect templates only render for keys present and truthy in `effects`
    /// (aliases resolved). Never returns an empty list.
    #[must_use]
    pub fn render(&self, names: &Names, move_name: &str, effects: &EffectMap) -> Vec<NarrationLine> {
        let vars = [
            ("actor", names.actor.as_str()),
            ("move", move_name),
            ("target", names.target.as_str()),
            ("enemy", names.enemy.as_str()),
        ];
        let render = |template: &str, value: Option<&str>| {
            let mut all: Vec<(&str, &str)> = vars.to_vec();
            if let Some(value) = value {
                all.push(("value", value));
            }
            render_template(template, &all).trim().to_string()
        };

        let mut lines: Vec<NarrationLine> = self
            .intro
            .iter()
            .map(|t| NarrationLine::new(Phase::PreEffect, render(t, None)))
            .collect();
        if lines.is_empty() {
            lines.push(NarrationLine::new(Phase::PreEffect, render(HEADLINE, None)));
        }

        if self.show_effects {
            let normalized = effects.normalized();
            for (key, templates) in &self.effect_text {
                let Some(value) = lookup(key, effects, &normalized) else {
                    continue;
                };
                let shown = value.to_string();
                for template in templates {
                    lines.push(
                        NarrationLine::new(default_phase(key), render(template, Some(&shown)))
                            .with_cue(cue_for(key)),
                    );
                }
            }
        }

        lines.extend(
            self.outro
                .iter()
                .map(|t| NarrationLine::new(Phase::PostEffect, render(t, None))),
        );
        lines.retain(|line| !line.text.is_empty());
        if lines.is_empty() {
            lines.push(NarrationLine::new(Phase::PreEffect, render(HEADLINE, None)));
        }
        lines
    }
}

/// Finds the truthy value an authored key refers to.
fn lookup<'a>(
    key: &EffectKey,
    raw: &'a EffectMap,
    normalized: &'a EffectMap,
) -> Option<&'a EffectValue> {
    let value = if key.is_meta() {
        raw.get(key)
    } else {
        normalized.get(&key.canonical())
    };
    value.filter(|v| v.is_truthy())
}

/// Authored overrides keyed by move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct OverrideTable {
    entries: BTreeMap<MoveKey, TextOverride>,
}

impl OverrideTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a table from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Json`] when the JSON does not parse.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Adds or replaces the override for `key`.
    pub fn insert(&mut self, key: MoveKey, text: TextOverride) {
        self.entries.insert(key, text);
    }

    /// Returns the override for `key`.
    #[must_use]
    pub fn get(&self, key: &MoveKey) -> Option<&TextOverride> {
        self.entries.get(key)
    }

    /// Number of overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
