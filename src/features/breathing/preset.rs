//! Breathing phases and presets.
//!
//! A preset is an ordered, cyclic list of phases. After the last phase the
//! pattern starts over at the first.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::BreatheError;

/// One named, fixed-length segment of a breathing pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Short name shown in the countdown ("inhale", "hold", ...)
    pub name: String,
    /// Length of the phase in seconds
    pub duration_seconds: u32,
    /// What the user should be doing
    pub instruction: String,
}

impl Phase {
    #[must_use]
    pub fn new(name: &str, duration_seconds: u32, instruction: &str) -> Self {
        Self {
            name: name.to_string(),
            duration_seconds,
            instruction: instruction.to_string(),
        }
    }
}

/// A breathing technique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Stable identifier, e.g. `box-breathing`
    pub id: String,
    /// Display title
    pub title: String,
    /// One-line description
    #[serde(default)]
    pub description: String,
    /// Phases in the order they are performed
    pub phases: Vec<Phase>,
}

impl Preset {
    /// Create a preset, rejecting anything the sequencer could not run.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::Validation` if the preset is malformed.
    pub fn new(
        id: &str,
        title: &str,
        description: &str,
        phases: Vec<Phase>,
    ) -> Result<Self, BreatheError> {
        let preset = Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            phases,
        };
        preset.validate()?;
        Ok(preset)
    }

    /// Check that the preset can be sequenced.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::Validation` for an empty id, an empty phase
    /// list, an unnamed phase, or a zero-length phase.
    pub fn validate(&self) -> Result<(), BreatheError> {
        if self.id.trim().is_empty() {
            return Err(BreatheError::Validation(
                "preset id must not be empty".to_string(),
            ));
        }
        if self.phases.is_empty() {
            return Err(BreatheError::Validation(format!(
                "preset '{}' has no phases",
                self.id
            )));
        }
        for (i, phase) in self.phases.iter().enumerate() {
            if phase.name.trim().is_empty() {
                return Err(BreatheError::Validation(format!(
                    "preset '{}': phase {} has no name",
                    self.id,
                    i + 1
                )));
            }
            if phase.duration_seconds == 0 {
                return Err(BreatheError::Validation(format!(
                    "preset '{}': phase '{}' must last at least one second",
                    self.id, phase.name
                )));
            }
        }
        Ok(())
    }

    /// Length of one full pass through the phases, in seconds.
    #[must_use]
    pub fn cycle_seconds(&self) -> u64 {
        self.phases.iter().map(|p| u64::from(p.duration_seconds)).sum()
    }

    /// The pattern as "4-7-8".
    #[must_use]
    pub fn pattern(&self) -> String {
        self.phases
            .iter()
            .map(|p| p.duration_seconds.to_string())
            .collect::<Vec<_>>()
            .join("-")
    }
}

fn builtin(id: &str, title: &str, description: &str, phases: &[(&str, u32, &str)]) -> Preset {
    Preset {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        phases: phases
            .iter()
            .map(|(name, secs, instruction)| Phase::new(name, *secs, instruction))
            .collect(),
    }
}

/// Presets that ship with breathe.
pub static BUILTIN_PRESETS: Lazy<Vec<Preset>> = Lazy::new(|| {
    vec![
        builtin(
            "box-breathing",
            "Box Breathing",
            "4-4-4-4 pattern for stress relief and focus",
            &[
                ("inhale", 4, "Breathe in slowly"),
                ("hold", 4, "Hold your breath"),
                ("exhale", 4, "Breathe out slowly"),
                ("hold", 4, "Hold empty"),
            ],
        ),
        builtin(
            "calm-breathing",
            "Calm Breathing",
            "4-7-8 pattern for relaxation and sleep",
            &[
                ("inhale", 4, "Breathe in through nose"),
                ("hold", 7, "Hold your breath"),
                ("exhale", 8, "Breathe out through mouth"),
            ],
        ),
        builtin(
            "energy-breathing",
            "Energy Breathing",
            "Equal breathing for balance and energy",
            &[
                ("inhale", 6, "Breathe in deeply"),
                ("exhale", 6, "Breathe out completely"),
            ],
        ),
        builtin(
            "quick-session",
            "Quick Session",
            "One minute of slow in-and-out breathing",
            &[
                ("inhale", 4, "Breathe in..."),
                ("exhale", 4, "Breathe out..."),
            ],
        ),
    ]
});

/// Id of the preset used by `breathe quick`.
pub const QUICK_PRESET_ID: &str = "quick-session";

/// General advice shown alongside a preset.
pub const BREATHING_TIPS: [&str; 6] = [
    "Find a comfortable, quiet space to practice",
    "Sit or lie down with your back straight",
    "Place one hand on your chest, one on your belly",
    "Focus on breathing from your diaphragm",
    "Practice regularly for best results",
    "Don't force your breath - let it flow naturally",
];

/// Map short names onto built-in preset ids.
fn canonical_id(key: &str) -> String {
    let key = key.trim().to_lowercase();
    let id = match key.as_str() {
        "box" | "square" | "4444" | "4-4-4-4" => "box-breathing",
        "calm" | "478" | "4-7-8" | "relax" => "calm-breathing",
        "energy" | "equal" | "6-6" => "energy-breathing",
        "quick" | "q" | "1min" => QUICK_PRESET_ID,
        _ => return key,
    };
    id.to_string()
}

/// Built-in presets plus any defined in the config file.
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
}

impl PresetCatalog {
    /// Catalog of only the built-in presets.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            presets: BUILTIN_PRESETS.clone(),
        }
    }

    /// Built-ins plus custom presets. A custom preset with the same id as a
    /// built-in replaces it.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::Validation` if a custom preset is malformed.
    pub fn with_custom(custom: &[Preset]) -> Result<Self, BreatheError> {
        let mut presets = BUILTIN_PRESETS.clone();
        for preset in custom {
            preset.validate()?;
            if let Some(existing) = presets.iter_mut().find(|p| p.id == preset.id) {
                *existing = preset.clone();
            } else {
                presets.push(preset.clone());
            }
        }
        Ok(Self { presets })
    }

    /// All presets in display order.
    #[must_use]
    pub fn all(&self) -> &[Preset] {
        &self.presets
    }

    /// Look up a preset by id or alias.
    ///
    /// # Errors
    ///
    /// Returns `BreatheError::NotFound` if nothing matches.
    pub fn find(&self, key: &str) -> Result<&Preset, BreatheError> {
        let exact = key.trim().to_lowercase();
        let canonical = canonical_id(key);
        self.presets
            .iter()
            .find(|p| p.id == exact)
            .or_else(|| self.presets.iter().find(|p| p.id == canonical))
            .ok_or_else(|| {
                let known = self
                    .presets
                    .iter()
                    .map(|p| p.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                BreatheError::NotFound(format!("preset '{key}' (available: {known})"))
            })
    }

    /// Position of a preset in display order.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.presets.iter().position(|p| p.id == id)
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_presets_are_valid() {
        for preset in BUILTIN_PRESETS.iter() {
            preset.validate().unwrap();
        }
    }

    #[test]
    fn test_box_breathing_shape() {
        let catalog = PresetCatalog::builtin();
        let preset = catalog.find("box-breathing").unwrap();
        assert_eq!(preset.phases.len(), 4);
        assert_eq!(preset.cycle_seconds(), 16);
        assert_eq!(preset.pattern(), "4-4-4-4");
    }

    #[test]
    fn test_new_rejects_empty_phase_list() {
        let err = Preset::new("empty", "Empty", "", vec![]).unwrap_err();
        assert!(matches!(err, BreatheError::Validation(_)));
    }

    #[test]
    fn test_new_rejects_zero_length_phase() {
        let err = Preset::new(
            "broken",
            "Broken",
            "",
            vec![Phase::new("inhale", 0, "Breathe in")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("at least one second"));
    }

    #[test]
    fn test_new_rejects_blank_id() {
        let err = Preset::new(" ", "Blank", "", vec![Phase::new("in", 2, "")]).unwrap_err();
        assert!(matches!(err, BreatheError::Validation(_)));
    }

    #[test]
    fn test_find_by_alias() {
        let catalog = PresetCatalog::builtin();
        assert_eq!(catalog.find("box").unwrap().id, "box-breathing");
        assert_eq!(catalog.find("478").unwrap().id, "calm-breathing");
        assert_eq!(catalog.find("Energy").unwrap().id, "energy-breathing");
        assert_eq!(catalog.find("quick").unwrap().id, QUICK_PRESET_ID);
    }

    #[test]
    fn test_find_unknown() {
        let catalog = PresetCatalog::builtin();
        let err = catalog.find("nope").unwrap_err();
        assert!(matches!(err, BreatheError::NotFound(_)));
        assert!(err.to_string().contains("box-breathing"));
    }

    #[test]
    fn test_custom_preset_added_and_overrides() {
        let custom = vec![
            Preset::new(
                "triangle",
                "Triangle",
                "3-3-3",
                vec![
                    Phase::new("inhale", 3, "In"),
                    Phase::new("hold", 3, "Hold"),
                    Phase::new("exhale", 3, "Out"),
                ],
            )
            .unwrap(),
            Preset::new(
                "box-breathing",
                "Long Box",
                "5-5-5-5",
                vec![
                    Phase::new("inhale", 5, "In"),
                    Phase::new("hold", 5, "Hold"),
                    Phase::new("exhale", 5, "Out"),
                    Phase::new("hold", 5, "Hold"),
                ],
            )
            .unwrap(),
        ];

        let catalog = PresetCatalog::with_custom(&custom).unwrap();
        assert_eq!(catalog.all().len(), BUILTIN_PRESETS.len() + 1);
        assert_eq!(catalog.find("triangle").unwrap().cycle_seconds(), 9);
        assert_eq!(catalog.find("box").unwrap().title, "Long Box");
    }

    #[test]
    fn test_custom_preset_validated() {
        let bad = Preset {
            id: "bad".to_string(),
            title: "Bad".to_string(),
            description: String::new(),
            phases: vec![],
        };
        assert!(PresetCatalog::with_custom(&[bad]).is_err());
    }

    #[test]
    fn test_preset_from_yaml() {
        let yaml = r"
id: triangle
title: Triangle
phases:
  - name: inhale
    duration_seconds: 3
    instruction: Breathe in
  - name: exhale
    duration_seconds: 3
    instruction: Breathe out
";
        let preset: Preset = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(preset.description, "");
        assert_eq!(preset.pattern(), "3-3");
    }
}
