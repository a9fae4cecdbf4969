//! Word dataset for the /s/ sound
//!
//! The bank is read-only once built. Targets are words that begin with the
//! practised sound; everything else is a distractor.

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// A single word shown on a balloon
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordEntry {
    pub text: String,
    /// True when the word begins with the target sound
    pub is_target: bool,
    /// Optional picture shown alongside the word
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl WordEntry {
    pub fn target(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_target: true,
            image_ref: None,
        }
    }

    pub fn distractor(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_target: false,
            image_ref: None,
        }
    }
}

/// Words that start with /s/
const S_WORDS: &[&str] = &[
    "sun", "sock", "snake", "star", "sail", "soup", "sand", "snow", "ship", "seed", "sink",
    "soap", "sail", "sock", "soup",
];

/// Words that don't
const OTHER_WORDS: &[&str] = &[
    "cat", "dog", "hat", "run", "jump", "play", "book", "tree", "ball", "fish", "milk", "cake",
    "bird", "house", "car", "door", "window", "table", "chair",
];

/// Immutable word dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordBank {
    entries: Vec<WordEntry>,
}

impl Default for WordBank {
    fn default() -> Self {
        Self::phonics_s()
    }
}

impl WordBank {
    /// Build a bank, dropping repeated (text, is_target) pairs
    pub fn new(entries: Vec<WordEntry>) -> Self {
        let mut unique: Vec<WordEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if unique
                .iter()
                .any(|e| e.text == entry.text && e.is_target == entry.is_target)
            {
                log::debug!("Skipping duplicate word '{}'", entry.text);
                continue;
            }
            unique.push(entry);
        }
        Self { entries: unique }
    }

    /// Built-in /s/ practice set
    pub fn phonics_s() -> Self {
        let entries = S_WORDS
            .iter()
            .map(|w| WordEntry::target(w))
            .chain(OTHER_WORDS.iter().map(|w| WordEntry::distractor(w)))
            .collect();
        Self::new(entries)
    }

    /// Load a bank from a JSON array of entries
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let entries: Vec<WordEntry> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Target-tagged entries, in dataset order
    pub fn targets(&self) -> Vec<&WordEntry> {
        self.entries.iter().filter(|e| e.is_target).collect()
    }

    /// Non-target entries, in dataset order
    pub fn distractors(&self) -> Vec<&WordEntry> {
        self.entries.iter().filter(|e| !e.is_target).collect()
    }

    /// Look up a target by its text
    pub fn find_target(&self, text: &str) -> Option<&WordEntry> {
        self.entries.iter().find(|e| e.is_target && e.text == text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_bank_is_deduplicated() {
        let bank = WordBank::phonics_s();
        // sail, sock, soup appear twice in the source list
        assert_eq!(bank.targets().len(), S_WORDS.len() - 3);
        assert_eq!(bank.distractors().len(), OTHER_WORDS.len());
    }

    #[test]
    fn test_same_text_different_tag_is_kept() {
        let bank = WordBank::new(vec![WordEntry::target("cent"), WordEntry::distractor("cent")]);
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"text": "sun", "is_target": true, "image_ref": "img/sun.png"},
            {"text": "cat", "is_target": false}
        ]"#;
        let bank = WordBank::from_json(json).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(
            bank.find_target("sun").and_then(|e| e.image_ref.as_deref()),
            Some("img/sun.png")
        );
        assert!(bank.find_target("cat").is_none());
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            WordBank::from_json("[{\"text\": 1}]"),
            Err(DatasetError::Malformed(_))
        ));
    }
}
