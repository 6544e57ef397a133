//! Dataset types and data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::email::EmailParts;
use crate::error::SpamError;

/// Email class
///
/// Variants are ordered alphabetically so `Ham` sorts before `Spam`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Legitimate email
    Ham,
    /// Unsolicited email
    Spam,
}

impl Label {
    /// All labels in category order
    pub const ALL: [Label; 2] = [Label::Ham, Label::Spam];

    /// Position of this label in category order
    pub fn index(self) -> usize {
        match self {
            Label::Ham => 0,
            Label::Spam => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Ham => "ham",
            Label::Spam => "spam",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = SpamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ham" => Ok(Label::Ham),
            "spam" => Ok(Label::Spam),
            other => Err(SpamError::Parse(format!("unknown label '{}'", other))),
        }
    }
}

/// One email of the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRow {
    pub parts: EmailParts,
    pub label: Label,
}

impl DatasetRow {
    pub fn new(parts: EmailParts, label: Label) -> Self {
        Self { parts, label }
    }
}

/// Per-class row counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    pub ham: usize,
    pub spam: usize,
}

impl ClassCounts {
    pub fn of(rows: &[DatasetRow]) -> Self {
        rows.iter().fold(Self::default(), |mut counts, row| {
            match row.label {
                Label::Ham => counts.ham += 1,
                Label::Spam => counts.spam += 1,
            }
            counts
        })
    }

    pub fn total(&self) -> usize {
        self.ham + self.spam
    }
}

impl fmt::Display for ClassCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ham: {}, spam: {}", self.ham, self.spam)
    }
}

/// Shuffled, class-balanced rows
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<DatasetRow>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn counts(&self) -> ClassCounts {
        ClassCounts::of(&self.rows)
    }

    /// Labels in row order
    pub fn labels(&self) -> Vec<Label> {
        self.rows.iter().map(|row| row.label).collect()
    }

    /// Combined email text in row order
    pub fn emails(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.parts.combined()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_order() {
        assert!(Label::Ham < Label::Spam);
        assert_eq!(Label::from_index(1), Some(Label::Spam));
        assert_eq!(Label::from_index(2), None);
        assert_eq!("SPAM".parse::<Label>().unwrap(), Label::Spam);
        assert!("eggs".parse::<Label>().is_err());
    }

    #[test]
    fn test_emails_with_missing_body() {
        let row = |headers: &str, body: Option<&str>| {
            DatasetRow::new(
                EmailParts {
                    headers: headers.to_string(),
                    body: body.map(str::to_string),
                },
                Label::Ham,
            )
        };
        let dataset = Dataset {
            rows: vec![row("Subject: x", None), row("Subject: y", Some("hi"))],
        };
        assert_eq!(dataset.emails(), vec!["Subject: x\n\n", "Subject: y\n\nhi"]);
    }

    #[test]
    fn test_class_counts() {
        let row = |label| DatasetRow::new(EmailParts::default(), label);
        let counts = ClassCounts::of(&[row(Label::Ham), row(Label::Spam), row(Label::Ham)]);
        assert_eq!(counts, ClassCounts { ham: 2, spam: 1 });
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.to_string(), "ham: 2, spam: 1");
    }
}
