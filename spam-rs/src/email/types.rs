/// Header and body segments of one raw email
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailParts {
    /// Everything before the first blank line
    pub headers: String,
    /// Everything after the first blank line, absent when there is none
    pub body: Option<String>,
}

impl EmailParts {
    /// Number of segments the split produced (1 or 2)
    pub fn part_count(&self) -> usize {
        if self.body.is_some() {
            2
        } else {
            1
        }
    }

    /// Body text, treating a missing body as empty
    pub fn body_or_empty(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }

    /// Headers and body joined by a blank line
    pub fn combined(&self) -> String {
        format!("{}{}{}", self.headers, super::parser::SEPARATOR, self.body_or_empty())
    }
}
