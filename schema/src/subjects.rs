use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

/// Academic subject a creature or move belongs to. Special moves of a subject
/// are gated behind a quiz question on that subject.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Subject {
    Math,
    Science,
    History,
    Language,
    Art,
    #[strum(serialize = "ComputerScience", serialize = "cs")]
    ComputerScience,
}

impl Subject {
    pub fn display_name(&self) -> &'static str {
        match self {
            Subject::Math => "Math",
            Subject::Science => "Science",
            Subject::History => "History",
            Subject::Language => "Language",
            Subject::Art => "Art",
            Subject::ComputerScience => "Computer Science",
        }
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_subject_display_and_parse() {
        assert_eq!(Subject::ComputerScience.to_string(), "Computer Science");
        assert_eq!(Subject::from_str("cs").unwrap(), Subject::ComputerScience);
        assert_eq!(Subject::from_str("math").unwrap(), Subject::Math);
    }
}
