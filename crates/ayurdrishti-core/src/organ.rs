use serde::{Deserialize, Serialize};

/// The plant part shown in a submitted image. Sent to the backend as a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Organ {
    #[default]
    Leaf,
    Flower,
    Fruit,
    Bark,
    Habit,
}

impl Organ {
    pub fn as_str(&self) -> &'static str {
        match self {
            Organ::Leaf => "leaf",
            Organ::Flower => "flower",
            Organ::Fruit => "fruit",
            Organ::Bark => "bark",
            Organ::Habit => "habit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "leaf" => Some(Organ::Leaf),
            "flower" => Some(Organ::Flower),
            "fruit" => Some(Organ::Fruit),
            "bark" => Some(Organ::Bark),
            "habit" => Some(Organ::Habit),
            _ => None,
        }
    }

    pub fn all() -> Vec<Organ> {
        vec![Organ::Leaf, Organ::Flower, Organ::Fruit, Organ::Bark, Organ::Habit]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Organ::Leaf => "Leaf",
            Organ::Flower => "Flower",
            Organ::Fruit => "Fruit",
            Organ::Bark => "Bark",
            Organ::Habit => "Habit",
        }
    }

    /// Next organ in selector order, wrapping around.
    pub fn next(&self) -> Organ {
        let all = Self::all();
        let idx = all.iter().position(|o| o == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(&self) -> Organ {
        let all = Self::all();
        let idx = all.iter().position(|o| o == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

impl std::fmt::Display for Organ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(Organ::from_str("Flower"), Some(Organ::Flower));
        assert_eq!(Organ::from_str(" BARK "), Some(Organ::Bark));
        assert_eq!(Organ::from_str("root"), None);
    }

    #[test]
    fn cycling_wraps_both_ways() {
        assert_eq!(Organ::Habit.next(), Organ::Leaf);
        assert_eq!(Organ::Leaf.prev(), Organ::Habit);
        assert_eq!(Organ::Leaf.next(), Organ::Flower);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Organ::Fruit).unwrap(), "\"fruit\"");
        assert_eq!(Organ::default(), Organ::Leaf);
    }
}
