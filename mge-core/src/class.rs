use std::{fmt, str::FromStr};

use enum_iterator::Sequence;

/// Playable classes, declared in grid display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Sequence)]
pub enum TfClass {
    Scout,
    Soldier,
    Pyro,
    Demoman,
    Heavy,
    Engineer,
    Medic,
    Sniper,
    Spy,
}

impl TfClass {
    /// Numeric id used by the matchup rating table.
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(TfClass::Scout),
            2 => Some(TfClass::Sniper),
            3 => Some(TfClass::Soldier),
            4 => Some(TfClass::Demoman),
            5 => Some(TfClass::Medic),
            6 => Some(TfClass::Heavy),
            7 => Some(TfClass::Pyro),
            8 => Some(TfClass::Spy),
            9 => Some(TfClass::Engineer),
            _ => None,
        }
    }

    pub fn id(self) -> i32 {
        match self {
            TfClass::Scout => 1,
            TfClass::Sniper => 2,
            TfClass::Soldier => 3,
            TfClass::Demoman => 4,
            TfClass::Medic => 5,
            TfClass::Heavy => 6,
            TfClass::Pyro => 7,
            TfClass::Spy => 8,
            TfClass::Engineer => 9,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            TfClass::Scout => "scout",
            TfClass::Soldier => "soldier",
            TfClass::Pyro => "pyro",
            TfClass::Demoman => "demoman",
            TfClass::Heavy => "heavy",
            TfClass::Engineer => "engineer",
            TfClass::Medic => "medic",
            TfClass::Sniper => "sniper",
            TfClass::Spy => "spy",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TfClass::Scout => "Scout",
            TfClass::Soldier => "Soldier",
            TfClass::Pyro => "Pyro",
            TfClass::Demoman => "Demoman",
            TfClass::Heavy => "Heavy",
            TfClass::Engineer => "Engineer",
            TfClass::Medic => "Medic",
            TfClass::Sniper => "Sniper",
            TfClass::Spy => "Spy",
        }
    }

    pub fn icon_file(self) -> &'static str {
        match self {
            TfClass::Scout => "Scout_emblem_RED_beta.png",
            TfClass::Soldier => "Soldier_emblem_RED.png",
            TfClass::Pyro => "Pyro_emblem_RED.png",
            TfClass::Demoman => "Demoman_emblem_RED.png",
            TfClass::Heavy => "145px-Heavy_emblem_RED.png",
            TfClass::Engineer => "Engineer_emblem_RED.png",
            TfClass::Medic => "Medic_emblem_RED.png",
            TfClass::Sniper => "Sniper_emblem_RED.png",
            TfClass::Spy => "Spy_emblem_RED.png",
        }
    }

    pub fn all() -> impl Iterator<Item = TfClass> {
        enum_iterator::all::<TfClass>()
    }
}

impl FromStr for TfClass {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scout" => Ok(TfClass::Scout),
            "soldier" => Ok(TfClass::Soldier),
            "pyro" => Ok(TfClass::Pyro),
            "demoman" => Ok(TfClass::Demoman),
            "heavy" => Ok(TfClass::Heavy),
            "engineer" => Ok(TfClass::Engineer),
            "medic" => Ok(TfClass::Medic),
            "sniper" => Ok(TfClass::Sniper),
            "spy" => Ok(TfClass::Spy),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TfClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Splits a comma separated class field, dropping unknown entries.
pub fn parse_class_list(field: &str) -> Vec<TfClass> {
    field
        .split(',')
        .filter_map(|part| part.parse().ok())
        .collect()
}

/// Human readable form of a raw class field, unknown entries kept capitalized.
pub fn display_class_list(field: &str) -> String {
    field
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<TfClass>() {
            Ok(class) => class.display_name().to_string(),
            Err(()) => capitalize(part),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_order() {
        let order: Vec<&str> = TfClass::all().map(TfClass::key).collect();
        assert_eq!(
            order,
            vec![
                "scout", "soldier", "pyro", "demoman", "heavy", "engineer", "medic", "sniper",
                "spy"
            ]
        );
    }

    #[test]
    fn test_id_mapping() {
        for class in TfClass::all() {
            assert_eq!(TfClass::from_id(class.id()), Some(class));
        }
        assert_eq!(TfClass::from_id(2), Some(TfClass::Sniper));
        assert_eq!(TfClass::from_id(9), Some(TfClass::Engineer));
        assert_eq!(TfClass::from_id(0), None);
        assert_eq!(TfClass::from_id(10), None);
    }

    #[test]
    fn test_parse_class_list() {
        assert_eq!(
            parse_class_list(" Scout, soldier ,unknown,,SPY"),
            vec![TfClass::Scout, TfClass::Soldier, TfClass::Spy]
        );
        assert!(parse_class_list("").is_empty());
    }

    #[test]
    fn test_display_class_list() {
        assert_eq!(display_class_list("scout,demoman"), "Scout, Demoman");
        assert_eq!(display_class_list("civilian"), "Civilian");
    }
}
