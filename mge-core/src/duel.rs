use std::fmt;

use crate::{
    class::{TfClass, parse_class_list},
    matchup::ClassDuel,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DuelKind {
    OneVsOne,
    TwoVsTwo,
}

impl DuelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DuelKind::OneVsOne => "1v1",
            DuelKind::TwoVsTwo => "2v2",
        }
    }

    /// Anything but `2v2` selects the 1v1 table.
    pub fn from_param(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("2v2") {
            DuelKind::TwoVsTwo
        } else {
            DuelKind::OneVsOne
        }
    }
}

impl fmt::Display for DuelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuelSide {
    Winner,
    Loser,
}

/// One participant position of a duel.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DuelSlot {
    pub steam_id: String,
    pub class: String,
    pub previous_elo: Option<i32>,
    pub new_elo: Option<i32>,
}

impl DuelSlot {
    pub fn elo_change(&self) -> Option<i32> {
        Some(self.new_elo? - self.previous_elo?)
    }

    pub fn classes(&self) -> Vec<TfClass> {
        parse_class_list(&self.class)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DuelRecord {
    pub kind: DuelKind,
    pub id: i64,
    pub end_time: i64,
    pub winner: DuelSlot,
    pub loser: DuelSlot,
    pub winner2: Option<DuelSlot>,
    pub loser2: Option<DuelSlot>,
    pub winner_score: i32,
    pub loser_score: i32,
    pub map_name: String,
    pub arena_name: String,
}

impl DuelRecord {
    pub fn slots(&self, side: DuelSide) -> impl Iterator<Item = &DuelSlot> {
        let (first, second) = match side {
            DuelSide::Winner => (&self.winner, &self.winner2),
            DuelSide::Loser => (&self.loser, &self.loser2),
        };
        std::iter::once(first).chain(second.iter())
    }

    pub fn participants(&self) -> impl Iterator<Item = &DuelSlot> {
        self.slots(DuelSide::Winner)
            .chain(self.slots(DuelSide::Loser))
    }

    /// First slot occupied by the player, winners checked before losers.
    pub fn slot_of(&self, steam_id: &str) -> Option<(DuelSide, &DuelSlot)> {
        if let Some(slot) = self.slots(DuelSide::Winner).find(|s| s.steam_id == steam_id) {
            return Some((DuelSide::Winner, slot));
        }
        self.slots(DuelSide::Loser)
            .find(|s| s.steam_id == steam_id)
            .map(|slot| (DuelSide::Loser, slot))
    }

    pub fn involves(&self, steam_id: &str) -> bool {
        self.slot_of(steam_id).is_some()
    }

    pub fn is_winner(&self, steam_id: &str) -> bool {
        matches!(self.slot_of(steam_id), Some((DuelSide::Winner, _)))
    }

    /// Rating delta of the slot the player occupied.
    pub fn elo_change_for(&self, steam_id: &str) -> Option<i32> {
        self.slot_of(steam_id).and_then(|(_, slot)| slot.elo_change())
    }

    /// Rating after the duel for the player's slot.
    pub fn new_elo_for(&self, steam_id: &str) -> Option<i32> {
        self.slot_of(steam_id).and_then(|(_, slot)| slot.new_elo)
    }

    /// Classes played by the player against the classes of the opposing side.
    pub fn class_duel_for(&self, steam_id: &str) -> Option<ClassDuel> {
        let (side, _) = self.slot_of(steam_id)?;
        let opposing = match side {
            DuelSide::Winner => DuelSide::Loser,
            DuelSide::Loser => DuelSide::Winner,
        };
        let my_classes = self
            .slots(side)
            .filter(|s| s.steam_id == steam_id)
            .flat_map(DuelSlot::classes)
            .collect();
        let opponent_classes = self.slots(opposing).flat_map(DuelSlot::classes).collect();
        Some(ClassDuel {
            kind: self.kind,
            duel_id: self.id,
            my_classes,
            opponent_classes,
            won: side == DuelSide::Winner,
        })
    }
}
