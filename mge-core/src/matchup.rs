use std::collections::{HashMap, HashSet};

use crate::{
    class::TfClass,
    duel::{DuelKind, DuelRecord},
    rating::DEFAULT_RATING,
};

/// Class view of a single duel from one player's perspective.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDuel {
    pub kind: DuelKind,
    pub duel_id: i64,
    pub my_classes: Vec<TfClass>,
    pub opponent_classes: Vec<TfClass>,
    pub won: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchupCounter {
    pub total: u32,
    pub wins: u32,
}

impl MatchupCounter {
    pub fn losses(&self) -> u32 {
        self.total - self.wins
    }
}

#[derive(Clone, Debug, Default)]
pub struct MatchupStats {
    counters: HashMap<(TfClass, TfClass), MatchupCounter>,
}

impl MatchupStats {
    pub fn aggregate<'a>(duels: impl IntoIterator<Item = &'a ClassDuel>) -> Self {
        let mut counters: HashMap<(TfClass, TfClass), MatchupCounter> = HashMap::new();
        let mut seen = HashSet::new();
        for duel in duels {
            for &mine in &duel.my_classes {
                for &theirs in &duel.opponent_classes {
                    if !seen.insert((mine, theirs, duel.kind, duel.duel_id)) {
                        continue;
                    }
                    let counter = counters.entry((mine, theirs)).or_default();
                    counter.total += 1;
                    if duel.won {
                        counter.wins += 1;
                    }
                }
            }
        }
        Self { counters }
    }

    pub fn from_duels<'a>(
        steam_id: &str,
        duels: impl IntoIterator<Item = &'a DuelRecord>,
    ) -> Self {
        let class_duels: Vec<ClassDuel> = duels
            .into_iter()
            .filter_map(|duel| duel.class_duel_for(steam_id))
            .collect();
        Self::aggregate(&class_duels)
    }

    pub fn get(&self, mine: TfClass, theirs: TfClass) -> MatchupCounter {
        self.counters
            .get(&(mine, theirs))
            .copied()
            .unwrap_or_default()
    }

    /// Most played pair in grid order, the first one wins ties.
    pub fn most_played(&self) -> Option<(TfClass, TfClass, MatchupCounter)> {
        let mut best: Option<(TfClass, TfClass, MatchupCounter)> = None;
        for mine in TfClass::all() {
            for theirs in TfClass::all() {
                let counter = self.get(mine, theirs);
                if counter.total == 0 {
                    continue;
                }
                if best.is_none_or(|(_, _, b)| counter.total > b.total) {
                    best = Some((mine, theirs, counter));
                }
            }
        }
        best
    }

    pub fn total_duels(&self) -> u32 {
        self.counters.values().map(|c| c.total).sum()
    }
}

/// Per class pair rating table, missing or non-positive entries read as the default.
#[derive(Clone, Debug, Default)]
pub struct MatchupRatings {
    ratings: HashMap<(TfClass, TfClass), i32>,
}

impl MatchupRatings {
    /// Builds the table from raw `(my_class_id, opponent_class_id, rating)` rows.
    pub fn from_rows(rows: impl IntoIterator<Item = (i32, i32, i32)>) -> Self {
        let ratings = rows
            .into_iter()
            .filter(|&(_, _, rating)| rating > 0)
            .filter_map(|(mine, theirs, rating)| {
                Some(((TfClass::from_id(mine)?, TfClass::from_id(theirs)?), rating))
            })
            .collect();
        Self { ratings }
    }

    pub fn get(&self, mine: TfClass, theirs: TfClass) -> i32 {
        self.ratings
            .get(&(mine, theirs))
            .copied()
            .unwrap_or(DEFAULT_RATING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duel::tests::{one_vs_one, slot};

    fn class_duel(id: i64, mine: &[TfClass], theirs: &[TfClass], won: bool) -> ClassDuel {
        ClassDuel {
            kind: DuelKind::OneVsOne,
            duel_id: id,
            my_classes: mine.to_vec(),
            opponent_classes: theirs.to_vec(),
            won,
        }
    }

    #[test]
    fn test_aggregate_counts_wins() {
        let duels = vec![
            class_duel(1, &[TfClass::Scout], &[TfClass::Soldier], true),
            class_duel(2, &[TfClass::Scout], &[TfClass::Soldier], false),
            class_duel(3, &[TfClass::Soldier], &[TfClass::Scout], true),
        ];
        let stats = MatchupStats::aggregate(&duels);
        assert_eq!(
            stats.get(TfClass::Scout, TfClass::Soldier),
            MatchupCounter { total: 2, wins: 1 }
        );
        assert_eq!(
            stats.get(TfClass::Soldier, TfClass::Scout),
            MatchupCounter { total: 1, wins: 1 }
        );
        assert_eq!(stats.get(TfClass::Spy, TfClass::Spy), MatchupCounter::default());
    }

    #[test]
    fn test_repeated_classes_count_once() {
        let duels = vec![class_duel(
            1,
            &[TfClass::Scout, TfClass::Scout],
            &[TfClass::Soldier, TfClass::Soldier],
            true,
        )];
        let stats = MatchupStats::aggregate(&duels);
        assert_eq!(
            stats.get(TfClass::Scout, TfClass::Soldier),
            MatchupCounter { total: 1, wins: 1 }
        );
        assert_eq!(stats.total_duels(), 1);
    }

    #[test]
    fn test_same_id_in_both_tables_counts_twice() {
        let mut two = class_duel(1, &[TfClass::Scout], &[TfClass::Soldier], true);
        two.kind = DuelKind::TwoVsTwo;
        let duels = vec![
            class_duel(1, &[TfClass::Scout], &[TfClass::Soldier], true),
            two,
        ];
        let stats = MatchupStats::aggregate(&duels);
        assert_eq!(stats.get(TfClass::Scout, TfClass::Soldier).total, 2);
    }

    #[test]
    fn test_multi_class_cross_product() {
        let duels = vec![class_duel(
            1,
            &[TfClass::Scout, TfClass::Pyro],
            &[TfClass::Soldier, TfClass::Demoman],
            false,
        )];
        let stats = MatchupStats::aggregate(&duels);
        for mine in [TfClass::Scout, TfClass::Pyro] {
            for theirs in [TfClass::Soldier, TfClass::Demoman] {
                assert_eq!(
                    stats.get(mine, theirs),
                    MatchupCounter { total: 1, wins: 0 }
                );
            }
        }
    }

    #[test]
    fn test_from_duels() {
        let duels = vec![
            one_vs_one(1, slot("me", "scout", 1500, 1510), slot("them", "soldier", 1500, 1490)),
            one_vs_one(2, slot("them", "soldier", 1490, 1500), slot("me", "scout", 1510, 1500)),
            one_vs_one(3, slot("x", "spy", 1500, 1510), slot("y", "spy", 1500, 1490)),
        ];
        let stats = MatchupStats::from_duels("me", &duels);
        assert_eq!(
            stats.get(TfClass::Scout, TfClass::Soldier),
            MatchupCounter { total: 2, wins: 1 }
        );
        assert_eq!(stats.total_duels(), 2);
    }

    #[test]
    fn test_most_played() {
        let duels = vec![
            class_duel(1, &[TfClass::Spy], &[TfClass::Sniper], true),
            class_duel(2, &[TfClass::Scout], &[TfClass::Scout], true),
            class_duel(3, &[TfClass::Spy], &[TfClass::Sniper], false),
        ];
        let stats = MatchupStats::aggregate(&duels);
        let (mine, theirs, counter) = stats.most_played().unwrap();
        assert_eq!((mine, theirs), (TfClass::Spy, TfClass::Sniper));
        assert_eq!(counter.losses(), 1);
        assert!(MatchupStats::default().most_played().is_none());
    }

    #[test]
    fn test_matchup_ratings_defaults() {
        let ratings = MatchupRatings::from_rows(vec![(1, 3, 1620), (2, 2, 0), (42, 1, 1800)]);
        assert_eq!(ratings.get(TfClass::Scout, TfClass::Soldier), 1620);
        assert_eq!(ratings.get(TfClass::Sniper, TfClass::Sniper), DEFAULT_RATING);
        assert_eq!(ratings.get(TfClass::Spy, TfClass::Scout), DEFAULT_RATING);
    }
}
