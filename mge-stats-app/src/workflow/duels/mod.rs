use crate::{domain::duel::DuelRecord, services::nickname_resolver::NicknameResolverService};

pub mod details;
pub mod list;

/// Duel record with display names for every occupied slot.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedDuel {
    pub duel: DuelRecord,
    pub winner_nick: String,
    pub loser_nick: String,
    pub winner2_nick: Option<String>,
    pub loser2_nick: Option<String>,
}

pub async fn name_duel(
    resolver: &(dyn NicknameResolverService + Send + Sync),
    duel: DuelRecord,
) -> NamedDuel {
    let winner_nick = resolver.resolve(&duel.winner.steam_id).await;
    let loser_nick = resolver.resolve(&duel.loser.steam_id).await;
    let winner2_nick = match &duel.winner2 {
        Some(slot) => Some(resolver.resolve(&slot.steam_id).await),
        None => None,
    };
    let loser2_nick = match &duel.loser2 {
        Some(slot) => Some(resolver.resolve(&slot.steam_id).await),
        None => None,
    };
    NamedDuel {
        duel,
        winner_nick,
        loser_nick,
        winner2_nick,
        loser2_nick,
    }
}

pub async fn name_duels(
    resolver: &(dyn NicknameResolverService + Send + Sync),
    duels: Vec<DuelRecord>,
) -> Vec<NamedDuel> {
    let mut named = Vec::with_capacity(duels.len());
    for duel in duels {
        named.push(name_duel(resolver, duel).await);
    }
    named
}
