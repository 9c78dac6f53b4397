use maud::{Markup, html};
use mge_core::{DuelSlot, class::display_class_list};
use mge_stats_app::workflow::duels::NamedDuel;

use crate::views::{Header, PageKind, format_elo_change, format_time, page, player_link};

fn slot_row(slot: &DuelSlot, nickname: &str) -> Markup {
    html! {
        tr {
            td { (player_link(&slot.steam_id, nickname)) }
            td { (display_class_list(&slot.class)) }
            td {
                @match (slot.previous_elo, slot.new_elo) {
                    (Some(previous), Some(new)) => { (previous) " → " (new) }
                    _ => { "-" }
                }
            }
            td.elo-change { (format_elo_change(slot.elo_change())) }
        }
    }
}

fn team(title: &str, score: i32, slots: &[(&DuelSlot, &str)]) -> Markup {
    html! {
        div.team {
            h3 { (title) span.team-score { (score) } }
            table.data-table {
                thead { tr { th { "Player" } th { "Class" } th { "Rating" } th { "Change" } } }
                tbody {
                    @for (slot, nickname) in slots {
                        (slot_row(slot, nickname))
                    }
                }
            }
        }
    }
}

pub fn render(header: &Header<'_>, named: &NamedDuel) -> Markup {
    let duel = &named.duel;
    let mut winners = vec![(&duel.winner, named.winner_nick.as_str())];
    if let (Some(slot), Some(nick)) = (&duel.winner2, &named.winner2_nick) {
        winners.push((slot, nick.as_str()));
    }
    let mut losers = vec![(&duel.loser, named.loser_nick.as_str())];
    if let (Some(slot), Some(nick)) = (&duel.loser2, &named.loser2_nick) {
        losers.push((slot, nick.as_str()));
    }

    let title = format!("{} duel #{}", duel.kind, duel.id);
    let content = html! {
        section.card.duel-details {
            h2 { (title) }
            dl.duel-meta {
                dt { "Ended" } dd { (format_time(duel.end_time)) }
                dt { "Map" } dd { (duel.map_name) }
                dt { "Arena" } dd { (duel.arena_name) }
                dt { "Score" } dd { (duel.winner_score) " : " (duel.loser_score) }
            }
            div.teams {
                (team("Winners", duel.winner_score, &winners))
                (team("Losers", duel.loser_score, &losers))
            }
        }
    };
    page(header, PageKind::Dashboard, &title, content)
}
