//! This module implements the AC-3 algorithm for enforcing arc consistency across slot domains.
//! Running it before search removes words that can't appear in any solution because no crossing
//! slot has a compatible word left, which keeps the search from discovering the same dead ends
//! over and over.

use std::collections::VecDeque;

use crate::domains::DomainStore;
use crate::grid_config::{GridConfig, SlotId};
use crate::types::WordId;
use crate::LOG_SOLVE_PROCESS;

/// Remove words from `x`'s domain that have no remaining support in `y`'s domain: words whose
/// glyph in the shared cell doesn't occur there in any of `y`'s remaining words. Returns whether
/// anything was removed. If the slots don't overlap there is nothing to do.
pub fn revise(config: &GridConfig, domains: &mut DomainStore, x: SlotId, y: SlotId) -> bool {
    let Some((x_cell, y_cell)) = config.overlap(x, y) else {
        return false;
    };

    let x_length = config.slot_configs[x].length;

    let unsupported: Vec<WordId> = domains
        .words(x)
        .filter(|&word_id| {
            let word = config.word_list.get_word((x_length, word_id));
            domains.glyph_support(y, y_cell, word.glyphs[x_cell]) == 0
        })
        .collect();

    for &word_id in &unsupported {
        domains.remove(&config.word_list, x, word_id);
    }

    !unsupported.is_empty()
}

/// Generate every ordered pair of overlapping slots.
#[must_use]
pub fn all_arcs(config: &GridConfig) -> Vec<(SlotId, SlotId)> {
    (0..config.slot_count())
        .flat_map(|x| config.neighbors(x).iter().map(move |&y| (x, y)))
        .collect()
}

/// Enforce arc consistency using the AC-3 algorithm. `initial_arcs` can scope the work to a
/// handful of arcs; passing `None` starts from every arc in the grid. Whenever a revision
/// shrinks a slot's domain, the arcs pointing at that slot from its other neighbors go back on
/// the queue. Returns false if some slot's domain was wiped out, meaning the grid is unsolvable.
pub fn ac3(
    config: &GridConfig,
    domains: &mut DomainStore,
    initial_arcs: Option<&[(SlotId, SlotId)]>,
) -> bool {
    let mut queue: VecDeque<(SlotId, SlotId)> = match initial_arcs {
        Some(arcs) => arcs.iter().copied().collect(),
        None => all_arcs(config).into_iter().collect(),
    };

    while let Some((x, y)) = queue.pop_front() {
        if revise(config, domains, x, y) {
            if domains.is_empty(x) {
                if LOG_SOLVE_PROCESS {
                    println!(
                        "arc consistency wiped out the domain of slot {}",
                        config.slot_configs[x].slot_key()
                    );
                }
                return false;
            }

            for &z in config.neighbors(x) {
                if z != y {
                    queue.push_back((z, x));
                }
            }
        }
    }

    true
}
