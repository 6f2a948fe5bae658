//! This module implements the solver itself: a recursive backtracking search over slot
//! assignments, run after arc consistency has pruned the domains. Slots are chosen by smallest
//! remaining domain with degree as the tie-break, and words are tried in least-constraining
//! order, so easy grids tend to fill without ever backtracking.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

use crate::arc_consistency::ac3;
use crate::domains::DomainStore;
use crate::grid_config::{Choice, GridConfig, SlotId};
use crate::types::{GlobalWordId, WordId};
use crate::{CHECK_INVARIANTS, LOG_SOLVE_PROCESS};

/// A struct tracking stats about the solving process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    /// The number of search states visited, counting the root.
    pub states: usize,

    /// The number of times a tried word had to be taken back out of the grid.
    pub backtracks: usize,

    pub propagation_time: Duration,
    pub search_time: Duration,
    pub total_time: Duration,
}

/// A struct representing the results of a successful solve.
#[derive(Debug, Clone)]
pub struct SolveSuccess {
    pub choices: Vec<Choice>,
    pub statistics: Statistics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveFailure {
    /// No assignment of words to slots satisfies all the constraints.
    Unsatisfiable,

    /// The search visited more states than the caller's budget allowed.
    ExceededNodeBudget(usize),
}

impl fmt::Display for SolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveFailure::Unsatisfiable => {
                write!(f, "grid has no solution with the given word list")
            }
            SolveFailure::ExceededNodeBudget(states) => {
                write!(f, "search abandoned after visiting {states} states")
            }
        }
    }
}

/// A struct tracking the word bound to each slot during search. Bindings are pushed and popped
/// in stack order as the search advances and retreats, so there is exactly one live assignment
/// for the whole solve.
#[derive(Debug, Clone)]
pub struct Assignment {
    words: Vec<Option<WordId>>,
    bound_count: usize,
}

impl Assignment {
    #[must_use]
    pub fn new(config: &GridConfig) -> Assignment {
        Assignment {
            words: vec![None; config.slot_count()],
            bound_count: 0,
        }
    }

    #[must_use]
    pub fn get(&self, slot_id: SlotId) -> Option<WordId> {
        self.words[slot_id]
    }

    #[must_use]
    pub fn is_bound(&self, slot_id: SlotId) -> bool {
        self.words[slot_id].is_some()
    }

    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.bound_count
    }

    /// Whether every slot has a word bound.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.bound_count == self.words.len()
    }

    pub fn bind(&mut self, slot_id: SlotId, word_id: WordId) {
        if CHECK_INVARIANTS && self.words[slot_id].is_some() {
            panic!("Binding an already-bound slot?");
        }

        self.words[slot_id] = Some(word_id);
        self.bound_count += 1;
    }

    pub fn unbind(&mut self, slot_id: SlotId) {
        if CHECK_INVARIANTS && self.words[slot_id].is_none() {
            panic!("Unbinding an unbound slot?");
        }

        self.words[slot_id] = None;
        self.bound_count -= 1;
    }

    /// Turn the bound slots into `Choice`s, in slot id order.
    #[must_use]
    pub fn to_choices(&self) -> Vec<Choice> {
        self.words
            .iter()
            .enumerate()
            .filter_map(|(slot_id, word)| word.map(|word_id| Choice { slot_id, word_id }))
            .collect()
    }
}

/// Whether the bound words satisfy every constraint among themselves: no word appears twice, and
/// every crossing between two bound slots agrees on the shared cell. Unbound slots are ignored,
/// so this can be called on a partial assignment after each new binding.
#[must_use]
pub fn consistent(config: &GridConfig, assignment: &Assignment) -> bool {
    let mut seen_words: HashSet<GlobalWordId> = HashSet::with_capacity(assignment.bound_count());

    for slot_config in &config.slot_configs {
        let Some(word_id) = assignment.get(slot_config.id) else {
            continue;
        };

        // Word ids are scoped to a length bucket, so a slot's word always has the slot's length
        // and two slots hold the same word exactly when their (length, word id) pairs match.
        if !seen_words.insert((slot_config.length, word_id)) {
            return false;
        }

        let word = config.word_list.get_word((slot_config.length, word_id));

        for (cell_idx, crossing) in slot_config.crossings.iter().enumerate() {
            let Some(crossing) = crossing else {
                continue;
            };

            // Each crossing is visible from both of its slots; checking it from the lower id is
            // enough.
            if crossing.other_slot_id < slot_config.id {
                continue;
            }

            let Some(other_word_id) = assignment.get(crossing.other_slot_id) else {
                continue;
            };

            let other_length = config.slot_configs[crossing.other_slot_id].length;
            let other_word = config.word_list.get_word((other_length, other_word_id));

            if word.glyphs[cell_idx] != other_word.glyphs[crossing.other_slot_cell] {
                return false;
            }
        }
    }

    true
}

/// Choose the next slot to fill: the unbound slot with the fewest remaining words, preferring
/// the slot that crosses the most others when that ties and the lowest id when that ties too.
/// Returns `None` once every slot is bound.
#[must_use]
pub fn select_unassigned_variable(
    config: &GridConfig,
    domains: &DomainStore,
    assignment: &Assignment,
) -> Option<SlotId> {
    (0..config.slot_count())
        .filter(|&slot_id| !assignment.is_bound(slot_id))
        .min_by_key(|&slot_id| {
            (
                domains.len(slot_id),
                Reverse(config.neighbors(slot_id).len()),
                slot_id,
            )
        })
}

/// Order a slot's remaining words for trying: words already bound elsewhere are excluded, and
/// the rest are sorted by how many of the slot's neighbors still have the word available,
/// fewest first. Ties keep ascending word id order.
#[must_use]
pub fn order_domain_values(
    config: &GridConfig,
    domains: &DomainStore,
    assignment: &Assignment,
    slot_id: SlotId,
) -> Vec<WordId> {
    let slot_config = &config.slot_configs[slot_id];

    let used_words: HashSet<GlobalWordId> = (0..config.slot_count())
        .filter_map(|other_id| {
            assignment
                .get(other_id)
                .map(|word_id| (config.slot_configs[other_id].length, word_id))
        })
        .collect();

    let mut word_ids: Vec<WordId> = domains
        .words(slot_id)
        .filter(|&word_id| !used_words.contains(&(slot_config.length, word_id)))
        .collect();

    // A word can only constrain a neighbor whose bucket has the same length, since word ids from
    // different buckets are unrelated.
    word_ids.sort_by_cached_key(|&word_id| {
        slot_config
            .neighbors
            .iter()
            .filter(|&&other_id| {
                config.slot_configs[other_id].length == slot_config.length
                    && domains.contains(other_id, word_id)
            })
            .count()
    });

    word_ids
}

/// The recursive heart of the solver: pick an unbound slot, try each of its candidate words in
/// least-constraining order, and recurse. Returns whether a complete consistent assignment was
/// reached. Bindings are pushed and popped on the single live assignment, so a failed branch
/// leaves no residue behind for its siblings.
fn backtrack(
    config: &GridConfig,
    domains: &DomainStore,
    assignment: &mut Assignment,
    statistics: &mut Statistics,
    node_budget: Option<usize>,
) -> Result<bool, SolveFailure> {
    statistics.states += 1;

    if let Some(budget) = node_budget {
        if statistics.states > budget {
            return Err(SolveFailure::ExceededNodeBudget(statistics.states));
        }
    }

    if assignment.is_complete() {
        return Ok(true);
    }

    let slot_id = select_unassigned_variable(config, domains, assignment)
        .expect("incomplete assignment must have an unbound slot");

    for word_id in order_domain_values(config, domains, assignment, slot_id) {
        assignment.bind(slot_id, word_id);

        if LOG_SOLVE_PROCESS {
            let slot_config = &config.slot_configs[slot_id];
            let word = config.word_list.get_word((slot_config.length, word_id));
            println!(
                "{:depth$}trying {} for slot {}",
                "",
                word.normalized_string,
                slot_config.slot_key(),
                depth = assignment.bound_count(),
            );
        }

        if consistent(config, assignment)
            && backtrack(config, domains, assignment, statistics, node_budget)?
        {
            return Ok(true);
        }

        assignment.unbind(slot_id);
        statistics.backtracks += 1;
    }

    Ok(false)
}

/// Search for a solution to the given grid, visiting at most `node_budget` search states if a
/// budget is given. The domains are pruned to arc consistency first; if that wipes out any
/// slot's domain, the grid is unsolvable and we never enter the search at all.
pub fn solve_with_budget(
    config: &GridConfig,
    node_budget: Option<usize>,
) -> Result<SolveSuccess, SolveFailure> {
    let start = Instant::now();
    let mut statistics = Statistics::default();

    let mut domains = DomainStore::new(config);

    let propagation_start = Instant::now();
    let arc_consistent = ac3(config, &mut domains, None);
    statistics.propagation_time = propagation_start.elapsed();

    if !arc_consistent {
        return Err(SolveFailure::Unsatisfiable);
    }

    let mut assignment = Assignment::new(config);

    let search_start = Instant::now();
    let solved = backtrack(config, &domains, &mut assignment, &mut statistics, node_budget)?;
    statistics.search_time = search_start.elapsed();

    if !solved {
        return Err(SolveFailure::Unsatisfiable);
    }

    if CHECK_INVARIANTS && !(assignment.is_complete() && consistent(config, &assignment)) {
        panic!("Search produced an incomplete or inconsistent solution?");
    }

    statistics.total_time = start.elapsed();

    Ok(SolveSuccess {
        choices: assignment.to_choices(),
        statistics,
    })
}

/// Search for a solution to the given grid with no limit on the number of search states.
pub fn solve(config: &GridConfig) -> Result<SolveSuccess, SolveFailure> {
    solve_with_budget(config, None)
}
