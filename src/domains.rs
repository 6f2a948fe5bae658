//! This module implements the solver's record of which words are still available for each slot.
//! Domains start out node-consistent, containing exactly the words whose length matches the
//! slot, and only ever shrink from there.

use crate::grid_config::{GridConfig, SlotId};
use crate::types::{GlyphId, WordId};
use crate::util::{build_glyph_counts_by_cell, GlyphCountsByCell};
use crate::word_list::WordList;

/// The candidate bookkeeping for a single slot.
#[derive(Debug, Clone)]
struct SlotDomain {
    /// The slot's length, which identifies the word list bucket its ids refer to.
    length: usize,

    /// Whether each word id in the slot's length bucket has been ruled out.
    eliminated: Vec<bool>,

    /// The number of words not yet ruled out.
    remaining_count: usize,

    /// For each cell and glyph, the number of remaining words with that glyph in that cell.
    glyph_counts_by_cell: GlyphCountsByCell,
}

/// A struct tracking the remaining candidates for every slot in a grid.
#[derive(Debug, Clone)]
pub struct DomainStore {
    slots: Vec<SlotDomain>,
}

impl DomainStore {
    /// Build node-consistent domains for every slot in the given config. A slot longer than any
    /// word in the list gets an empty domain.
    #[must_use]
    pub fn new(config: &GridConfig) -> DomainStore {
        let slots = config
            .slot_configs
            .iter()
            .map(|slot_config| {
                let bucket_len = config
                    .word_list
                    .words
                    .get(slot_config.length)
                    .map_or(0, Vec::len);
                let options: Vec<WordId> = (0..bucket_len).collect();

                SlotDomain {
                    length: slot_config.length,
                    eliminated: vec![false; bucket_len],
                    remaining_count: bucket_len,
                    glyph_counts_by_cell: build_glyph_counts_by_cell(
                        &config.word_list,
                        slot_config.length,
                        &options,
                    ),
                }
            })
            .collect();

        DomainStore { slots }
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The number of words remaining for the given slot.
    #[must_use]
    pub fn len(&self, slot_id: SlotId) -> usize {
        self.slots[slot_id].remaining_count
    }

    /// Whether the given slot has no words remaining.
    #[must_use]
    pub fn is_empty(&self, slot_id: SlotId) -> bool {
        self.slots[slot_id].remaining_count == 0
    }

    /// Whether the given word is still available for the given slot.
    #[must_use]
    pub fn contains(&self, slot_id: SlotId, word_id: WordId) -> bool {
        let slot = &self.slots[slot_id];
        word_id < slot.eliminated.len() && !slot.eliminated[word_id]
    }

    /// Iterate over the remaining words for the given slot, in ascending id order.
    pub fn words(&self, slot_id: SlotId) -> impl Iterator<Item = WordId> + '_ {
        self.slots[slot_id]
            .eliminated
            .iter()
            .enumerate()
            .filter(|&(_, &eliminated)| !eliminated)
            .map(|(word_id, _)| word_id)
    }

    /// Rule out the given word for the given slot, keeping the remaining count and per-cell
    /// glyph counts in sync. Returns whether the word was actually present.
    pub fn remove(&mut self, word_list: &WordList, slot_id: SlotId, word_id: WordId) -> bool {
        let slot = &mut self.slots[slot_id];
        if slot.eliminated[word_id] {
            return false;
        }

        slot.eliminated[word_id] = true;
        slot.remaining_count -= 1;

        let word = word_list.get_word((slot.length, word_id));
        for (cell_idx, &glyph) in word.glyphs.iter().enumerate() {
            slot.glyph_counts_by_cell[cell_idx][glyph] -= 1;
        }

        true
    }

    /// The number of remaining words for the given slot with the given glyph in the given cell.
    #[must_use]
    pub fn glyph_support(&self, slot_id: SlotId, cell_idx: usize, glyph: GlyphId) -> u32 {
        self.slots[slot_id].glyph_counts_by_cell[cell_idx][glyph]
    }
}

#[cfg(test)]
mod tests {
    use crate::domains::DomainStore;
    use crate::grid_config::{Grid, GridConfig};
    use crate::types::GlyphId;
    use crate::word_list::{WordList, WordListSourceConfig};

    fn config_with_words(template: &str, words: &[&str]) -> GridConfig {
        let word_list = WordList::new(
            &[WordListSourceConfig::Memory {
                words: words.iter().map(|&word| word.into()).collect(),
            }],
            None,
        )
        .unwrap();

        GridConfig::new(Grid::parse(template).unwrap(), word_list)
    }

    #[test]
    fn test_domains_start_node_consistent() {
        let config = config_with_words("....\n####\n...#", &["cat", "dog", "acre", "tarp", "ox"]);
        let domains = DomainStore::new(&config);

        assert_eq!(domains.slot_count(), 2);

        // Slot 0 is the four-cell row; slot 1 is the three-cell row.
        assert_eq!(domains.len(0), 2);
        assert_eq!(domains.len(1), 2);
        assert_eq!(domains.words(1).collect::<Vec<_>>(), vec![0, 1]);
        assert!(domains.contains(0, 1));
        assert!(!domains.contains(0, 2));
    }

    #[test]
    fn test_slot_longer_than_any_word_is_empty() {
        let config = config_with_words(".....", &["cat"]);
        let domains = DomainStore::new(&config);

        assert!(domains.is_empty(0));
        assert_eq!(domains.words(0).count(), 0);
    }

    #[test]
    fn test_remove_updates_counts_and_supports() {
        let config = config_with_words("...", &["cat", "car", "toe"]);
        let mut domains = DomainStore::new(&config);
        let glyph = |ch: char| -> GlyphId { config.word_list.glyph_id_by_char[&ch] };

        assert_eq!(domains.glyph_support(0, 0, glyph('c')), 2);
        assert_eq!(domains.glyph_support(0, 2, glyph('r')), 1);

        assert!(domains.remove(&config.word_list, 0, 1));

        assert_eq!(domains.len(0), 2);
        assert!(!domains.contains(0, 1));
        assert_eq!(domains.words(0).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(domains.glyph_support(0, 0, glyph('c')), 1);
        assert_eq!(domains.glyph_support(0, 2, glyph('r')), 0);

        // Removing the same word again is a no-op.
        assert!(!domains.remove(&config.word_list, 0, 1));
        assert_eq!(domains.len(0), 2);
    }
}
