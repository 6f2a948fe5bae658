use smallvec::SmallVec;

use crate::types::WordId;
use crate::word_list::WordList;
use crate::MAX_GLYPH_COUNT;

/// Structure tracking, for each cell of a slot, the number of words among the slot's candidates
/// that place each glyph in that cell. A zero count means no remaining candidate supplies that
/// glyph in that cell.
pub type GlyphCountsByCell = Vec<SmallVec<[u32; MAX_GLYPH_COUNT]>>;

/// Initialize the `glyph_counts_by_cell` structure for a slot from the given candidate words.
#[must_use]
pub fn build_glyph_counts_by_cell(
    word_list: &WordList,
    slot_length: usize,
    options: &[WordId],
) -> GlyphCountsByCell {
    let mut result: GlyphCountsByCell = (0..slot_length)
        .map(|_| (0..word_list.glyphs.len()).map(|_| 0).collect())
        .collect();

    for &word_id in options {
        let word = &word_list.words[slot_length][word_id];
        for (cell_idx, &glyph) in word.glyphs.iter().enumerate() {
            result[cell_idx][glyph] += 1;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use crate::util::build_glyph_counts_by_cell;
    use crate::word_list::{WordList, WordListSourceConfig};

    #[test]
    fn test_glyph_counts_reflect_letter_positions() {
        let word_list = WordList::new(
            &[WordListSourceConfig::Memory {
                words: vec!["cat".into(), "car".into(), "toe".into()],
            }],
            None,
        )
        .unwrap();

        let counts = build_glyph_counts_by_cell(&word_list, 3, &[0, 1, 2]);
        let c = word_list.glyph_id_by_char[&'c'];
        let t = word_list.glyph_id_by_char[&'t'];
        let r = word_list.glyph_id_by_char[&'r'];

        assert_eq!(counts.len(), 3);
        assert_eq!(counts[0][c], 2);
        assert_eq!(counts[0][t], 1);
        assert_eq!(counts[2][t], 1);
        assert_eq!(counts[2][r], 1);
    }
}
