/// An identifier for a given letter or symbol, based on its index in the `WordList`'s `glyphs`
/// field.
pub type GlyphId = usize;

/// An identifier for a given word, based on its index into the `WordList`'s length bucket for
/// words of its size. Word ids are only meaningful together with a length.
pub type WordId = usize;

/// An identifier that fully specifies a word by pairing its length with its `WordId`. Two slots
/// hold the same word exactly when their `GlobalWordId`s are equal, which is what the solver's
/// duplicate checks compare.
pub type GlobalWordId = (usize, WordId);
