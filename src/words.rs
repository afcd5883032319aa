use smallvec::SmallVec;

use crate::{WordId, MAX_GAP_LENGTH};

/// A candidate word together with its usage flag. Entries are never removed from the pool during
/// a search; claiming and releasing the flag is what makes them exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub string: String,
    pub letters: SmallVec<[char; MAX_GAP_LENGTH]>,
    pub used: bool,
}

/// Candidate words grouped by length. `words_by_length[n]` holds every word of length `n` in
/// input order.
#[derive(Debug, Clone, Default)]
pub struct WordPool {
    words_by_length: Vec<Vec<WordEntry>>,
}

/// Does `word` fit a gap currently holding `pattern`? Lengths must agree, and every position must
/// either hold the same letter or still be a placeholder.
pub fn matches(pattern: &[char], word: &[char], placeholder: char) -> bool {
    pattern.len() == word.len()
        && pattern
            .iter()
            .zip(word)
            .all(|(&p, &w)| p == placeholder || p == w)
}

impl WordPool {
    /// Group the given words by length. Identical strings stay separate entries, each of which can
    /// fill one gap.
    pub fn new<I, S>(words: I) -> WordPool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words_by_length: Vec<Vec<WordEntry>> = vec![];

        for word in words {
            let string = word.as_ref().to_string();
            let letters: SmallVec<[char; MAX_GAP_LENGTH]> = string.chars().collect();
            let length = letters.len();

            if words_by_length.len() <= length {
                words_by_length.resize_with(length + 1, Vec::new);
            }
            words_by_length[length].push(WordEntry { string, letters, used: false });
        }

        WordPool { words_by_length }
    }

    /// Every entry of the given length, in input order. Empty if there are none.
    pub fn words_of_length(&self, length: usize) -> &[WordEntry] {
        self.words_by_length
            .get(length)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.words_by_length.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many entries are currently claimed by some gap.
    pub fn used_count(&self) -> usize {
        self.words_by_length
            .iter()
            .flatten()
            .filter(|entry| entry.used)
            .count()
    }

    pub fn entry(&self, length: usize, word_id: WordId) -> &WordEntry {
        &self.words_of_length(length)[word_id]
    }

    /// First unused entry at or after `from` that fits `pattern`.
    pub fn next_candidate(&self, pattern: &[char], placeholder: char, from: WordId) -> Option<WordId> {
        self.words_of_length(pattern.len())
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, entry)| !entry.used && matches(pattern, &entry.letters, placeholder))
            .map(|(word_id, _)| word_id)
    }

    /// Ids of every unused entry that fits `pattern`, in input order.
    pub fn candidates<'a>(
        &'a self,
        pattern: &'a [char],
        placeholder: char,
    ) -> impl Iterator<Item = WordId> + 'a {
        self.words_of_length(pattern.len())
            .iter()
            .enumerate()
            .filter(move |(_, entry)| !entry.used && matches(pattern, &entry.letters, placeholder))
            .map(|(word_id, _)| word_id)
    }

    pub fn has_candidate(&self, pattern: &[char], placeholder: char) -> bool {
        self.next_candidate(pattern, placeholder, 0).is_some()
    }

    /// Mark an entry as used and hand back its letters.
    pub(crate) fn claim(&mut self, length: usize, word_id: WordId) -> &[char] {
        let entry = self.entry_mut(length, word_id);
        debug_assert!(!entry.used, "word {:?} claimed twice", entry.string);
        entry.used = true;
        &entry.letters
    }

    pub(crate) fn release(&mut self, length: usize, word_id: WordId) {
        let entry = self.entry_mut(length, word_id);
        debug_assert!(entry.used, "word {:?} released while free", entry.string);
        entry.used = false;
    }

    fn entry_mut(&mut self, length: usize, word_id: WordId) -> &mut WordEntry {
        &mut self.words_by_length[length][word_id]
    }
}

#[cfg(test)]
mod tests {
    use super::{matches, WordPool};

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_groups_by_length_in_input_order() {
        let pool = WordPool::new(["DOG", "AB", "CAT", "EFGH", "AC"]);

        let threes: Vec<&str> = pool.words_of_length(3).iter().map(|e| e.string.as_str()).collect();
        let twos: Vec<&str> = pool.words_of_length(2).iter().map(|e| e.string.as_str()).collect();

        assert_eq!(threes, vec!["DOG", "CAT"]);
        assert_eq!(twos, vec!["AB", "AC"]);
        assert_eq!(pool.words_of_length(4).len(), 1);
        assert!(pool.words_of_length(7).is_empty());
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.used_count(), 0);
    }

    #[test]
    fn test_duplicates_are_separate_entries() {
        let mut pool = WordPool::new(vec!["TOT".to_string(), "TOT".to_string()]);
        let pattern = chars("T..");

        assert_eq!(pool.candidates(&pattern, '.').collect::<Vec<_>>(), vec![0, 1]);

        pool.claim(3, 0);
        assert_eq!(pool.candidates(&pattern, '.').collect::<Vec<_>>(), vec![1]);
        assert!(pool.has_candidate(&pattern, '.'));

        pool.claim(3, 1);
        assert!(!pool.has_candidate(&pattern, '.'));
        assert_eq!(pool.used_count(), 2);

        pool.release(3, 0);
        pool.release(3, 1);
        assert_eq!(pool.used_count(), 0);
    }

    #[test]
    fn test_wildcard_matching() {
        let placeholder = '.';

        assert!(matches(&chars("..."), &chars("CAT"), placeholder));
        assert!(matches(&chars("C.T"), &chars("CAT"), placeholder));
        assert!(matches(&chars("CAT"), &chars("CAT"), placeholder));
        assert!(!matches(&chars("C.R"), &chars("CAT"), placeholder));
        assert!(!matches(&chars(".."), &chars("CAT"), placeholder));
        assert!(!matches(&chars("...."), &chars("CAT"), placeholder));

        // Only the configured placeholder is a wildcard.
        assert!(!matches(&chars("_AT"), &chars("CAT"), '.'));
        assert!(matches(&chars("_AT"), &chars("CAT"), '_'));
    }

    #[test]
    fn test_next_candidate_resumes_after_previous() {
        let pool = WordPool::new(["CAT", "COT", "DOG", "CUT"]);
        let pattern = chars("C.T");

        assert_eq!(pool.next_candidate(&pattern, '.', 0), Some(0));
        assert_eq!(pool.next_candidate(&pattern, '.', 1), Some(1));
        assert_eq!(pool.next_candidate(&pattern, '.', 2), Some(3));
        assert_eq!(pool.next_candidate(&pattern, '.', 4), None);
        assert_eq!(pool.next_candidate(&chars("..."), '.', 0), Some(0));
        assert_eq!(pool.next_candidate(&chars("....."), '.', 0), None);
    }
}
