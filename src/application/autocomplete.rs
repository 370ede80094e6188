use crate::database::Trie;

/// Подсказки по префиксу над фиксированным словарём.
#[derive(Debug, Clone, Default)]
pub struct Autocomplete {
    trie: Trie,
}

impl Autocomplete {
    pub fn new<'a, I>(words: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            trie: words.into_iter().collect(),
        }
    }

    pub fn add_word(
        &mut self,
        word: &str,
    ) {
        self.trie.insert(word);
    }

    /// Слова словаря, начинающиеся с `prefix`, по возрастанию.
    pub fn suggest(
        &self,
        prefix: &str,
    ) -> Vec<String> {
        self.trie.query_words(prefix)
    }

    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggest() {
        let words = ["apple", "app", "apricot", "banana", "bat", "batch"];
        let mut complete = Autocomplete::new(words);

        assert_eq!(complete.suggest("ap"), vec!["app", "apple", "apricot"]);
        assert_eq!(complete.suggest("bat"), vec!["bat", "batch"]);
        assert!(complete.suggest("c").is_empty());

        complete.add_word("cat");
        assert_eq!(complete.suggest("c"), vec!["cat"]);
        assert_eq!(complete.len(), 7);
    }
}
