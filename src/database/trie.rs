use std::collections::BTreeMap;

/// Префиксное дерево слов.
///
/// Дети хранятся в `BTreeMap`, поэтому обход и выдача по префиксу идут
/// в лексикографическом порядке символов.
#[derive(Debug, Default, Clone)]
pub struct Trie {
    root: TrieNode,
    words: usize,
}

#[derive(Debug, Default, Clone)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    end_of_word: bool,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавляет слово без крайних пробелов. Пустое слово игнорируется.
    pub fn insert(
        &mut self,
        word: &str,
    ) {
        let word = word.trim();
        if word.is_empty() {
            return;
        }

        let mut current = &mut self.root;
        for c in word.chars() {
            current = current.children.entry(c).or_default();
        }

        if !current.end_of_word {
            current.end_of_word = true;
            self.words += 1;
        }
    }

    /// Точное совпадение слова. Пустая строка словом не бывает.
    pub fn search(
        &self,
        word: &str,
    ) -> bool {
        self.descend(word).is_some_and(|node| node.end_of_word)
    }

    /// Все слова с префиксом `prefix` по возрастанию.
    pub fn query_words(
        &self,
        prefix: &str,
    ) -> Vec<String> {
        let mut results = Vec::new();
        if let Some(node) = self.descend(prefix) {
            collect_words(node, &mut prefix.to_string(), &mut results);
        }
        results
    }

    /// Все слова по возрастанию.
    pub fn iter(&self) -> impl Iterator<Item = String> {
        self.query_words("").into_iter()
    }

    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    fn descend(
        &self,
        prefix: &str,
    ) -> Option<&TrieNode> {
        prefix
            .chars()
            .try_fold(&self.root, |node, c| node.children.get(&c))
    }
}

fn collect_words(
    node: &TrieNode,
    prefix: &mut String,
    results: &mut Vec<String>,
) {
    if node.end_of_word {
        results.push(prefix.clone());
    }

    for (&c, child) in &node.children {
        prefix.push(c);
        collect_words(child, prefix, results);
        prefix.pop();
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для Trie
////////////////////////////////////////////////////////////////////////////////

impl<'a> FromIterator<&'a str> for Trie {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut trie = Trie::new();
        for word in iter {
            trie.insert(word);
        }
        trie
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
