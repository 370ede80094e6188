use std::fmt;

use crate::database::{NaturalEq, NaturalOrder, Reverse, SkipList};

/// Позиция в таблице результатов.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedScore {
    pub rank: usize,
    pub score: i64,
}

/// Таблица рекордов поверх SkipList с обратным порядком: лучший
/// результат всегда первый, одинаковые результаты допускаются.
pub struct Leaderboard {
    scores: SkipList<i64, Reverse<NaturalOrder>>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            scores: SkipList::with_rules(Reverse(NaturalOrder), NaturalEq),
        }
    }

    pub fn with_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let board = Self::new();
        board.scores.add_range(scores);
        board
    }

    pub fn add_score(
        &self,
        score: i64,
    ) {
        self.scores.add(score);
    }

    pub fn remove_score(
        &self,
        score: i64,
    ) -> bool {
        self.scores.remove(&score)
    }

    /// Первые `n` результатов с «олимпийским» рангом: равные результаты
    /// делят ранг, следующий ранг пропускает занятые места (1, 2, 2, 4).
    pub fn top(
        &self,
        n: usize,
    ) -> Vec<RankedScore> {
        let mut ranked: Vec<RankedScore> = Vec::with_capacity(n.min(self.len()));

        for (position, score) in self.scores.iter().take(n).enumerate() {
            let rank = match ranked.last() {
                Some(prev) if prev.score == score => prev.rank,
                _ => position + 1,
            };
            ranked.push(RankedScore { rank, score });
        }

        ranked
    }

    pub fn best(&self) -> Option<i64> {
        self.scores.first()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RankedScore {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}. {}", self.rank, self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Leaderboard {
        Leaderboard::with_scores([
            5000, 100, 7000, 200, 400, 3000, 8900, 8000, 9000, 10000, 1000, 1000, 1000, 500, 5500,
            6900, 700, 900, 3100, 900,
        ])
    }

    fn scores(ranked: &[RankedScore]) -> Vec<(usize, i64)> {
        ranked.iter().map(|r| (r.rank, r.score)).collect()
    }

    #[test]
    fn test_top_is_descending() {
        let board = sample();
        assert_eq!(board.len(), 20);
        assert_eq!(
            scores(&board.top(5)),
            vec![(1, 10000), (2, 9000), (3, 8900), (4, 8000), (5, 7000)]
        );

        board.add_score(9500);
        assert_eq!(
            scores(&board.top(3)),
            vec![(1, 10000), (2, 9500), (3, 9000)]
        );
        assert_eq!(board.best(), Some(10000));
    }

    #[test]
    fn test_ties_share_rank() {
        let board = Leaderboard::with_scores([50, 70, 70, 30, 70, 10]);

        assert_eq!(
            scores(&board.top(6)),
            vec![(1, 70), (1, 70), (1, 70), (4, 50), (5, 30), (6, 10)]
        );
        assert_eq!(board.top(2)[1].to_string(), "1. 70");
    }

    #[test]
    fn test_top_larger_than_board() {
        let board = Leaderboard::new();
        assert!(board.top(3).is_empty());

        board.add_score(1);
        assert_eq!(board.top(10).len(), 1);
        assert!(board.remove_score(1));
        assert!(board.is_empty());
    }
}
