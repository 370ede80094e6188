//! Генерация высоты башни нового узла.

/// Абсолютный потолок высоты башни.
pub const MAX_LEVEL: usize = 32;

/// Источник высот для новых узлов.
///
/// Возвращаемое значение обрезается до `1..=ceiling`, где `ceiling` не
/// превышает текущий уровень списка плюс один.
pub trait LevelGenerator: Send {
    fn random_level(
        &mut self,
        ceiling: usize,
    ) -> usize;
}

/// Честное подбрасывание монеты (p = 0.5) на `fastrand::Rng`.
#[derive(Debug)]
pub struct CoinFlip {
    rng: fastrand::Rng,
}

/// Всегда одна и та же высота. Полезно для воспроизводимых тестов.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedLevel(pub usize);

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl CoinFlip {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    /// Детерминированная последовательность высот.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

/// Подбрасывание монеты на потоковом генераторе `fastrand`: без общего
/// состояния между потоками.
#[inline]
pub(crate) fn thread_local_level(ceiling: usize) -> usize {
    flip_level(ceiling, fastrand::bool)
}

#[inline]
fn flip_level(
    ceiling: usize,
    mut flip: impl FnMut() -> bool,
) -> usize {
    let mut lvl = 1;

    while lvl < ceiling && flip() {
        lvl += 1;
    }

    lvl
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl Default for CoinFlip {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelGenerator for CoinFlip {
    #[inline]
    fn random_level(
        &mut self,
        ceiling: usize,
    ) -> usize {
        flip_level(ceiling, || self.rng.bool())
    }
}

impl LevelGenerator for FixedLevel {
    fn random_level(
        &mut self,
        ceiling: usize,
    ) -> usize {
        self.0.clamp(1, ceiling.max(1))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_flip_respects_ceiling() {
        let mut levels = CoinFlip::with_seed(7);
        for ceiling in 1..=MAX_LEVEL {
            for _ in 0..200 {
                let lvl = levels.random_level(ceiling);
                assert!((1..=ceiling).contains(&lvl));
            }
        }
    }

    #[test]
    fn test_coin_flip_is_deterministic_with_seed() {
        let mut a = CoinFlip::with_seed(42);
        let mut b = CoinFlip::with_seed(42);
        let xs: Vec<usize> = (0..64).map(|_| a.random_level(MAX_LEVEL)).collect();
        let ys: Vec<usize> = (0..64).map(|_| b.random_level(MAX_LEVEL)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_coin_flip_distribution_is_geometric() {
        let mut levels = CoinFlip::with_seed(1);
        let samples = 20_000;
        let ones = (0..samples)
            .filter(|_| levels.random_level(MAX_LEVEL) == 1)
            .count();

        // Примерно половина узлов остаётся на первом уровне.
        let ratio = ones as f64 / samples as f64;
        assert!((0.45..0.55).contains(&ratio), "ratio = {ratio}");
    }

    #[test]
    fn test_thread_local_level_respects_ceiling() {
        assert_eq!(thread_local_level(1), 1);
        for _ in 0..1_000 {
            assert!((1..=4).contains(&thread_local_level(4)));
        }
    }

    #[test]
    fn test_fixed_level_is_clamped() {
        assert_eq!(FixedLevel(5).random_level(3), 3);
        assert_eq!(FixedLevel(0).random_level(3), 1);
        assert_eq!(FixedLevel(2).random_level(8), 2);
    }
}
