/// Макрос для debug-time проверки инвариантов.
///
/// В release-сборках компилируется в no-op.
#[macro_export]
macro_rules! debug_assert_invariant {
    ($cond:expr, $($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            if !$cond {
                panic!("Invariant violation: {}", format!($($arg)*));
            }
        }
    };
}

/// Макрос для валидации условий с возвратом ошибки.
#[macro_export]
macro_rules! validate {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Башня узла выше текущего уровня списка
    InvalidLevel { node_level: usize, max_level: usize },
    /// Узел встречен на уровне, которого нет в его башне
    ForwardVectorMismatch { level: usize, height: usize },
    /// Нарушен порядок сортировки
    SortOrderViolation { level: usize, message: String },
    /// Узел присутствует на уровне `level`, но отсутствует ниже
    TowerGap { level: usize, node: usize },
    /// Длина списка не соответствует реальному кол-ву узлов
    LengthMismatch { expected: usize, actual: usize },
    /// Обнаружена циклическая ссылка
    CyclicReference { level: usize },
    /// Удалённый узел всё ещё достижим
    MarkedNodeReachable { level: usize, node: usize },
    /// Голова ссылается на узел выше текущего уровня
    DanglingHeadLink { level: usize },
    /// Значение лежит не в том шарде, который выбирает функция шардирования
    WrongShard { shard: usize, expected: usize },
    /// Нарушение внутри конкретного шарда
    ShardViolation { shard: usize, source: Box<ValidationError> },
}

/// Статистика структуры SkipList.
#[derive(Debug, Clone, PartialEq)]
pub struct SkipListStatistics {
    /// Количество узлов
    pub node_count: usize,
    /// Распределение по уровням (индекс `i` соответствует узлам высоты `i + 1`)
    pub level_distribution: Vec<usize>,
    /// Текущий максимальный уровень
    pub current_max_level: usize,
    /// Максимально возможный уровень
    pub max_possible_level: usize,
    /// Средний уровень узла
    pub average_level: f64,
    /// Слоты арены, отвязанные, но ещё не освобождённые
    pub retired_slots: usize,
}

impl SkipListStatistics {
    /// Создает пустую статистику.
    pub fn empty(max_level: usize) -> Self {
        Self {
            node_count: 0,
            level_distribution: vec![0; max_level],
            current_max_level: 1,
            max_possible_level: max_level,
            average_level: 0.0,
            retired_slots: 0,
        }
    }

    /// Вычисляет средний уровень.
    pub fn compute_average_level(&mut self) {
        if self.node_count == 0 {
            self.average_level = 0.0;
            return;
        }

        let total_levels: usize = self
            .level_distribution
            .iter()
            .enumerate()
            .map(|(level, &count)| (level + 1) * count)
            .sum();

        self.average_level = total_levels as f64 / self.node_count as f64;
    }

    /// Объединяет статистику нескольких шардов.
    pub fn merge(
        &mut self,
        other: &SkipListStatistics,
    ) {
        self.node_count += other.node_count;
        self.retired_slots += other.retired_slots;
        self.current_max_level = self.current_max_level.max(other.current_max_level);
        self.max_possible_level = self.max_possible_level.max(other.max_possible_level);

        if self.level_distribution.len() < other.level_distribution.len() {
            self.level_distribution
                .resize(other.level_distribution.len(), 0);
        }
        for (dst, src) in self
            .level_distribution
            .iter_mut()
            .zip(&other.level_distribution)
        {
            *dst += src;
        }

        self.compute_average_level();
    }

    /// Форматирует статистику для вывода.
    pub fn format_report(&self) -> String {
        let mut report = String::new();
        report.push_str("SkipList Statistics:\n");
        report.push_str(&format!("  Total nodes: {}\n", self.node_count));
        report.push_str(&format!(
            "  Current max level: {}\n",
            self.current_max_level
        ));
        report.push_str(&format!(
            "  Max possible level: {}\n",
            self.max_possible_level
        ));
        report.push_str(&format!("  Average level: {:.2}\n", self.average_level));
        report.push_str(&format!("  Retired slots: {}\n", self.retired_slots));
        report.push_str("  Level distribution:\n");

        for (level, &count) in self.level_distribution.iter().enumerate() {
            if count > 0 {
                let percentage = (count as f64 / self.node_count as f64) * 100.0;
                report.push_str(&format!(
                    "    Level {}: {} nodes ({:.1}%)\n",
                    level + 1,
                    count,
                    percentage
                ));
            }
        }

        report
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            ValidationError::InvalidLevel {
                node_level,
                max_level,
            } => {
                write!(
                    f,
                    "Node level {node_level} exceeds maximum level {max_level}"
                )
            }
            ValidationError::ForwardVectorMismatch { level, height } => {
                write!(
                    f,
                    "Node of height {height} reachable on level {level}"
                )
            }
            ValidationError::SortOrderViolation { level, message } => {
                write!(f, "Sort order violation on level {level}: {message}")
            }
            ValidationError::TowerGap { level, node } => {
                write!(
                    f,
                    "Node {node} linked on level {level} but missing on the level below"
                )
            }
            ValidationError::LengthMismatch { expected, actual } => {
                write!(f, "Length mismatch: expected {expected}, got {actual}")
            }
            ValidationError::CyclicReference { level } => {
                write!(f, "Cyclic reference detected on level {level}")
            }
            ValidationError::MarkedNodeReachable { level, node } => {
                write!(f, "Removed node {node} still reachable on level {level}")
            }
            ValidationError::DanglingHeadLink { level } => {
                write!(f, "Head links level {level} above the current level")
            }
            ValidationError::WrongShard { shard, expected } => {
                write!(f, "Value stored in shard {shard} belongs to shard {expected}")
            }
            ValidationError::ShardViolation { shard, source } => {
                write!(f, "Shard {shard}: {source}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Invariant violation: node 3 of height 4 is above list level 2")]
    fn test_debug_assert_invariant_panics_on_violation() {
        let (node, height, level) = (3, 4, 2);
        crate::debug_assert_invariant!(
            height <= level,
            "node {node} of height {height} is above list level {level}"
        );
    }

    #[test]
    fn test_debug_assert_invariant_passes_when_held() {
        let height = 1;
        crate::debug_assert_invariant!(height <= 2, "height {height}");
    }

    #[test]
    fn test_statistics_empty() {
        let stats = SkipListStatistics::empty(16);

        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.current_max_level, 1);
        assert_eq!(stats.average_level, 0.0);
    }

    #[test]
    fn test_statistics_compute_average() {
        let mut stats = SkipListStatistics {
            node_count: 3,
            level_distribution: vec![1, 1, 1, 0],
            current_max_level: 3,
            max_possible_level: 4,
            average_level: 0.0,
            retired_slots: 0,
        };

        stats.compute_average_level();
        assert_eq!(stats.average_level, 2.0); // (1*1 + 2*1 + 3*1) / 3 = 2.0
    }

    #[test]
    fn test_statistics_merge() {
        let mut a = SkipListStatistics {
            node_count: 2,
            level_distribution: vec![2, 0],
            current_max_level: 1,
            max_possible_level: 2,
            average_level: 1.0,
            retired_slots: 1,
        };
        let b = SkipListStatistics {
            node_count: 2,
            level_distribution: vec![0, 2],
            current_max_level: 2,
            max_possible_level: 2,
            average_level: 2.0,
            retired_slots: 0,
        };

        a.merge(&b);
        assert_eq!(a.node_count, 4);
        assert_eq!(a.level_distribution, vec![2, 2]);
        assert_eq!(a.current_max_level, 2);
        assert_eq!(a.average_level, 1.5);
        assert_eq!(a.retired_slots, 1);
    }

    #[test]
    fn test_format_report() {
        let mut stats = SkipListStatistics::empty(4);
        stats.node_count = 4;
        stats.level_distribution = vec![3, 1, 0, 0];
        stats.compute_average_level();

        let report = stats.format_report();
        assert!(report.contains("Total nodes: 4"));
        assert!(report.contains("Level 1: 3 nodes (75.0%)"));
        assert!(!report.contains("Level 3"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::InvalidLevel {
            node_level: 20,
            max_level: 16,
        };
        assert!(err.to_string().contains("exceeds maximum level"));
    }
}
