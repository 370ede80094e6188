//! Правила сравнения и равенства для индекса.
//!
//! Порядок (`Comparator`) определяет размещение узлов и поиск дубликатов,
//! равенство (`Equivalence`) подтверждает совпадение при `find`/`remove`.
//! Это две независимые способности: их можно задать несогласованно, и
//! поведение индекса тогда определяется правилами выше.

use std::cmp::Ordering;

/// Правило упорядочивания значений.
pub trait Comparator<T: ?Sized>: Send + Sync {
    fn compare(
        &self,
        a: &T,
        b: &T,
    ) -> Ordering;
}

/// Правило равенства значений.
pub trait Equivalence<T: ?Sized>: Send + Sync {
    fn equivalent(
        &self,
        a: &T,
        b: &T,
    ) -> bool;
}

/// Естественный порядок `Ord`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NaturalOrder;

/// Обращённый порядок вложенного компаратора.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Reverse<C>(pub C);

/// Порядок, заданный замыканием.
#[derive(Clone, Copy)]
pub struct OrderBy<F>(pub F);

/// Естественный порядок по извлечённому ключу.
#[derive(Clone, Copy)]
pub struct OrderByKey<F>(pub F);

/// Естественное равенство `PartialEq`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NaturalEq;

/// Равенство, заданное замыканием.
#[derive(Clone, Copy)]
pub struct EqBy<F>(pub F);

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(
        &self,
        a: &T,
        b: &T,
    ) -> Ordering {
        a.cmp(b)
    }
}

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reverse<C> {
    #[inline]
    fn compare(
        &self,
        a: &T,
        b: &T,
    ) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<T, F> Comparator<T> for OrderBy<F>
where
    T: ?Sized,
    F: Fn(&T, &T) -> Ordering + Send + Sync,
{
    #[inline]
    fn compare(
        &self,
        a: &T,
        b: &T,
    ) -> Ordering {
        (self.0)(a, b)
    }
}

impl<T, K, F> Comparator<T> for OrderByKey<F>
where
    K: Ord,
    F: Fn(&T) -> K + Send + Sync,
{
    #[inline]
    fn compare(
        &self,
        a: &T,
        b: &T,
    ) -> Ordering {
        (self.0)(a).cmp(&(self.0)(b))
    }
}

impl<T: PartialEq + ?Sized> Equivalence<T> for NaturalEq {
    #[inline]
    fn equivalent(
        &self,
        a: &T,
        b: &T,
    ) -> bool {
        a == b
    }
}

impl<T, F> Equivalence<T> for EqBy<F>
where
    T: ?Sized,
    F: Fn(&T, &T) -> bool + Send + Sync,
{
    #[inline]
    fn equivalent(
        &self,
        a: &T,
        b: &T,
    ) -> bool {
        (self.0)(a, b)
    }
}

impl<F> std::fmt::Debug for OrderBy<F> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str("OrderBy(..)")
    }
}

impl<F> std::fmt::Debug for OrderByKey<F> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str("OrderByKey(..)")
    }
}

impl<F> std::fmt::Debug for EqBy<F> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str("EqBy(..)")
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
