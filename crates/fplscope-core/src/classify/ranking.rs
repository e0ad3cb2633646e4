// Composable comparators for cohort ordering.
//
// A `Ranking` compares on one numeric key, optionally falling through to a
// secondary key when the primary values sit within a tie window of each other
// (e.g. form within 0.5 points, then net transfers).

use std::cmp::Ordering;

/// Direction of a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }
}

type KeyFn<'a, T> = Box<dyn Fn(&T) -> f64 + 'a>;

struct RankKey<'a, T> {
    key: KeyFn<'a, T>,
    order: SortOrder,
}

impl<T> RankKey<'_, T> {
    fn value(&self, item: &T) -> f64 {
        (self.key)(item)
    }

    fn compare_values(&self, a: f64, b: f64) -> Ordering {
        self.order.apply(a.total_cmp(&b))
    }

    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.compare_values(self.value(a), self.value(b))
    }
}

struct TieBreak<'a, T> {
    window: f64,
    key: RankKey<'a, T>,
}

/// Primary key plus an optional windowed secondary key.
pub struct Ranking<'a, T> {
    primary: RankKey<'a, T>,
    tie: Option<TieBreak<'a, T>>,
}

impl<'a, T> Ranking<'a, T> {
    /// Rank by a single key.
    pub fn by(key: impl Fn(&T) -> f64 + 'a, order: SortOrder) -> Self {
        Ranking {
            primary: RankKey {
                key: Box::new(key),
                order,
            },
            tie: None,
        }
    }

    /// Shorthand for a descending single-key ranking.
    pub fn descending(key: impl Fn(&T) -> f64 + 'a) -> Self {
        Self::by(key, SortOrder::Descending)
    }

    /// Shorthand for an ascending single-key ranking.
    pub fn ascending(key: impl Fn(&T) -> f64 + 'a) -> Self {
        Self::by(key, SortOrder::Ascending)
    }

    /// Defer to `key` whenever the primary values differ by no more than `window`.
    pub fn then_within(
        mut self,
        window: f64,
        key: impl Fn(&T) -> f64 + 'a,
        order: SortOrder,
    ) -> Self {
        self.tie = Some(TieBreak {
            window,
            key: RankKey {
                key: Box::new(key),
                order,
            },
        });
        self
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let Some(tie) = &self.tie else {
            return self.primary.compare(a, b);
        };
        let pa = self.primary.value(a);
        let pb = self.primary.value(b);
        if (pa - pb).abs() > tie.window {
            self.primary.compare_values(pa, pb)
        } else {
            tie.key.compare(a, b)
        }
    }

    /// Stable sort. Equal items keep their input order.
    ///
    /// A windowed ranking is not transitive (a ~ b and b ~ c does not give
    /// a ~ c), which `slice::sort_by` may reject at runtime. Those rankings use
    /// an insertion pass instead. Afterwards no adjacent pair compares `Greater`.
    pub fn sort(&self, items: &mut [&T]) {
        if self.tie.is_none() {
            items.sort_by(|a, b| self.compare(a, b));
            return;
        }
        for i in 1..items.len() {
            let mut j = i;
            while j > 0 && self.compare(items[j - 1], items[j]) == Ordering::Greater {
                items.swap(j - 1, j);
                j -= 1;
            }
        }
    }

    /// Sort `items` and keep at most `cap` of them.
    pub fn top<'p>(&self, mut items: Vec<&'p T>, cap: usize) -> Vec<&'p T> {
        self.sort(&mut items);
        items.truncate(cap);
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row {
        id: u32,
        form: f64,
        net: f64,
    }

    fn row(id: u32, form: f64, net: f64) -> Row {
        Row { id, form, net }
    }

    fn ids(rows: &[&Row]) -> Vec<u32> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn single_key_descending_is_stable() {
        let data = vec![row(1, 4.0, 0.0), row(2, 6.0, 0.0), row(3, 4.0, 0.0), row(4, 5.0, 0.0)];
        let ranking = Ranking::descending(|r: &Row| r.form);
        let sorted = ranking.top(data.iter().collect(), 10);
        assert_eq!(ids(&sorted), vec![2, 4, 1, 3]);
    }

    #[test]
    fn single_key_ascending() {
        let data = vec![row(1, 4.0, 0.0), row(2, 2.0, 0.0), row(3, 3.0, 0.0)];
        let ranking = Ranking::ascending(|r: &Row| r.form);
        let sorted = ranking.top(data.iter().collect(), 10);
        assert_eq!(ids(&sorted), vec![2, 3, 1]);
    }

    #[test]
    fn cap_truncates_after_sorting() {
        let data: Vec<Row> = (0..10).map(|i| row(i, f64::from(i), 0.0)).collect();
        let ranking = Ranking::descending(|r: &Row| r.form);
        let sorted = ranking.top(data.iter().collect(), 3);
        assert_eq!(ids(&sorted), vec![9, 8, 7]);
    }

    #[test]
    fn within_window_secondary_decides() {
        let ranking = Ranking::descending(|r: &Row| r.form).then_within(
            0.5,
            |r: &Row| r.net,
            SortOrder::Descending,
        );
        let a = row(1, 5.0, 100.0);
        let b = row(2, 5.4, -100.0);
        // 0.4 apart: net transfers decide
        assert_eq!(ranking.compare(&a, &b), Ordering::Less);

        let c = row(3, 6.0, -100.0);
        // 1.0 apart: form decides
        assert_eq!(ranking.compare(&a, &c), Ordering::Greater);
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let ranking = Ranking::descending(|r: &Row| r.form).then_within(
            0.5,
            |r: &Row| r.net,
            SortOrder::Descending,
        );
        let a = row(1, 5.0, 10.0);
        let b = row(2, 5.5, 0.0);
        // exactly 0.5 apart still falls through to the secondary key
        assert_eq!(ranking.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn windowed_sort_leaves_no_adjacent_inversions() {
        let data = vec![
            row(1, 3.2, 500.0),
            row(2, 7.0, -20.0),
            row(3, 3.5, 9000.0),
            row(4, 6.8, 3000.0),
            row(5, 4.0, 0.0),
            row(6, 3.9, 100.0),
            row(7, 5.1, 0.0),
        ];
        let ranking = Ranking::descending(|r: &Row| r.form).then_within(
            0.5,
            |r: &Row| r.net,
            SortOrder::Descending,
        );
        let mut items: Vec<&Row> = data.iter().collect();
        ranking.sort(&mut items);
        assert_eq!(items.len(), data.len());
        for pair in items.windows(2) {
            assert_ne!(ranking.compare(pair[0], pair[1]), Ordering::Greater);
        }
        // 7.0 and 6.8 are within the window; 6.8 has the stronger momentum
        assert_eq!(items[0].id, 4);
        assert_eq!(items[1].id, 2);
    }

    #[test]
    fn windowed_sort_keeps_full_ties_in_input_order() {
        let data = vec![row(1, 4.0, 0.0), row(2, 4.1, 0.0), row(3, 4.2, 0.0)];
        let ranking = Ranking::descending(|r: &Row| r.form).then_within(
            0.5,
            |r: &Row| r.net,
            SortOrder::Descending,
        );
        let sorted = ranking.top(data.iter().collect(), 10);
        assert_eq!(ids(&sorted), vec![1, 2, 3]);
    }

    #[test]
    fn empty_input() {
        let data: Vec<Row> = Vec::new();
        let ranking = Ranking::descending(|r: &Row| r.form).then_within(
            0.5,
            |r: &Row| r.net,
            SortOrder::Ascending,
        );
        assert!(ranking.top(data.iter().collect(), 5).is_empty());
    }
}
