use crate::record::Keyed;
use std::cmp::Ordering;
use std::iter::{FusedIterator, Peekable};

/// Two-way merge of key-ordered sequences.
///
/// On equal keys the item from `newer` is yielded and the one from `older` is
/// dropped. If either side is empty the other passes through unchanged.
pub struct MergeIterator<A: Iterator, B: Iterator> {
    newer: Peekable<A>,
    older: Peekable<B>,
}

impl<A, B> MergeIterator<A, B>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
    A::Item: Keyed,
{
    pub fn new(newer: A, older: B) -> Self {
        MergeIterator {
            newer: newer.peekable(),
            older: older.peekable(),
        }
    }
}

impl<A, B> Iterator for MergeIterator<A, B>
where
    A: Iterator,
    B: Iterator<Item = A::Item>,
    A::Item: Keyed,
{
    type Item = A::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let order = match (self.newer.peek(), self.older.peek()) {
            (Some(n), Some(o)) => n.key().cmp(o.key()),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => return None,
        };

        match order {
            Ordering::Less => self.newer.next(),
            Ordering::Greater => self.older.next(),
            Ordering::Equal => {
                self.older.next();
                self.newer.next()
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (newer_lo, newer_hi) = self.newer.size_hint();
        let (older_lo, older_hi) = self.older.size_hint();
        let hi = match (newer_hi, older_hi) {
            (Some(a), Some(b)) => a.checked_add(b),
            _ => None,
        };
        (newer_lo.max(older_lo), hi)
    }
}

impl<A, B> FusedIterator for MergeIterator<A, B>
where
    A: FusedIterator,
    B: FusedIterator<Item = A::Item>,
    A::Item: Keyed,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn keys<I: Iterator<Item = Record<i32, &'static str>>>(iter: I) -> Vec<(i32, Option<&'static str>)> {
        iter.map(|r| {
            let value = r.value().copied();
            (*r.key(), value)
        })
        .collect()
    }

    #[test]
    fn test_merge_interleaves_in_key_order() {
        let newer = vec![Record::new(1, "n1"), Record::new(4, "n4")];
        let older = vec![Record::new(2, "o2"), Record::new(3, "o3"), Record::new(5, "o5")];

        let merged = keys(MergeIterator::new(newer.into_iter(), older.into_iter()));
        assert_eq!(
            merged,
            vec![
                (1, Some("n1")),
                (2, Some("o2")),
                (3, Some("o3")),
                (4, Some("n4")),
                (5, Some("o5")),
            ]
        );
    }

    #[test]
    fn test_newer_wins_on_collision() {
        let newer = vec![Record::new(1, "new"), Record::tombstone(2)];
        let older = vec![Record::new(1, "old"), Record::new(2, "old")];

        let merged = keys(MergeIterator::new(newer.into_iter(), older.into_iter()));
        assert_eq!(merged, vec![(1, Some("new")), (2, None)]);
    }

    #[test]
    fn test_one_side_empty() {
        let only = vec![Record::new(1, "a"), Record::new(2, "b")];

        let merged = keys(MergeIterator::new(Vec::new().into_iter(), only.clone().into_iter()));
        assert_eq!(merged, vec![(1, Some("a")), (2, Some("b"))]);

        let merged = keys(MergeIterator::new(only.into_iter(), Vec::new().into_iter()));
        assert_eq!(merged, vec![(1, Some("a")), (2, Some("b"))]);

        let merged = keys(MergeIterator::new(Vec::new().into_iter(), Vec::new().into_iter()));
        assert!(merged.is_empty());
    }

    #[test]
    fn test_merges_borrowed_records() {
        let newer = vec![Record::new(2, 20)];
        let older = vec![Record::new(1, 1), Record::new(2, 2)];

        let merged: Vec<_> = MergeIterator::new(newer.iter(), older.iter())
            .map(|r| (*r.key(), r.value().copied()))
            .collect();
        assert_eq!(merged, vec![(1, Some(1)), (2, Some(20))]);
    }
}
