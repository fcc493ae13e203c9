//! Field sorting used by the device table.
//!
//! Both sorts are stable and always keep missing values at the tail, whatever
//! the direction.

use std::cmp::Ordering;

/// How two present strings compare.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StringOrder {
    /// Shorter strings first, then lexicographic.
    #[default]
    LengthFirst,
    /// Plain lexicographic order.
    Lexicographic,
}

impl StringOrder {
    fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            Self::Lexicographic => a.cmp(b),
            Self::LengthFirst => a
                .chars()
                .count()
                .cmp(&b.chars().count())
                .then_with(|| a.cmp(b)),
        }
    }
}

impl std::str::FromStr for StringOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lexicographic" => Ok(Self::Lexicographic),
            "length" => Ok(Self::LengthFirst),
            other => Err(format!("unknown string order: {other}")),
        }
    }
}

fn missing_last<V>(a: Option<V>, b: Option<V>, desc: bool, cmp: impl Fn(&V, &V) -> Ordering) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) if desc => cmp(&b, &a),
        (Some(a), Some(b)) => cmp(&a, &b),
    }
}

/// Sorts by a numeric field. Incomparable values (NaN) tie.
pub fn sort_by_numeric_field<T, N, F>(mut items: Vec<T>, getter: F, desc: bool) -> Vec<T>
where
    N: PartialOrd,
    F: Fn(&T) -> Option<N>,
{
    items.sort_by(|a, b| {
        missing_last(getter(a), getter(b), desc, |a, b| {
            a.partial_cmp(b).unwrap_or(Ordering::Equal)
        })
    });
    items
}

/// Sorts by a string field. Empty strings count as missing.
pub fn sort_by_string_field<T, F>(mut items: Vec<T>, getter: F, desc: bool, order: StringOrder) -> Vec<T>
where
    F: Fn(&T) -> Option<&str>,
{
    items.sort_by(|a, b| {
        let a = getter(a).filter(|s| !s.is_empty());
        let b = getter(b).filter(|s| !s.is_empty());
        missing_last(a, b, desc, |a, b| order.compare(a, b))
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(items: &[(u8, Option<f64>)]) -> Vec<u8> {
        items.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn numeric_ascending_keeps_missing_last() {
        let items = vec![(1, None), (2, Some(3.0)), (3, Some(-1.0)), (4, None), (5, Some(0.0))];
        let sorted = sort_by_numeric_field(items, |(_, v)| *v, false);

        assert_eq!(keys(&sorted), vec![3, 5, 2, 1, 4]);
    }

    #[test]
    fn numeric_descending_keeps_missing_last() {
        let items = vec![(1, None), (2, Some(3.0)), (3, Some(-1.0)), (4, Some(0.0))];
        let sorted = sort_by_numeric_field(items, |(_, v)| *v, true);

        assert_eq!(keys(&sorted), vec![2, 4, 3, 1]);
    }

    #[test]
    fn numeric_sort_is_monotonic_both_ways() {
        let items: Vec<(u8, Option<f64>)> = (0..40u8)
            .map(|i| (i, if i % 7 == 0 { None } else { Some(((i as f64) * 37.0) % 11.0 - 5.0) }))
            .collect();

        let asc = sort_by_numeric_field(items.clone(), |(_, v)| *v, false);
        let present: Vec<f64> = asc.iter().filter_map(|(_, v)| *v).collect();
        assert!(present.windows(2).all(|w| w[0] <= w[1]));
        assert!(asc.iter().skip(present.len()).all(|(_, v)| v.is_none()));

        let desc = sort_by_numeric_field(items, |(_, v)| *v, true);
        let present: Vec<f64> = desc.iter().filter_map(|(_, v)| *v).collect();
        assert!(present.windows(2).all(|w| w[0] >= w[1]));
        assert!(desc.iter().skip(present.len()).all(|(_, v)| v.is_none()));
    }

    #[test]
    fn numeric_sort_is_stable() {
        let items = vec![("a", Some(1)), ("b", Some(1)), ("c", None), ("d", Some(1)), ("e", None)];
        let sorted = sort_by_numeric_field(items, |(_, v)| *v, true);
        let names: Vec<_> = sorted.iter().map(|(n, _)| *n).collect();

        assert_eq!(names, vec!["a", "b", "d", "c", "e"]);
    }

    #[test]
    fn strings_lexicographic() {
        let items = vec!["pear", "", "apple", "fig"];
        let asc = sort_by_string_field(items.clone(), |s| Some(*s), false, StringOrder::Lexicographic);
        let desc = sort_by_string_field(items, |s| Some(*s), true, StringOrder::Lexicographic);

        assert_eq!(asc, vec!["apple", "fig", "pear", ""]);
        assert_eq!(desc, vec!["pear", "fig", "apple", ""]);
    }

    #[test]
    fn strings_length_first() {
        let items = vec!["pear", "apple", "", "fig", "kiwi"];
        let asc = sort_by_string_field(items.clone(), |s| Some(*s), false, StringOrder::LengthFirst);
        let desc = sort_by_string_field(items, |s| Some(*s), true, StringOrder::LengthFirst);

        assert_eq!(asc, vec!["fig", "kiwi", "pear", "apple", ""]);
        assert_eq!(desc, vec!["apple", "pear", "kiwi", "fig", ""]);
    }

    #[test]
    fn string_sort_is_stable() {
        let items = vec![(1, "b"), (2, "a"), (3, "b"), (4, ""), (5, "a"), (6, "")];
        let ids = |sorted: Vec<(u8, &str)>| sorted.into_iter().map(|(k, _)| k).collect::<Vec<_>>();
        for order in [StringOrder::Lexicographic, StringOrder::LengthFirst] {
            let asc = sort_by_string_field(items.clone(), |(_, s)| Some(*s), false, order);
            let desc = sort_by_string_field(items.clone(), |(_, s)| Some(*s), true, order);

            assert_eq!(ids(asc), vec![2, 5, 1, 3, 4, 6]);
            assert_eq!(ids(desc), vec![1, 3, 2, 5, 4, 6]);
        }
    }

    #[test]
    fn missing_strings_at_tail() {
        let items = vec![(1, None), (2, Some("b")), (3, Some("a"))];
        let sorted = sort_by_string_field(items, |(_, s)| *s, true, StringOrder::Lexicographic);
        let keys: Vec<_> = sorted.iter().map(|(k, _)| *k).collect();

        assert_eq!(keys, vec![2, 3, 1]);
    }

    #[test]
    fn string_order_from_str() {
        assert_eq!("length".parse(), Ok(StringOrder::LengthFirst));
        assert_eq!("lexicographic".parse(), Ok(StringOrder::Lexicographic));
        assert!("random".parse::<StringOrder>().is_err());
    }
}
