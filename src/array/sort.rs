//! Sorting helpers

use crate::datetime::parse_date_time;
use crate::error::{HelperError, Result};
use crate::types::{scalar_to_string, Row};

/// Sort a slice with a first-element-pivot quicksort
///
/// Elements smaller than the pivot go left, everything else (pivot duplicates
/// included) goes right. Returns a new vector; the input is untouched.
///
/// # Example
///
/// ```rust
/// use helperbox::array::quick_sort;
///
/// assert_eq!(quick_sort(&[3, 1, 2, 1]), vec![1, 1, 2, 3]);
/// ```
pub fn quick_sort<T: PartialOrd + Clone>(items: &[T]) -> Vec<T> {
    let Some((pivot, rest)) = items.split_first() else {
        return Vec::new();
    };

    let (left, right): (Vec<T>, Vec<T>) = rest.iter().cloned().partition(|item| item < pivot);

    let mut sorted = quick_sort(&left);
    sorted.push(pivot.clone());
    sorted.extend(quick_sort(&right));
    sorted
}

/// Sort rows chronologically by the date stored under `field`
///
/// Dates are compared at one-second resolution and rows with equal timestamps
/// keep their relative order. A descending sort is the ascending result
/// reversed, so ties come out reversed too.
///
/// # Errors
///
/// [`HelperError::MissingField`] when a row lacks `field`,
/// [`HelperError::InvalidDate`] when a value cannot be parsed.
pub fn sort_by_date(rows: Vec<Row>, field: &str, ascending: bool) -> Result<Vec<Row>> {
    let mut keyed = rows
        .into_iter()
        .map(|row| {
            let raw = row
                .get(field)
                .ok_or_else(|| HelperError::MissingField(field.to_string()))?;
            let timestamp = parse_date_time(&scalar_to_string(raw))?
                .and_utc()
                .timestamp();
            Ok((timestamp, row))
        })
        .collect::<Result<Vec<_>>>()?;

    keyed.sort_by_key(|(timestamp, _)| *timestamp);

    let mut sorted: Vec<Row> = keyed.into_iter().map(|(_, row)| row).collect();
    if !ascending {
        sorted.reverse();
    }
    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(title: &str, date: &str) -> Row {
        json!({"title": title, "date": date}).as_object().cloned().unwrap()
    }

    fn titles(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r["title"].as_str().unwrap()).collect()
    }

    #[test]
    fn test_quick_sort() {
        assert_eq!(
            quick_sort(&[43, 21, 2, 1, 9, 24, 2, 99, 23, 8, 7, 114, 92, 5]),
            vec![1, 2, 2, 5, 7, 8, 9, 21, 23, 24, 43, 92, 99, 114]
        );
        assert!(quick_sort::<i32>(&[]).is_empty());
        assert_eq!(quick_sort(&["b", "a", "c"]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_quick_sort_properties() {
        let input = vec![5, -1, 5, 0, 3, 3, 12, -7, 0];
        let once = quick_sort(&input);
        assert_eq!(quick_sort(&once), once);
        assert!(once.windows(2).all(|w| w[0] <= w[1]));

        let mut expected = input.clone();
        expected.sort_unstable();
        assert_eq!(once, expected);
    }

    #[test]
    fn test_sort_by_date() {
        let rows = vec![
            row("Title 2", "1970-01-01"),
            row("Title 1", "1969-12-31"),
            row("Title 3", "1970-01-02"),
        ];

        let asc = sort_by_date(rows.clone(), "date", true).unwrap();
        assert_eq!(titles(&asc), vec!["Title 1", "Title 2", "Title 3"]);

        let desc = sort_by_date(rows, "date", false).unwrap();
        assert_eq!(titles(&desc), vec!["Title 3", "Title 2", "Title 1"]);
    }

    #[test]
    fn test_sort_by_date_ties() {
        let rows = vec![
            row("a", "2020-05-01"),
            row("b", "2020-01-01"),
            row("c", "2020-05-01 00:00:00"),
        ];

        let asc = sort_by_date(rows.clone(), "date", true).unwrap();
        assert_eq!(titles(&asc), vec!["b", "a", "c"]);

        let desc = sort_by_date(rows, "date", false).unwrap();
        assert_eq!(titles(&desc), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_sort_by_date_errors() {
        let rows = vec![row("a", "2020-05-01"), row("b", "not a date")];
        assert!(matches!(
            sort_by_date(rows, "date", true),
            Err(HelperError::InvalidDate(_))
        ));

        let rows = vec![row("a", "2020-05-01")];
        assert!(matches!(
            sort_by_date(rows, "published", true),
            Err(HelperError::MissingField(ref f)) if f == "published"
        ));
    }
}
