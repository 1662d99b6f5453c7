//! Digit-aware string ordering

use std::cmp::Ordering;

/// Compare two strings so that embedded numbers sort by value
///
/// `"file2"` sorts before `"file10"`. Runs of ASCII digits are compared
/// numerically; equal values with different zero padding fall back to the
/// shorter run first. Everything else compares by character.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let a_end = digit_run_end(a, i);
            let b_end = digit_run_end(b, j);
            let ordering = compare_digit_runs(&a[i..a_end], &b[j..b_end]);
            if ordering != Ordering::Equal {
                return ordering;
            }
            i = a_end;
            j = b_end;
        } else {
            match a[i].cmp(&b[j]) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                other => return other,
            }
        }
    }

    (a.len() - i).cmp(&(b.len() - j))
}

fn digit_run_end(s: &[u8], start: usize) -> usize {
    s[start..]
        .iter()
        .position(|c| !c.is_ascii_digit())
        .map_or(s.len(), |offset| start + offset)
}

fn compare_digit_runs(a: &[u8], b: &[u8]) -> Ordering {
    let a_trimmed = trim_leading_zeros(a);
    let b_trimmed = trim_leading_zeros(b);
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        .then_with(|| a.len().cmp(&b.len()))
}

fn trim_leading_zeros(digits: &[u8]) -> &[u8] {
    let first = digits.iter().position(|&c| c != b'0').unwrap_or(digits.len());
    &digits[first..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numbers_sort_by_value() {
        let mut names = vec!["file10", "file2", "file1", "file"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["file", "file1", "file2", "file10"]);
    }

    #[test]
    fn test_mixed_paths() {
        let mut names = vec![
            "scripts/mission_12.lua",
            "scripts/mission_3.lua",
            "content/a",
            "scripts/mission_3b.lua",
        ];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(
            names,
            vec![
                "content/a",
                "scripts/mission_3.lua",
                "scripts/mission_3b.lua",
                "scripts/mission_12.lua",
            ]
        );
    }

    #[test]
    fn test_zero_padding() {
        assert_eq!(natural_cmp("a01", "a1"), Ordering::Greater);
        assert_eq!(natural_cmp("a001b", "a2"), Ordering::Less);
        assert_eq!(natural_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_very_long_numbers() {
        assert_eq!(
            natural_cmp("x99999999999999999999999", "x100000000000000000000000"),
            Ordering::Less
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ordering_is_antisymmetric(a in "[a-c0-9]{0,8}", b in "[a-c0-9]{0,8}") {
                prop_assert_eq!(natural_cmp(&a, &b), natural_cmp(&b, &a).reverse());
            }

            #[test]
            fn only_identical_strings_compare_equal(a in "[a0-2]{0,6}", b in "[a0-2]{0,6}") {
                prop_assert_eq!(natural_cmp(&a, &b) == Ordering::Equal, a == b);
            }

            #[test]
            fn ordering_is_transitive(
                a in "[a0-2]{0,5}",
                b in "[a0-2]{0,5}",
                c in "[a0-2]{0,5}"
            ) {
                let mut sorted = vec![a, b, c];
                sorted.sort_by(|x, y| natural_cmp(x, y));
                prop_assert_ne!(natural_cmp(&sorted[0], &sorted[1]), Ordering::Greater);
                prop_assert_ne!(natural_cmp(&sorted[1], &sorted[2]), Ordering::Greater);
                prop_assert_ne!(natural_cmp(&sorted[0], &sorted[2]), Ordering::Greater);
            }
        }
    }
}
