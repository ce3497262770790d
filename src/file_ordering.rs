//! Reading-order helpers.
//!
//! Chapters are discovered in natural file order: digit runs compare by value
//! and letters compare without regard to case, so `2 Rain.md` sorts before
//! `10 Snow.md`. Once chapters carry front/back matter roles the list is
//! regrouped with [`rearrange`], which keeps the relative order inside each
//! group.

use crate::book::Group;
use std::cmp::Ordering;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;

/// Compare two strings numeric-aware and case-insensitively.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let na = take_number(&mut a);
                let nb = take_number(&mut b);
                match compare_digits(&na, &nb) {
                    Ordering::Equal => {}
                    o => return o,
                }
            }
            (Some(ca), Some(cb)) => {
                match Iterator::cmp(ca.to_lowercase(), cb.to_lowercase()) {
                    Ordering::Equal => {
                        a.next();
                        b.next();
                    }
                    o => return o,
                }
            }
        }
    }
}

fn take_number(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
}

// digit runs of any length, without overflowing an integer type
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Compare paths naturally by file stem, breaking ties on the full path.
pub fn compare_paths(a: &Path, b: &Path) -> Ordering {
    natural_cmp(&stem(a), &stem(b))
        .then_with(|| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()))
}

pub fn sort_paths(files: &mut [PathBuf]) {
    files.sort_by(|a, b| compare_paths(a, b));
}

/// Regroup items into front matter, normal, back matter order.
///
/// The sort is stable, so rearranging an already rearranged list is a no-op.
pub fn rearrange<T, F>(items: &mut [T], group: F)
where
    F: Fn(&T) -> Group,
{
    items.sort_by_key(|item| group(item));
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn numbers_compare_by_value() {
        assert_eq!(natural_cmp("2 Rain", "10 Snow"), Ordering::Less);
        assert_eq!(natural_cmp("chapter 10", "chapter 9"), Ordering::Greater);
        assert_eq!(natural_cmp("007", "7"), Ordering::Equal);
    }

    #[test]
    fn letters_ignore_case() {
        assert_eq!(natural_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(natural_cmp("Intro", "intro"), Ordering::Equal);
    }

    #[test]
    fn can_sort_paths_by_stem() {
        let mut files = vec![
            PathBuf::from("book/10 End.md"),
            PathBuf::from("book/part/2 Middle.md"),
            PathBuf::from("book/1 Start.md"),
        ];
        sort_paths(&mut files);
        assert_eq!(
            files,
            vec![
                PathBuf::from("book/1 Start.md"),
                PathBuf::from("book/part/2 Middle.md"),
                PathBuf::from("book/10 End.md"),
            ]
        );
    }

    #[test]
    fn rearrange_groups_and_is_idempotent() {
        let mut items = vec![
            ("a", Group::Normal),
            ("b", Group::Back),
            ("c", Group::Front),
            ("d", Group::Normal),
            ("e", Group::Front),
        ];
        rearrange(&mut items, |(_, g)| *g);
        let names: Vec<_> = items.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["c", "e", "a", "d", "b"]);

        let once = items.clone();
        rearrange(&mut items, |(_, g)| *g);
        assert_eq!(items, once);
    }
}
