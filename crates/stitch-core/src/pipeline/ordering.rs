//! Filename and model-name ordering.
//!
//! File explorers list `img2` before `img10`; so does the natural comparator
//! here, on every platform. The lexical comparator is plain byte order.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use crate::config::SortOrder;

/// Total order over names.
pub trait StringComparator: Send + Sync {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Case-insensitive comparison where runs of digits compare by value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalComparator;

/// Byte-wise string comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalComparator;

impl StringComparator for NaturalComparator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        natural_cmp(a, b).then_with(|| a.cmp(b))
    }
}

impl StringComparator for LexicalComparator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

/// Comparator for the configured sort order.
pub fn comparator_for(order: SortOrder) -> Box<dyn StringComparator> {
    match order {
        SortOrder::Natural => Box::new(NaturalComparator),
        SortOrder::Lexical => Box::new(LexicalComparator),
    }
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ordering = compare_numbers(&take_digits(&mut left), &take_digits(&mut right));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                let ordering = l.to_lowercase().cmp(r.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

/// Compare digit runs by value without parsing, so long runs cannot overflow.
fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
