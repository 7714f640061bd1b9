//! Stable ordering for alternatives.
//!
//! Case-insensitive key first, then the display name, so two alternatives
//! that differ only in case still order the same way on every run.

use core::cmp::Ordering;

use crate::entities::Alternative;

/// Total, run-independent order for values that must sort canonically.
pub trait StableOrd {
    fn stable_cmp(&self, other: &Self) -> Ordering;
}

/// Compare two alternatives by `(key, name)`.
#[inline]
pub fn cmp_alternatives(a: &Alternative, b: &Alternative) -> Ordering {
    a.stable_cmp(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn alt(s: &str) -> Alternative { s.parse().unwrap() }

    #[test]
    fn alternatives_sort_case_insensitively() {
        let mut v = vec![alt("charlie"), alt("Bravo"), alt("alpha")];
        v.sort_by(cmp_alternatives);
        let got: Vec<&str> = v.iter().map(|a| a.name()).collect();
        assert_eq!(got, vec!["alpha", "Bravo", "charlie"]);
    }

    #[test]
    fn name_breaks_ties_between_equal_keys() {
        assert_eq!(cmp_alternatives(&alt("A"), &alt("a")), Ordering::Less);
        assert_eq!(cmp_alternatives(&alt("b"), &alt("b")), Ordering::Equal);
    }
}
