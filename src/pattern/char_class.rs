//! Single-cell character tests shared by literals and classes.

/// Compare a grid cell with a pattern character, optionally ignoring case.
pub fn chars_match(cell: char, target: char, insensitive: bool) -> bool {
    cell == target || (insensitive && cell.to_uppercase().eq(target.to_uppercase()))
}

/// Test whether `cell` is a member of the class `chars`, honouring negation.
pub fn class_matches(chars: &str, negate: bool, cell: char, insensitive: bool) -> bool {
    let member = chars.chars().any(|c| chars_match(cell, c, insensitive));
    member != negate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert!(chars_match('a', 'a', false));
        assert!(!chars_match('a', 'A', false));
    }

    #[test]
    fn case_insensitive_match() {
        assert!(chars_match('a', 'A', true));
        assert!(chars_match('ß', 'ß', true));
        assert!(!chars_match('a', 'b', true));
    }

    #[test]
    fn class_membership() {
        assert!(class_matches("xyz", false, 'y', false));
        assert!(!class_matches("xyz", false, 'Y', false));
        assert!(class_matches("xyz", false, 'Y', true));
    }

    #[test]
    fn negated_class() {
        assert!(class_matches("Qq", true, 'a', false));
        assert!(!class_matches("Qq", true, 'q', false));
        assert!(!class_matches("Q", true, 'q', true));
    }

    #[test]
    fn empty_class() {
        assert!(!class_matches("", false, 'a', false));
        assert!(class_matches("", true, 'a', false));
    }
}
