//! Multiple-choice letter derivation

use crate::{Error, Result};

/// The fixed choice alphabet, assigned in order.
pub const ANSWER_CHOICES: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

/// Derive the choice letter for an answer.
///
/// An answer that already has a choice keeps it unchanged. Otherwise the
/// first letter of the alphabet not used by a sibling answer of the same
/// question is assigned. When all eight letters are taken the derivation
/// fails with [`Error::ChoicesExhausted`].
pub fn derive_choice(
    current: Option<&str>,
    used: &[String],
    question_id: i64,
) -> Result<String> {
    if let Some(choice) = current {
        return Ok(choice.to_string());
    }
    ANSWER_CHOICES
        .iter()
        .find(|letter| !used.iter().any(|u| u == **letter))
        .map(|letter| letter.to_string())
        .ok_or(Error::ChoicesExhausted(question_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(letters: &[&str]) -> Vec<String> {
        letters.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn assigns_letters_in_alphabet_order() {
        let mut used = Vec::new();
        for expected in ["A", "B", "C", "D", "E", "F", "G", "H"] {
            let choice = derive_choice(None, &used, 1).unwrap();
            assert_eq!(choice, expected);
            used.push(choice);
        }
    }

    #[test]
    fn skips_letters_already_taken() {
        let used = strings(&["A", "C"]);
        assert_eq!(derive_choice(None, &used, 1).unwrap(), "B");
        let used = strings(&["A", "B", "C"]);
        assert_eq!(derive_choice(None, &used, 1).unwrap(), "D");
    }

    #[test]
    fn existing_choice_is_never_recomputed() {
        let used = strings(&["A", "B", "C"]);
        assert_eq!(derive_choice(Some("B"), &used, 1).unwrap(), "B");
    }

    #[test]
    fn ninth_answer_fails_explicitly() {
        let used = strings(&["A", "B", "C", "D", "E", "F", "G", "H"]);
        match derive_choice(None, &used, 42) {
            Err(Error::ChoicesExhausted(question_id)) => assert_eq!(question_id, 42),
            other => panic!("expected ChoicesExhausted, got {:?}", other),
        }
    }
}
