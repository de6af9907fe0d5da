//! Jaundice rate scoring.
//!
//! The jaundice rate of a text is the percentage of its normalized words that
//! appear in the charged vocabulary, reported with two decimal places.

use crate::charged::ChargedWordSet;

/// Compute the jaundice rate of `words` against `charged`.
///
/// # Returns
///
/// A value in `[0, 100]` rounded to two decimal places. An empty word list
/// scores exactly `0.0`.
///
/// # Examples
///
/// ```ignore
/// let charged = ChargedWordSet::from_words(["аутсайдер", "банкротство"]);
/// let words = ["все", "аутсайдер", "побег"].map(String::from);
/// assert_eq!(calculate_jaundice_rate(&words, &charged), 33.33);
/// ```
pub fn calculate_jaundice_rate<S: AsRef<str>>(words: &[S], charged: &ChargedWordSet) -> f64 {
    if words.is_empty() {
        return 0.0;
    }

    let found = words
        .iter()
        .filter(|word| charged.contains(word.as_ref()))
        .count();
    let score = found as f64 / words.len() as f64 * 100.0;
    round_to_hundredths(score)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charged(words: &[&str]) -> ChargedWordSet {
        ChargedWordSet::from_words(words.iter().copied())
    }

    #[test]
    fn test_empty_words_score_zero() {
        let empty: [&str; 0] = [];
        assert_eq!(calculate_jaundice_rate(&empty, &charged(&[])), 0.0);
        assert_eq!(calculate_jaundice_rate(&empty, &charged(&["ад", "авария"])), 0.0);
    }

    #[test]
    fn test_reference_example() {
        let score = calculate_jaundice_rate(
            &["все", "аутсайдер", "побег"],
            &charged(&["аутсайдер", "банкротство"]),
        );
        assert_eq!(score, 33.33);
    }

    #[test]
    fn test_score_bounds() {
        let set = charged(&["авария"]);
        assert_eq!(calculate_jaundice_rate(&["авария", "авария"], &set), 100.0);
        assert_eq!(calculate_jaundice_rate(&["мир", "дом"], &set), 0.0);
        let mixed = calculate_jaundice_rate(&["авария", "мир", "дом"], &set);
        assert!((0.0..=100.0).contains(&mixed));
    }

    #[test]
    fn test_permutation_invariance() {
        let set = charged(&["ад", "авиакатастрофа", "авария"]);
        let reordered_set = charged(&["авария", "ад", "авиакатастрофа"]);
        let a = calculate_jaundice_rate(&["авария", "город", "ночь", "ад", "дом", "лес", "река"], &set);
        let b = calculate_jaundice_rate(&["река", "ад", "лес", "город", "дом", "авария", "ночь"], &reordered_set);
        assert_eq!(a, b);
    }

    #[test]
    fn test_two_decimal_rounding() {
        let set = charged(&["ад"]);
        let words = ["ад", "мир", "дом", "лес", "сад", "кот", "пёс"];
        let score = calculate_jaundice_rate(&words, &set);
        assert_eq!(score, 14.29);
        assert_eq!(score, (score * 100.0).round() / 100.0);
    }
}
