//! Symbol collision handling.

use crate::tree::{Key, Node};

/// Returns `symbol`, or the first of its successors absent from `registry`.
pub fn unique_symbol(registry: &Node, symbol: String) -> String {
    let mut symbol = symbol;
    while registry.contains_key(&Key::from(symbol.as_str())) {
        symbol = next_symbol(&symbol);
    }
    symbol
}

/// The successor of a symbol: `Foo` → `Foo2`, `Foo1` → `Foo2`, `Foo999` → `Foo1000`.
///
/// The trailing run of ASCII digits is incremented as a decimal number of any
/// width; a symbol without trailing digits gets a `2` appended.
pub fn next_symbol(symbol: &str) -> String {
    let prefix = symbol.trim_end_matches(|ch: char| ch.is_ascii_digit());
    let digits = symbol.get(prefix.len()..).unwrap_or_default();
    if digits.is_empty() {
        return format!("{symbol}2");
    }
    format!("{prefix}{}", increment(digits.trim_start_matches('0')))
}

/// Adds one to a decimal number written without leading zeros.
fn increment(digits: &str) -> String {
    let mut result = Vec::with_capacity(digits.len() + 1);
    let mut carry = true;
    for digit in digits.bytes().rev() {
        if carry && digit == b'9' {
            result.push(b'0');
        } else if carry {
            result.push(digit + 1);
            carry = false;
        } else {
            result.push(digit);
        }
    }
    if carry {
        result.push(b'1');
    }
    result.iter().rev().map(|&digit| char::from(digit)).collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case::no_suffix("Foo", "Foo2")]
    #[case::suffix_1("Foo1", "Foo2")]
    #[case::suffix_another_number("Foo999", "Foo1000")]
    #[case::inner_digits("V2Foo", "V2Foo2")]
    #[case::leading_zeros("Foo009", "Foo10")]
    #[case::only_zeros("Foo00", "Foo1")]
    #[case::only_digits("41", "42")]
    #[case::empty("", "2")]
    #[case::beyond_u64("Foo99999999999999999999999", "Foo100000000000000000000000")]
    fn should_compute_next_symbol(#[case] symbol: &str, #[case] expected: &str) {
        assert_eq!(next_symbol(symbol), expected);
    }

    #[test]
    fn should_keep_free_symbol() {
        let registry: Node = serde_json::from_value(json!({"Bar": {}})).expect("a mapping");

        assert_eq!(unique_symbol(&registry, "Foo".to_string()), "Foo");
    }

    #[test]
    fn should_skip_taken_symbols() {
        let registry: Node =
            serde_json::from_value(json!({"Foo": {}, "Foo2": {}, "Foo3": {}})).expect("a mapping");

        let symbol = unique_symbol(&registry, "Foo".to_string());

        assert_eq!(symbol, "Foo4");
        assert!(!registry.contains_key(&Key::from(symbol.as_str())));
    }
}
