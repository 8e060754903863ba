//! Identifier case conversion.
//!
//! Word boundaries are placed between a lowercase letter or digit and a
//! following uppercase letter, at the end of an uppercase run that is followed
//! by a lowercase letter (`HTTPResponse` → `http` + `response`), and between
//! letters and digits in either direction.

/// `TextItem` → `text-item`. Used to derive default discriminator names.
pub fn to_kebab_case(ident: &str) -> String {
    join_words(ident, '-')
}

/// `ItemValue` → `item_value`. Used to derive generated file names.
pub fn to_snake_case(ident: &str) -> String {
    join_words(ident, '_')
}

fn join_words(ident: &str, sep: char) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && is_boundary(chars[i - 1], c, chars.get(i + 1).copied()) {
            out.push(sep);
        }
        out.extend(c.to_lowercase());
    }
    out
}

fn is_boundary(prev: char, cur: char, next: Option<char>) -> bool {
    if cur.is_uppercase() {
        if prev.is_lowercase() || prev.is_numeric() {
            return true;
        }
        // last capital of an acronym starts the next word
        return prev.is_uppercase() && next.is_some_and(char::is_lowercase);
    }
    if cur.is_numeric() {
        return prev.is_alphabetic();
    }
    cur.is_alphabetic() && prev.is_numeric()
}
