//! Human-readable field labels derived from schema keys

/// Turn a camelCase / snake_case key into a sentence-case label.
///
/// `orderId` → `Order ID`, `someUnionType` → `Some union type`,
/// `HTTPStatus` → `HTTP status`. Acronyms keep their case unless the whole
/// key is uppercase.
pub fn humanize(key: &str) -> String {
    let shouting = !key.chars().any(char::is_lowercase);
    let words: Vec<String> = split_words(key)
        .into_iter()
        .map(|word| {
            let lower = word.to_lowercase();
            if lower == "id" {
                "ID".to_string()
            } else if !shouting && is_acronym(&word) {
                word
            } else {
                lower
            }
        })
        .collect();

    let mut label = words.join(" ");
    if let Some(first) = label.chars().next() {
        let upper: String = first.to_uppercase().collect();
        label.replace_range(..first.len_utf8(), &upper);
    }
    label
}

/// Label for a schema key: the last segment that is not a member marker
pub fn label_for_key(key: &str) -> String {
    let segment = key
        .rsplit('.')
        .find(|segment| *segment != "$" && segment.parse::<usize>().is_err())
        .unwrap_or(key);
    humanize(segment)
}

/// Two or more letters, all uppercase
fn is_acronym(word: &str) -> bool {
    word.chars().filter(|c| c.is_alphabetic()).count() > 1
        && !word.chars().any(char::is_lowercase)
}

fn split_words(key: &str) -> Vec<String> {
    let chars: Vec<char> = key.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
