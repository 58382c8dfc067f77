//! Identifier rules for aliases and label derivation

/// Validate a content-type alias, field name or block alias.
///
/// Aliases become identifiers in the CMS and in delivery API payloads, so
/// they must start with an ASCII letter and continue with ASCII letters,
/// digits or underscores.
pub fn validate_alias(alias: &str) -> Result<(), String> {
    if alias.is_empty() {
        return Err("cannot be empty".to_string());
    }
    if !alias.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err("must start with a letter".to_string());
    }
    if let Some(bad) = alias
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        return Err(format!("contains '{}'; only letters, digits and '_' are allowed", bad));
    }
    Ok(())
}

/// Turn an identifier into words: `pageTitle` becomes `Page Title`.
///
/// Splits on `_`, `-`, spaces and lower-to-upper case changes.
pub fn title_case(identifier: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in identifier.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turn display words into an alias: `Services Section` becomes `servicesSection`.
///
/// Characters that are not ASCII letters or digits separate words.
pub fn camel_case(words: &str) -> String {
    let mut alias = String::new();
    for (i, word) in words
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        let lower = word.to_ascii_lowercase();
        if i == 0 {
            alias.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                alias.push(first.to_ascii_uppercase());
                alias.extend(chars);
            }
        }
    }
    alias
}
