/// Lowercase, hyphen separated form of `text` for use in URLs. Letters and
/// digits are kept (including non-ASCII ones), every other run of characters
/// becomes a single hyphen.
pub(crate) fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else if c == '\'' || c == '\u{2019}' {
            // apostrophes vanish: "grandma's" -> "grandmas"
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_titles() {
        assert_eq!(slugify("Bolo de Cenoura"), "bolo-de-cenoura");
        assert_eq!(slugify("  Pão -- de   Queijo! "), "pão-de-queijo");
        assert_eq!(slugify("Grandma's Pie"), "grandmas-pie");
        assert_eq!(slugify("***"), "");
    }
}
