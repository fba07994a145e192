/// Collapse every run of whitespace to a single space and trim the ends.
///
/// ```
/// use wildprompt::utils::squash_whitespace;
///
/// assert_eq!(squash_whitespace("  a \n\t b  "), "a b");
/// ```
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
