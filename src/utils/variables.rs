use crate::error::Result;

/// Replace `${name}` and `${name:default}` references in `text`.
///
/// `resolve` receives the variable name and the literal default, if any, and
/// returns the replacement. An unterminated reference is kept as-is.
///
/// # Arguments
///
/// * `text` - a wildcard pattern such as `animals/${kind}`
/// * `start`, `end` - the variable delimiters (`${` and `}` by default)
/// * `resolve` - produces the value of a referenced variable
pub fn substitute_variables<F>(text: &str, start: &str, end: &str, mut resolve: F) -> Result<String>
where
    F: FnMut(&str, Option<&str>) -> Result<String>,
{
    if start.is_empty() || end.is_empty() {
        return Ok(text.to_string());
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find(start) {
        let body_start = open + start.len();
        let Some(close) = rest[body_start..].find(end) else {
            break;
        };
        out.push_str(&rest[..open]);

        let body = &rest[body_start..body_start + close];
        let (name, default) = match body.split_once(':') {
            Some((name, default)) => (name.trim(), Some(default)),
            None => (body.trim(), None),
        };
        out.push_str(&resolve(name, default)?);

        rest = &rest[body_start + close + end.len()..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PromptError;

    fn lookup(name: &str, default: Option<&str>) -> Result<String> {
        match (name, default) {
            ("kind", _) => Ok("cats".to_string()),
            (_, Some(default)) => Ok(default.to_string()),
            (name, None) => Err(PromptError::UnknownVariable {
                name: name.to_string(),
            }),
        }
    }

    #[test]
    fn test_substitutes_references() {
        let out = substitute_variables("animals/${kind}/${ size :big}", "${", "}", lookup).unwrap();
        assert_eq!(out, "animals/cats/big");
    }

    #[test]
    fn test_plain_text_and_unterminated_reference() {
        assert_eq!(substitute_variables("colors", "${", "}", lookup).unwrap(), "colors");
        assert_eq!(substitute_variables("a/${kind", "${", "}", lookup).unwrap(), "a/${kind");
    }

    #[test]
    fn test_unknown_variable_propagates() {
        let err = substitute_variables("${nope}", "${", "}", lookup).unwrap_err();
        assert!(matches!(err, PromptError::UnknownVariable { ref name } if name == "nope"));
    }
}
