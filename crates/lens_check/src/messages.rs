//! User-facing message templates

use std::collections::HashMap;
use std::sync::LazyLock;

pub const PATH_BLANK: &str = "lens.path.blank";
pub const PROPERTY_NOT_EXIST: &str = "lens.path.property.not.exist";
pub const METHOD_NOT_EXIST: &str = "lens.path.method.not.exist";
pub const METHOD_AT_WRITE_POSITION: &str = "lens.path.method.write.position";

static BUNDLE: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        (PATH_BLANK, "Lens path is blank"),
        (PROPERTY_NOT_EXIST, "Property '{0}' does not exist in type '{1}'"),
        (METHOD_NOT_EXIST, "Method '{0}()' does not exist in type '{1}'"),
        (
            METHOD_AT_WRITE_POSITION,
            "Method '{0}()' cannot be used as the target of a write lens",
        ),
    ])
});

/// Render the template for `key`. Unknown keys render as the key itself.
pub fn message(key: &str, args: &[&dyn std::fmt::Display]) -> String {
    let Some(template) = BUNDLE.get(key) else {
        return key.to_string();
    };
    args.iter()
        .enumerate()
        .fold(template.to_string(), |text, (i, arg)| {
            text.replace(&format!("{{{}}}", i), &arg.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_placeholders() {
        assert_eq!(
            message(PROPERTY_NOT_EXIST, &[&"city", &"Address"]),
            "Property 'city' does not exist in type 'Address'"
        );
    }

    #[test]
    fn test_missing_args_leave_placeholders() {
        assert_eq!(
            message(METHOD_NOT_EXIST, &[&"size"]),
            "Method 'size()' does not exist in type '{1}'"
        );
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(message("no.such.key", &[]), "no.such.key");
    }
}
