//! `{name}` placeholder substitution.

use std::borrow::Cow;

/// Replace `{name}` tokens in `template` with the matching value in `args`.
///
/// Tokens with no matching argument are left as written. Substitution is a
/// single pass: braces inside substituted values are never expanded.
///
/// ```
/// use kiosk_i18n::interpolate;
///
/// let text = interpolate("Hello, {name}! {unknown}", &[("name", "Ada")]);
/// assert_eq!(text, "Hello, Ada! {unknown}");
/// ```
pub fn interpolate<'a>(template: &'a str, args: &[(&str, &str)]) -> Cow<'a, str> {
    if !template.contains('{') {
        return Cow::Borrowed(template);
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            // Unterminated token: keep the remainder verbatim.
            out.push_str(&rest[open..]);
            return Cow::Owned(out);
        };
        let name = &after[..close];
        match args.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Cow::Owned(out)
}
