//! # Style Codes
//!
//! Configured strings mark colors and formatting with `&` + code
//! (`&6Golden Rock`). The client expects the section sign instead
//! (`§6Golden Rock`). Translation happens when the text is written into a
//! stack, never when it is stored.

/// Marker character used in configuration files.
pub const ALT_CODE_CHAR: char = '&';

/// Marker character the client understands.
pub const STYLE_CHAR: char = '§';

/// Native code that clears color and formatting.
pub const RESET: &str = "§r";

/// Returns true if `code` is a valid color or format code.
#[inline]
#[must_use]
pub fn is_style_code(code: char) -> bool {
    matches!(code.to_ascii_lowercase(), '0'..='9' | 'a'..='f' | 'k'..='o' | 'r')
}

/// Replaces `alt` + code pairs with native style codes.
///
/// A marker not followed by a valid code is left alone, so `Fish & Chips`
/// survives untouched. Codes are normalized to lower case.
#[must_use]
pub fn translate_alternate_codes(alt: char, text: &str) -> String {
    let mut output = String::with_capacity(text.len() + 4);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&code) if c == alt && is_style_code(code) => {
                output.push(STYLE_CHAR);
                output.push(code.to_ascii_lowercase());
                chars.next();
            }
            _ => output.push(c),
        }
    }
    output
}

/// Renders a configured item name.
///
/// The leading reset drops the italic style clients apply to custom names;
/// the trailing reset keeps the name's style from leaking into later text.
#[must_use]
pub fn render_name(raw: &str) -> String {
    format!("{RESET}{}{RESET}", translate_alternate_codes(ALT_CODE_CHAR, raw))
}

/// Renders one configured lore line.
#[must_use]
pub fn render_lore_line(raw: &str) -> String {
    format!("{}{RESET}", translate_alternate_codes(ALT_CODE_CHAR, raw))
}

/// Removes native style codes, for logs and diagnostics.
#[must_use]
pub fn strip_codes(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == STYLE_CHAR && chars.peek().copied().is_some_and(is_style_code) {
            chars.next();
        } else {
            output.push(c);
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_codes() {
        assert_eq!(translate_alternate_codes('&', "&6Gold &LBold"), "§6Gold §lBold");
    }

    #[test]
    fn test_translate_leaves_plain_ampersand() {
        assert_eq!(translate_alternate_codes('&', "Fish & Chips &"), "Fish & Chips &");
        assert_eq!(translate_alternate_codes('&', "&zNope"), "&zNope");
    }

    #[test]
    fn test_render_appends_reset() {
        assert_eq!(render_name("&bSpecial Rock"), "§r§bSpecial Rock§r");
        assert_eq!(render_lore_line("&7Shiny"), "§7Shiny§r");
    }

    #[test]
    fn test_strip_codes() {
        assert_eq!(strip_codes(&render_name("&6Golden Rock")), "Golden Rock");
    }
}
