//! Flatten rendered wiki HTML into the line-oriented text the extractor reads.

use regex::Regex;
use std::sync::LazyLock;

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<li[^>]*>").expect("valid list item pattern"));

static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</?(?:p|div|ul|ol|li|tr|table|h[1-6]|dl|dd|dt)[^>]*>")
        .expect("valid block break pattern")
});

static TABLE_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?t[dh][^>]*>").expect("valid table cell pattern"));

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

static NUMERIC_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&#(?:x([0-9a-fA-F]+)|([0-9]+));").expect("valid numeric entity pattern")
});

/// Strip markup, turning list items into `* ` bullet lines.
///
/// Blank lines are dropped and runs of spaces collapsed, so a nested list reads as
/// consecutive bullet lines under its heading.
///
/// # Examples
///
/// ```
/// use questline_sync::flatten_html;
///
/// let html = "<ul><li>Completion of:<ul><li><a href=\"/w/Rune_Mysteries\">Rune Mysteries</a></li></ul></li></ul>";
/// assert_eq!(flatten_html(html), "* Completion of:\n* Rune Mysteries");
/// ```
pub fn flatten_html(html: &str) -> String {
    let text = LIST_ITEM.replace_all(html, "\n* ");
    let text = BLOCK_BREAK.replace_all(&text, "\n");
    let text = TABLE_CELL.replace_all(&text, " ");
    let text = TAG.replace_all(&text, "");
    let text = decode_entities(&text);

    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    let text = NUMERIC_ENTITY.replace_all(text, |caps: &regex::Captures<'_>| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse().ok(),
            (None, None) => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });

    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_are_decoded() {
        assert_eq!(
            flatten_html("<p>Pirate&#39;s Treasure &amp; Romeo &#x26; Juliet</p>"),
            "Pirate's Treasure & Romeo & Juliet"
        );
    }

    #[test]
    fn skill_tables_become_lines() {
        let html = "<table><tr><td>43</td><td><a>Prayer</a></td></tr></table><p>Level&nbsp;33 Agility</p>";
        assert_eq!(flatten_html(html), "43 Prayer\nLevel 33 Agility");
    }
}
