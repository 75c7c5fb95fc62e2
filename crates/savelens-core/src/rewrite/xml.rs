use crate::error::{Error, Result};
use crate::model::XmlNode;

pub(crate) fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Splice a new value over the current one at a recorded byte position.
pub(crate) fn rewrite(
    text: &str,
    node: XmlNode,
    position: usize,
    current: &str,
    new_value: &str,
) -> Result<String> {
    let not_found = || Error::LocationNotFound(format!("XML {} at {}", node, position));
    let end = position.checked_add(current.len()).ok_or_else(not_found)?;
    if text.get(position..end) != Some(current) {
        return Err(not_found());
    }

    let mut out = String::with_capacity(text.len() + new_value.len());
    out.push_str(&text[..position]);
    out.push_str(&escape(new_value));
    out.push_str(&text[end..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_rewrite_preference() {
        let text = r#"<map><int name="gold" value="500" /></map>"#;
        let position = text.find("500").unwrap();
        let out = rewrite(text, XmlNode::Preference, position, "500", "9000").unwrap();
        assert_eq!(out, r#"<map><int name="gold" value="9000" /></map>"#);
    }

    #[test]
    fn test_rewrite_element_escapes() {
        let text = "<save><name>Hero</name></save>";
        let out = rewrite(text, XmlNode::Element, 12, "Hero", "R&D").unwrap();
        assert_eq!(out, "<save><name>R&amp;D</name></save>");
    }

    #[test]
    fn test_stale_position() {
        let text = "<save><gold>10</gold></save>";
        assert!(matches!(
            rewrite(text, XmlNode::Element, 3, "10", "20"),
            Err(Error::LocationNotFound(_))
        ));
        assert!(rewrite(text, XmlNode::Element, 500, "10", "20").is_err());
    }
}
