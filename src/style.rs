//! Background normalisation applied to the page before rendering

/// Forces an opaque white body so pages with a transparent or unset
/// background still render deterministically.
pub const WHITE_BACKGROUND_CSS: &str = "body { background: #fff }";

/// Build a script that inserts `<style type="text/css">css</style>` as the
/// first child of `<head>`.
///
/// The CSS travels as a JSON string literal, so quotes and line breaks in it
/// cannot terminate the script early.
///
/// ```
/// let js = webshot::style::background_script("body { background: #fff }");
/// assert!(js.contains("\"body { background: #fff }\""));
/// ```
pub fn background_script(css: &str) -> String {
    let literal = serde_json::Value::from(css).to_string();

    let template = r#"(function () {
    var head = document.head;
    if (!head) {
        head = document.createElement('head');
        document.documentElement.insertBefore(head, document.documentElement.firstChild);
    }
    var style = document.createElement('style');
    style.setAttribute('type', 'text/css');
    style.appendChild(document.createTextNode({{CSS_LITERAL}}));
    head.insertBefore(style, head.firstChild);
    return true;
})()"#;

    template.replace("{{CSS_LITERAL}}", &literal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_inserts_style_before_first_head_child() {
        let js = background_script(WHITE_BACKGROUND_CSS);
        assert!(js.contains("head.insertBefore(style, head.firstChild)"));
        assert!(js.contains("style.setAttribute('type', 'text/css')"));
        assert!(js.contains(r#"createTextNode("body { background: #fff }")"#));
    }

    #[test]
    fn css_is_escaped_as_a_string_literal() {
        let js = background_script("body { font-family: \"A\" }\n</style>");
        assert!(js.contains(r#""body { font-family: \"A\" }\n</style>""#));
        assert!(!js.contains("{{CSS_LITERAL}}"));
    }
}
