use dioxus::prelude::VirtualDom;

/// Render a VirtualDom into a complete HTML document string.
pub fn render_to_html(dom: &VirtualDom) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\">{}</html>",
        dioxus::ssr::render(dom)
    )
}

/// Serialize data for inline `<script>` use. `</` is escaped so embedded
/// strings cannot close the script element.
pub fn script_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_json_escapes_closing_tags() {
        let out = script_json(&serde_json::json!({"name": "</script><b>"}));
        assert!(!out.contains("</script>"));
        assert!(out.contains("<\\/script>"));
    }
}
