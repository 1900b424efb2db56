//! Bootstrap page served at `/`.

use std::time::Duration;

/// Delay before the page reconnects after the control channel closes.
pub const RECONNECT_DELAY: Duration = Duration::from_millis(3000);

/// Delay between page load and the first connection attempt.
pub const INITIAL_CONNECT_DELAY: Duration = Duration::from_millis(2000);

const TEMPLATE: &str = include_str!("../assets/index.html");

/// Render the page for a control channel on `control_port`, showing
/// `initial_image` until the first frame update arrives.
pub fn bootstrap_page(control_port: u16, initial_image: &str) -> String {
    // A JSON string is a valid JS string literal; `</` must not close the script.
    let image = serde_json::Value::from(initial_image)
        .to_string()
        .replace("</", "<\\/");

    TEMPLATE
        .replace("__CONTROL_PORT__", &control_port.to_string())
        .replace("__RECONNECT_DELAY_MS__", &RECONNECT_DELAY.as_millis().to_string())
        .replace(
            "__INITIAL_CONNECT_DELAY_MS__",
            &INITIAL_CONNECT_DELAY.as_millis().to_string(),
        )
        .replace("__INITIAL_IMAGE__", &image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_in_port_and_delays() {
        let page = bootstrap_page(8765, "demo_images/gta_drive/0000.png");
        assert!(page.contains("const CONTROL_PORT = 8765;"));
        assert!(page.contains("const RECONNECT_DELAY_MS = 3000;"));
        assert!(page.contains("const INITIAL_CONNECT_DELAY_MS = 2000;"));
        assert!(page.contains(r#"const INITIAL_IMAGE = "demo_images/gta_drive/0000.png";"#));
        assert!(!page.contains("__"));
    }

    #[test]
    fn initial_image_is_escaped() {
        let page = bootstrap_page(1, r#"a"</script>.png"#);
        assert!(page.contains(r#"const INITIAL_IMAGE = "a\"<\/script>.png";"#));
    }

    #[test]
    fn controls_are_gated_and_clickable() {
        let page = bootstrap_page(8765, "x.png");

        // Start gate before any action leaves the page.
        assert!(page.contains(r#"id="start""#));
        assert!(page.contains("if (!active || !socket"));

        // Mouse controls: press sends the action, release sends "none".
        assert!(page.contains(r#"addEventListener("mousedown""#));
        assert!(page.contains(r#"addEventListener("mouseup", release)"#));
        assert!(page.contains(r#"send("none")"#));

        // Connection state shown apart from the status line.
        assert!(page.contains(r#"id="connection""#));
        assert!(page.contains("socket.onerror"));
        assert!(page.contains(r#"connectionEl.textContent = "Error""#));

        // Cache-busting image reload.
        assert!(page.contains("?t=${Date.now()}"));
    }
}
