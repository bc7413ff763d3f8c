//! Built-in rule table for the assistant
//!
//! Rules are evaluated in declaration order; keep more specific intents
//! above broader ones that share a keyword.

use super::{Guard, PatchRule, Transform};

pub const BODY_OPEN: &str = "<body>";
pub const BODY_CLOSE: &str = "</body>";

pub const STYLESHEET_NAME: &str = "styles.css";

const BUTTON_HTML: &str = "  <button style=\"background: #4F46E5; color: white; padding: 8px 16px; border: none; border-radius: 4px; cursor: pointer;\">Click Me</button>\n";

const BUTTON_JS: &str = "
document.querySelector('button')?.addEventListener('click', () => {
  console.log('Button clicked!');
});
";

const HEADER_HTML: &str = "
  <header style=\"background: #f0f0f0; padding: 20px; margin-bottom: 20px;\">
    <nav>
      <a href=\"#\" style=\"margin-right: 10px;\">Home</a>
      <a href=\"#\" style=\"margin-right: 10px;\">About</a>
      <a href=\"#\">Contact</a>
    </nav>
  </header>";

const FOOTER_HTML: &str = "  <footer style=\"margin-top: 30px; padding-top: 20px; border-top: 1px solid #eaeaea; text-align: center;\">
    <p>&copy; 2023 My App. All rights reserved.</p>
  </footer>
";

const STYLESHEET_CSS: &str = "/* Base styles */
body {
  font-family: sans-serif;
  line-height: 1.6;
  max-width: 800px;
  margin: 0 auto;
  padding: 20px;
  color: #333;
}

h1, h2, h3 {
  color: #111;
}

button {
  background: #4F46E5;
  color: white;
  padding: 8px 16px;
  border: none;
  border-radius: 4px;
  cursor: pointer;
}
";

fn mentions_button(text: &str) -> bool {
    text.contains("button")
}

fn mentions_header(text: &str) -> bool {
    text.contains("header")
}

fn mentions_footer(text: &str) -> bool {
    text.contains("footer")
}

fn asks_for_stylesheet(text: &str) -> bool {
    text.contains("create") && text.contains("css")
}

pub fn builtin_rules() -> Vec<PatchRule> {
    vec![
        PatchRule {
            name: "html-button",
            intent: mentions_button,
            guard: Guard::ActiveExtension("html"),
            transform: Transform::InsertBefore {
                anchor: BODY_CLOSE,
                snippet: BUTTON_HTML,
            },
        },
        PatchRule {
            name: "js-button-handler",
            intent: mentions_button,
            guard: Guard::ActiveExtension("js"),
            transform: Transform::Append { snippet: BUTTON_JS },
        },
        PatchRule {
            name: "html-header",
            intent: mentions_header,
            guard: Guard::ActiveExtension("html"),
            transform: Transform::InsertAfter {
                anchor: BODY_OPEN,
                snippet: HEADER_HTML,
            },
        },
        PatchRule {
            name: "html-footer",
            intent: mentions_footer,
            guard: Guard::ActiveExtension("html"),
            transform: Transform::InsertBefore {
                anchor: BODY_CLOSE,
                snippet: FOOTER_HTML,
            },
        },
        PatchRule {
            name: "create-stylesheet",
            intent: asks_for_stylesheet,
            guard: Guard::NoFileNamed(STYLESHEET_NAME),
            transform: Transform::CreateFile {
                name: STYLESHEET_NAME,
                content: STYLESHEET_CSS,
            },
        },
    ]
}
