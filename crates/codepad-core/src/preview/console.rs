//! Console capture for the preview context
//!
//! A small script is prepended to every rendered document. It wraps
//! `console.log`, `console.warn` and `console.error`, formats the arguments
//! and posts a [`ConsoleMessage`] to the host window. The host feeds posted
//! messages into a [`ConsoleChannel`], which only accepts messages from the
//! context that is currently open.

use codepad_types::{ConsoleMessage, LogEntry};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

const CONTEXT_PLACEHOLDER: &str = "__CODEPAD_CONTEXT__";

const SHIM_TEMPLATE: &str = r#"<script>
(function () {
  var context = __CODEPAD_CONTEXT__;
  function format(arg) {
    if (typeof arg === 'object' && arg !== null) {
      try {
        return JSON.stringify(arg);
      } catch (e) {
        return String(arg);
      }
    }
    return String(arg);
  }
  ['log', 'warn', 'error'].forEach(function (level) {
    var original = console[level];
    console[level] = function () {
      var message = Array.prototype.map.call(arguments, format).join(' ');
      try {
        window.parent.postMessage({ type: 'console.' + level, message: message, context: context }, '*');
      } catch (e) {}
      original.apply(console, arguments);
    };
  });
})();
</script>
"#;

/// Interception script bound to one render context
pub fn console_shim(context: &str) -> String {
    let literal = Value::String(context.to_string()).to_string();
    SHIM_TEMPLATE.replace(CONTEXT_PLACEHOLDER, &literal)
}

/// Prepend the console shim so it runs before any user code
pub fn instrument(document: &str, context: &str) -> String {
    let mut out = console_shim(context);
    out.push_str(document);
    out
}

/// Format console arguments the way the shim does.
///
/// Objects and arrays become their JSON text, everything else its display
/// string, joined by single spaces: `("x", 1)` formats as `x 1`.
pub fn format_console_args(args: &[Value]) -> String {
    args.iter().map(format_arg).collect::<Vec<_>>().join(" ")
}

fn format_arg(arg: &Value) -> String {
    match arg {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::Array(_) | Value::Object(_) => arg.to_string(),
    }
}

// Number-to-string as JavaScript does it: integral values without a
// fraction, exponent form outside [1e-6, 1e21)
fn format_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    let Some(f) = n.as_f64() else {
        return n.to_string();
    };

    let magnitude = f.abs();
    if f != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        // Rust prints `1e21` and `1e-7`; JavaScript signs positive exponents
        let text = format!("{:e}", f);
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => text,
        };
    }
    if f.fract() == 0.0 {
        format!("{:.0}", f)
    } else {
        f.to_string()
    }
}

#[derive(Default)]
struct ChannelState {
    context: Option<String>,
    entries: Vec<LogEntry>,
    /// Entries dropped by `clear`, so cursors keep absolute positions
    cleared: usize,
}

/// Host side of the console relay.
///
/// Cloning yields another handle to the same log; the relay callback and the
/// UI each hold one.
#[derive(Clone, Default)]
pub struct ConsoleChannel {
    state: Rc<RefCell<ChannelState>>,
}

impl ConsoleChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new render context, tearing down the previous subscription.
    /// Returns the token the shim must echo back.
    pub fn open_context(&self) -> String {
        let context = uuid::Uuid::new_v4().simple().to_string();
        self.state.borrow_mut().context = Some(context.clone());
        debug!(%context, "Opened console context");
        context
    }

    /// Stop accepting messages until the next `open_context`
    pub fn close_context(&self) {
        self.state.borrow_mut().context = None;
    }

    pub fn current_context(&self) -> Option<String> {
        self.state.borrow().context.clone()
    }

    /// Append a relayed message. Returns `false` when it was discarded
    /// because its context token is missing, stale or closed.
    pub fn deliver(&self, message: ConsoleMessage) -> bool {
        let mut state = self.state.borrow_mut();
        let accepted = match (&state.context, &message.context) {
            (Some(open), Some(sent)) => open == sent,
            _ => false,
        };
        if accepted {
            state.entries.push(LogEntry::new(message.level, message.message));
        }
        accepted
    }

    /// Parse and deliver a posted JSON payload
    pub fn deliver_json(&self, raw: &str) -> bool {
        match ConsoleMessage::from_json(raw) {
            Some(message) => self.deliver(message),
            None => false,
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.state.borrow().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop the host's copy of the log. Later messages still arrive.
    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.cleared += state.entries.len();
        state.entries.clear();
    }

    /// Lazy sequence over entries, starting with those not yet cleared
    pub fn cursor(&self) -> ConsoleCursor {
        ConsoleCursor {
            state: Rc::clone(&self.state),
            position: self.state.borrow().cleared,
        }
    }
}

/// Reads log entries as they arrive.
///
/// `next` returns `None` once it has caught up; calling it again after more
/// messages were delivered yields those.
pub struct ConsoleCursor {
    state: Rc<RefCell<ChannelState>>,
    position: usize,
}

impl Iterator for ConsoleCursor {
    type Item = LogEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let state = self.state.borrow();
        self.position = self.position.max(state.cleared);
        let entry = state.entries.get(self.position - state.cleared)?.clone();
        self.position += 1;
        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codepad_types::ConsoleLevel;
    use serde_json::json;

    fn posted(level: ConsoleLevel, args: &[Value], context: &str) -> ConsoleMessage {
        ConsoleMessage {
            level,
            message: format_console_args(args),
            context: Some(context.to_string()),
        }
    }

    #[test]
    fn test_format_primitives_and_composites() {
        assert_eq!(format_console_args(&[json!("x"), json!(1)]), "x 1");
        assert_eq!(format_console_args(&[json!(1.5), json!(true), json!(null)]), "1.5 true null");
        assert_eq!(format_console_args(&[json!(2.0)]), "2");
        assert_eq!(
            format_console_args(&[json!("obj"), json!({"a": 1}), json!([1, "b"])]),
            r#"obj {"a":1} [1,"b"]"#
        );
        assert_eq!(format_console_args(&[]), "");
    }

    #[test]
    fn test_format_numbers_in_exponent_range() {
        assert_eq!(format_console_args(&[json!(1e21)]), "1e+21");
        assert_eq!(format_console_args(&[json!(1.5e22)]), "1.5e+22");
        assert_eq!(format_console_args(&[json!(1e-7)]), "1e-7");
        assert_eq!(format_console_args(&[json!(-2.5e-8)]), "-2.5e-8");
        assert_eq!(format_console_args(&[json!(0.000001)]), "0.000001");
        assert_eq!(format_console_args(&[json!(1e20)]), "100000000000000000000");
        assert_eq!(format_console_args(&[json!(0.0)]), "0");
    }

    #[test]
    fn test_shim_embeds_context() {
        let shim = console_shim("abc123");
        assert!(shim.starts_with("<script>"));
        assert!(shim.contains(r#"var context = "abc123";"#));
        assert!(!shim.contains(CONTEXT_PLACEHOLDER));

        let doc = instrument("<!DOCTYPE html><html></html>", "abc123");
        assert!(doc.ends_with("<!DOCTYPE html><html></html>"));
    }

    #[test]
    fn test_log_call_yields_one_entry() {
        let channel = ConsoleChannel::new();
        let context = channel.open_context();

        assert!(channel.deliver(posted(ConsoleLevel::Log, &[json!("x"), json!(1)], &context)));

        let entries: Vec<LogEntry> = channel.cursor().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "x 1");
        assert_eq!(entries[0].level, ConsoleLevel::Log);
    }

    #[test]
    fn test_stale_context_is_discarded() {
        let channel = ConsoleChannel::new();
        let old = channel.open_context();
        let _new = channel.open_context();

        assert!(!channel.deliver(posted(ConsoleLevel::Error, &[json!("late")], &old)));

        channel.close_context();
        assert!(!channel.deliver_json(r#"{"type":"console.log","message":"after"}"#));
        assert!(channel.is_empty());
    }

    #[test]
    fn test_untagged_message_is_discarded_while_open() {
        let channel = ConsoleChannel::new();
        let context = channel.open_context();

        assert!(!channel.deliver_json(r#"{"type":"console.log","message":"from another frame"}"#));
        assert!(channel.is_empty());

        let tagged = format!(
            r#"{{"type":"console.log","message":"from the preview","context":"{}"}}"#,
            context
        );
        assert!(channel.deliver_json(&tagged));
        assert_eq!(channel.entries()[0].message, "from the preview");
    }

    #[test]
    fn test_cursor_resumes_and_survives_clear() {
        let channel = ConsoleChannel::new();
        let context = channel.open_context();
        let mut cursor = channel.cursor();

        channel.deliver(posted(ConsoleLevel::Log, &[json!("one")], &context));
        assert_eq!(cursor.next().unwrap().message, "one");
        assert!(cursor.next().is_none());

        channel.deliver(posted(ConsoleLevel::Warn, &[json!("two")], &context));
        channel.clear();
        assert!(channel.is_empty());
        assert!(cursor.next().is_none());

        channel.deliver(posted(ConsoleLevel::Log, &[json!("three")], &context));
        assert_eq!(cursor.next().unwrap().message, "three");
        assert_eq!(channel.len(), 1);
    }
}
