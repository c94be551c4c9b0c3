//! Named loggers with attached key/value context.

use std::fmt;

/// Key/value pairs attached to a single log call.
///
/// ```
/// use opkit::logging::Logger;
///
/// let log = Logger::named("mysql").with_values(&[("replicas", &3)]);
/// log.info("scaled", &[("from", &1)]);
/// ```
pub type KeyValues<'a> = &'a [(&'a str, &'a dyn fmt::Display)];

/// A cheap, cloneable logger that remembers its name path and context.
///
/// Deriving a logger with [`with_name`](Self::with_name) or
/// [`with_values`](Self::with_values) never changes the original, so each
/// step can carry its own context without touching its siblings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Logger {
    name: String,
    values: Vec<(String, String)>,
}

impl Logger {
    /// Create a root logger with no name and no values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a root logger with the given name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: Vec::new(),
        }
    }

    /// Derive a child logger; names are joined with `.`.
    pub fn with_name(&self, name: &str) -> Self {
        let name = if self.name.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.name, name)
        };
        Self {
            name,
            values: self.values.clone(),
        }
    }

    /// Derive a logger with extra key/value context.
    pub fn with_values(&self, kvs: KeyValues<'_>) -> Self {
        let mut values = self.values.clone();
        values.extend(kvs.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        Self {
            name: self.name.clone(),
            values,
        }
    }

    /// Full name path of this logger.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attached value; the most recently attached wins.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Emit an INFO event.
    pub fn info(&self, msg: &str, kvs: KeyValues<'_>) {
        let f = self.fields();
        tracing::info!(
            logger = %self.name,
            trace = f.trace,
            defer_exec = f.defer_exec,
            action = f.action,
            step = f.step,
            "{}",
            self.render(msg, kvs)
        );
    }

    /// Emit a DEBUG event.
    pub fn debug(&self, msg: &str, kvs: KeyValues<'_>) {
        let f = self.fields();
        tracing::debug!(
            logger = %self.name,
            trace = f.trace,
            defer_exec = f.defer_exec,
            action = f.action,
            step = f.step,
            "{}",
            self.render(msg, kvs)
        );
    }

    /// Emit an ERROR event carrying `err`.
    pub fn error(&self, err: &dyn fmt::Display, msg: &str, kvs: KeyValues<'_>) {
        let f = self.fields();
        tracing::error!(
            logger = %self.name,
            trace = f.trace,
            defer_exec = f.defer_exec,
            action = f.action,
            step = f.step,
            error = %err,
            "{}",
            self.render(msg, kvs)
        );
    }

    fn fields(&self) -> ExecutorFields<'_> {
        let field = |key: &str| self.value(key).map(tracing::field::display);
        ExecutorFields {
            trace: field("trace"),
            defer_exec: field("defer_exec"),
            action: field("action"),
            step: field("step"),
        }
    }

    /// Message plus every attached value that is not emitted as its own field.
    fn render(&self, msg: &str, kvs: KeyValues<'_>) -> String {
        let mut line = msg.to_string();
        for (k, v) in &self.values {
            if !EXECUTOR_FIELDS.contains(&k.as_str()) {
                line.push_str(&format!(" {}={}", k, v));
            }
        }
        for (k, v) in kvs {
            line.push_str(&format!(" {}={}", k, v));
        }
        line
    }
}

/// Context keys the executor attaches, emitted as event fields.
const EXECUTOR_FIELDS: [&str; 4] = ["trace", "defer_exec", "action", "step"];

type FieldValue<'a> = Option<tracing::field::DisplayValue<&'a str>>;

struct ExecutorFields<'a> {
    trace: FieldValue<'a>,
    defer_exec: FieldValue<'a>,
    action: FieldValue<'a>,
    step: FieldValue<'a>,
}
