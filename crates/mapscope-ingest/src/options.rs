//! Parser options and debug-gated logging.

use std::fmt;

/// How triple-map identifiers are recognized in an RML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierStrategy {
    /// `<Id>` blocks; `prefix:Id` blocks only when no bracketed block exists.
    #[default]
    FirstMatch,
    /// Both identifier forms in one pass, in document order.
    Merged,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Emit parse diagnostics at DEBUG level.
    pub debug: bool,
    pub identifier_strategy: IdentifierStrategy,
}

impl ParseOptions {
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_identifier_strategy(mut self, strategy: IdentifierStrategy) -> Self {
        self.identifier_strategy = strategy;
        self
    }

    pub fn log(&self, component: &'static str) -> DebugLog {
        DebugLog::new(self.debug, component)
    }
}

/// A component's diagnostic channel. Messages go to `tracing` only when the
/// owning options turned debugging on.
#[derive(Debug, Clone, Copy)]
pub struct DebugLog {
    enabled: bool,
    component: &'static str,
}

impl DebugLog {
    pub fn new(enabled: bool, component: &'static str) -> Self {
        Self { enabled, component }
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        if self.enabled {
            tracing::debug!(component = self.component, "{}", args);
        }
    }
}
