//! Routing-configuration diagnostics.

use std::fmt;

use owo_colors::OwoColorize;

use crate::core::RouteError;

/// A single configuration diagnostic
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    /// Config field path (e.g., "collections./blog/.permalink")
    pub field: String,
    /// Error description
    pub message: String,
    /// Fix hint (optional)
    pub hint: Option<String>,
}

impl ConfigDiagnostic {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Field path in cyan brackets
        writeln!(
            f,
            "{}{}{}",
            "[".dimmed(),
            self.field.cyan(),
            "]".dimmed()
        )?;
        // Error message with red bullet
        write!(f, "{} {}", "→".red(), self.message)?;
        // Hint in yellow
        if let Some(hint) = &self.hint {
            write!(f, "\n  {} {}", "hint:".yellow(), hint)?;
        }
        Ok(())
    }
}

/// Accumulated validation diagnostics for a RoutesConfig
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigDiagnostic::new(field, message));
    }

    /// Add an error with a hint.
    pub fn error_with_hint(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.errors
            .push(ConfigDiagnostic::new(field, message).with_hint(hint));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    /// Convert to Result (returns Err if there are errors).
    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\n", "routing config validation failed:".red().bold())?;
        for (i, err) in self.errors.iter().enumerate() {
            write!(f, "{err}")?;
            if i + 1 < self.errors.len() {
                writeln!(f, "\n")?;
            }
        }
        if self.errors.len() > 1 {
            write!(
                f,
                "\n\n{} {} {}",
                "found".dimmed(),
                self.errors.len().to_string().red().bold(),
                "errors".dimmed()
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

impl From<ConfigDiagnostics> for RouteError {
    fn from(diagnostics: ConfigDiagnostics) -> Self {
        let message = diagnostics
            .errors
            .iter()
            .map(|e| format!("[{}] {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        let hint = diagnostics.errors.iter().find_map(|e| e.hint.clone());
        match hint {
            Some(hint) => Self::validation_with_help(message, hint),
            None => Self::validation(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result() {
        let mut ok = ConfigDiagnostics::new();
        assert!(ok.is_empty());
        ok.error("routes./x/", "bad route");
        assert!(ok.into_result().is_err());
        assert!(ConfigDiagnostics::new().into_result().is_ok());
    }

    #[test]
    fn test_display_contains_field_and_hint() {
        owo_colors::set_override(false);
        let mut diags = ConfigDiagnostics::new();
        diags.error_with_hint(
            "collections./blog/.permalink",
            "permalinks use `{param}` placeholders",
            "replace `:slug` with `{slug}`",
        );
        let display = format!("{diags}");
        assert!(display.contains("collections./blog/.permalink"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn test_convert_to_route_error() {
        let mut diags = ConfigDiagnostics::new();
        diags.error("taxonomies.tag", "missing %s placeholder");
        let err: RouteError = diags.into();
        assert!(err.is_validation());
    }
}
