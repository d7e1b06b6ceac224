use crate::connections::errors::ZoweError;

/// What came back from one interactive step.
///
/// Prompts either produce a value, get dismissed by the user, or fail
/// outright. Keeping the three apart lets the dispatcher match every
/// transition instead of testing for empty values.
#[derive(Debug)]
pub enum Prompt<T> {
    Value(T),
    Cancelled,
    Failed(ZoweError),
}

impl<T> Prompt<T> {
    /// `None` and empty strings both count as a dismissal for text prompts,
    /// so callers usually go through [`Prompt::from_text`] instead.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Prompt::Value(v),
            None => Prompt::Cancelled,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Prompt<U> {
        match self {
            Prompt::Value(v) => Prompt::Value(f(v)),
            Prompt::Cancelled => Prompt::Cancelled,
            Prompt::Failed(e) => Prompt::Failed(e),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Prompt::Cancelled)
    }
}

impl Prompt<String> {
    /// Blank input is a cancellation.
    pub fn from_text(value: Option<String>) -> Self {
        match value {
            Some(text) if !text.trim().is_empty() => Prompt::Value(text),
            _ => Prompt::Cancelled,
        }
    }
}

impl<T> From<Result<T, ZoweError>> for Prompt<T> {
    fn from(result: Result<T, ZoweError>) -> Self {
        match result {
            Ok(v) => Prompt::Value(v),
            Err(e) => Prompt::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_a_cancellation() {
        assert!(Prompt::from_text(None).is_cancelled());
        assert!(Prompt::from_text(Some("   ".into())).is_cancelled());
        assert!(matches!(Prompt::from_text(Some("d a".into())), Prompt::Value(ref s) if s == "d a"));
    }

    #[test]
    fn map_keeps_failures() {
        let failed: Prompt<u8> = Err(ZoweError::Other("boom".into())).into();
        assert!(matches!(failed.map(|v| v + 1), Prompt::Failed(_)));
        assert!(matches!(Prompt::Value(1u8).map(|v| v + 1), Prompt::Value(2)));
    }
}
