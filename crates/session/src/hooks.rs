//! Outbound seams of a picker session.
//!
//! The session never renders, navigates, localizes or measures by itself; it
//! calls out through these traits.

/// Receives the committed selection
pub trait AssigneeWorkflow: Send {
    /// Called exactly once per successful commit with the normalized token
    fn emit_assignee_selection(&mut self, resolved_reference: &str);
}

/// Closes the picker screen
pub trait Navigator: Send {
    /// Called on both commit and dismiss
    fn request_close(&mut self);
}

/// Brackets the interval from session start to first paint of computed
/// sections. Purely observational.
pub trait RenderInstrumentation: Send {
    fn mark_search_render_start(&mut self) {}
    fn mark_search_render_end(&mut self) {}
}

/// Looks up user-facing strings by key
pub trait Translator: Send {
    fn translate(&self, key: &str) -> String;
}

pub struct NoopInstrumentation;

impl RenderInstrumentation for NoopInstrumentation {}

/// Built-in English strings; unknown keys are returned as-is
pub struct EnglishTranslator;

impl Translator for EnglishTranslator {
    fn translate(&self, key: &str) -> String {
        match key {
            "common.recents" => "Recents",
            "common.noResultsFound" => "No results found",
            "messages.errorMessageInvalidPhone" => {
                "Please enter a valid phone number with a country code"
            }
            "messages.errorMessageInvalidEmail" => "Please enter a valid email address",
            other => other,
        }
        .to_string()
    }
}

/// Everything a session calls out to
pub struct SessionHooks {
    pub workflow: Box<dyn AssigneeWorkflow>,
    pub navigator: Box<dyn Navigator>,
    pub instrumentation: Box<dyn RenderInstrumentation>,
    pub translator: Box<dyn Translator>,
}

impl SessionHooks {
    /// Hooks with no-op instrumentation and English strings
    pub fn new(workflow: Box<dyn AssigneeWorkflow>, navigator: Box<dyn Navigator>) -> Self {
        Self {
            workflow,
            navigator,
            instrumentation: Box::new(NoopInstrumentation),
            translator: Box::new(EnglishTranslator),
        }
    }

    #[must_use]
    pub fn instrumentation(mut self, instrumentation: Box<dyn RenderInstrumentation>) -> Self {
        self.instrumentation = instrumentation;
        self
    }

    #[must_use]
    pub fn translator(mut self, translator: Box<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_translator_falls_back_to_key() {
        let translator = EnglishTranslator;
        assert_eq!(translator.translate("common.recents"), "Recents");
        assert_eq!(translator.translate("common.unknown"), "common.unknown");
    }
}
