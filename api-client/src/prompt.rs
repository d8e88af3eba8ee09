/// A single-turn text prompt addressed to one model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    pub model: String,
    pub text: String,
}

impl Prompt {
    pub fn new(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            text: text.into(),
        }
    }
}
