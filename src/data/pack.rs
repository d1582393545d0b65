//! Combined study pack request for the multipart `/generate` endpoint

use std::path::PathBuf;

use reqwest::multipart::{Form, Part};

use super::BackendError;

/// Default study level sent when none is given
pub const DEFAULT_LEVEL: &str = "highschool";

/// Default number of quiz questions requested
pub const DEFAULT_NUM_QUESTIONS: u32 = 10;

/// Parameters for a combined study pack generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyPackRequest {
    pub topic: Option<String>,
    pub link: Option<String>,
    /// Local file uploaded as the `file` field
    pub file: Option<PathBuf>,
    pub level: String,
    pub include_quiz: bool,
    pub num_questions: u32,
}

impl Default for StudyPackRequest {
    fn default() -> Self {
        Self {
            topic: None,
            link: None,
            file: None,
            level: DEFAULT_LEVEL.to_string(),
            include_quiz: true,
            num_questions: DEFAULT_NUM_QUESTIONS,
        }
    }
}

impl StudyPackRequest {
    /// Text fields of the form in submission order.
    ///
    /// Empty `topic`/`link` values are omitted, like unset ones.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(topic) = self.topic.as_deref().filter(|t| !t.is_empty()) {
            fields.push(("topic", topic.to_string()));
        }
        if let Some(link) = self.link.as_deref().filter(|l| !l.is_empty()) {
            fields.push(("link", link.to_string()));
        }
        fields.push(("level", self.level.clone()));
        fields.push(("include_quiz", self.include_quiz.to_string()));
        fields.push(("num_questions", self.num_questions.to_string()));
        fields
    }

    /// Builds the multipart form, reading the upload file if one is set
    pub async fn to_form(&self) -> Result<Form, BackendError> {
        let mut form = Form::new();
        for (name, value) in self.text_fields() {
            form = form.text(name, value);
        }

        if let Some(path) = &self.file {
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "upload".to_string());
            form = form.part("file", Part::bytes(bytes).file_name(file_name));
        }

        Ok(form)
    }
}
