//! FAQ bot endpoint

use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    services::faq::FaqAnswer,
    AppState,
};

#[derive(Deserialize, ToSchema)]
pub struct AskRequest {
    pub question: String,
}

/// Answer a visitor question
#[utoipa::path(
    post,
    path = "/faq/ask",
    tag = "faq",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Best matching answer, or the fallback", body = FaqAnswer),
        (status = 400, description = "Question is empty or too long")
    )
)]
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> AppResult<Json<FaqAnswer>> {
    let question = check_question(&request.question)?;
    Ok(Json(state.services.faq.ask(question)))
}

const MAX_QUESTION_CHARS: usize = 500;

/// Trimmed question, 1 to 500 characters (not bytes)
fn check_question(raw: &str) -> AppResult<&str> {
    let question = raw.trim();
    let chars = question.chars().count();
    if chars == 0 || chars > MAX_QUESTION_CHARS {
        return Err(AppError::Validation(format!(
            "Question must be between 1 and {} characters",
            MAX_QUESTION_CHARS
        )));
    }
    Ok(question)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_length_counts_characters() {
        let cyrillic = "Вопрос ".repeat(40);
        assert!(cyrillic.len() > MAX_QUESTION_CHARS);
        assert!(check_question(&cyrillic).is_ok());

        assert_eq!(check_question("  Where are you?  ").unwrap(), "Where are you?");
        assert!(matches!(check_question("   "), Err(AppError::Validation(_))));
        assert!(check_question(&"é".repeat(501)).is_err());
        assert!(check_question(&"é".repeat(500)).is_ok());
    }
}
