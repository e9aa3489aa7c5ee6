use async_trait::async_trait;

use crate::{
    api::{ApiClient, ApiResult},
    model::entity::{CompletionOutcome, CourseWithProgress},
};

/// The server calls a learning session depends on.
#[async_trait]
pub trait LearningBackend: Send + Sync + 'static {
    async fn course_with_progress(&self, course_id: &str) -> ApiResult<CourseWithProgress>;

    async fn mark_lecture_complete(
        &self,
        course_id: &str,
        lecture_id: &str,
    ) -> ApiResult<CompletionOutcome>;

    async fn update_current_lecture(&self, course_id: &str, lecture_id: &str) -> ApiResult<()>;
}

#[async_trait]
impl LearningBackend for ApiClient {
    async fn course_with_progress(&self, course_id: &str) -> ApiResult<CourseWithProgress> {
        ApiClient::course_with_progress(self, course_id).await
    }

    async fn mark_lecture_complete(
        &self,
        course_id: &str,
        lecture_id: &str,
    ) -> ApiResult<CompletionOutcome> {
        ApiClient::mark_lecture_complete(self, course_id, lecture_id).await
    }

    async fn update_current_lecture(&self, course_id: &str, lecture_id: &str) -> ApiResult<()> {
        ApiClient::update_current_lecture(self, course_id, lecture_id).await
    }
}
