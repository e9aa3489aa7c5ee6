use reqwest::Method;
use serde::Serialize;

use crate::{
    api::{ApiClient, ApiResult},
    model::{
        ResourceTyped,
        entity::{CompletionOutcome, Lecture, LectureAccess, Progress},
    },
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LectureRef<'a> {
    course_id: &'a str,
    lecture_id: &'a str,
}

impl ApiClient {
    /// `None` until the caller first opens the course.
    pub async fn course_progress(&self, course_id: &str) -> ApiResult<Option<Progress>> {
        let req = self.request_to(Method::GET, "progress/get-course", &[course_id])?;
        let env = self.send::<Progress>(req, Progress::get_resource_type()).await?;
        Ok(env.data)
    }

    pub async fn user_progress(&self) -> ApiResult<Vec<Progress>> {
        let req = self.request(Method::GET, "progress/get-user-progress")?;
        let env = self
            .send::<Vec<Progress>>(req, Progress::get_resource_type())
            .await?;
        Ok(env.data.unwrap_or_default())
    }

    /// The answer names the lecture unlocked by this completion, if any.
    #[tracing::instrument(skip(self))]
    pub async fn mark_lecture_complete(
        &self,
        course_id: &str,
        lecture_id: &str,
    ) -> ApiResult<CompletionOutcome> {
        let req = self
            .request(Method::POST, "progress/lecture-completed")?
            .json(&LectureRef {
                course_id,
                lecture_id,
            });
        let env = self
            .send::<CompletionOutcome>(req, Lecture::get_resource_type())
            .await?;
        Ok(env.data.unwrap_or_default())
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_current_lecture(&self, course_id: &str, lecture_id: &str) -> ApiResult<()> {
        let req = self
            .request(Method::PATCH, "progress/current-lecture")?
            .json(&LectureRef {
                course_id,
                lecture_id,
            });
        self.send::<serde_json::Value>(req, Lecture::get_resource_type())
            .await?;
        Ok(())
    }

    pub async fn check_lecture_access(
        &self,
        course_id: &str,
        lecture_id: &str,
    ) -> ApiResult<LectureAccess> {
        let req = self.request_to(
            Method::GET,
            "progress/check-lecture-access",
            &[course_id, lecture_id],
        )?;
        self.send_data(req, Lecture::get_resource_type()).await
    }
}
