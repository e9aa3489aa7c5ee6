use reqwest::{Method, multipart::Form};

use crate::{
    api::{ApiClient, ApiResult, client::file_part},
    model::{
        LectureFilter, Page, PaginationParams, ResourceTyped,
        entity::{Lecture, LectureForm, LecturePayload},
    },
    validation::{FormMode, validate_lecture},
};

fn lecture_multipart(form: &LectureForm, mode: FormMode) -> ApiResult<Form> {
    let mut multipart = Form::new()
        .text("title", form.title.trim().to_string())
        .text("videoUrl", form.video_url.trim().to_string());

    if mode == FormMode::Create {
        if let Some(module_id) = &form.module_id {
            multipart = multipart.text("moduleId", module_id.clone());
        }
        if let Some(course_id) = &form.course_id {
            multipart = multipart.text("courseId", course_id.clone());
        }
    }

    for note in &form.pdf_notes {
        multipart = multipart.part("pdfNotes", file_part(note)?);
    }
    Ok(multipart)
}

impl ApiClient {
    pub async fn list_lectures(
        &self,
        params: &PaginationParams,
        filter: &LectureFilter,
    ) -> ApiResult<Page<Lecture>> {
        let req = self
            .request(Method::GET, "lecture/get-all")?
            .query(params)
            .query(filter);
        let env = self.send::<Vec<Lecture>>(req, Lecture::get_resource_type()).await?;
        Ok(Page::new(env.data.unwrap_or_default(), env.meta))
    }

    pub async fn get_lecture(&self, id: &str) -> ApiResult<Lecture> {
        let req = self.request_to(Method::GET, "lecture", &[id])?;
        let payload: LecturePayload = self.send_data(req, Lecture::get_resource_type()).await?;
        Ok(payload.into_lecture())
    }

    #[tracing::instrument(skip(self, form), fields(title = %form.title))]
    pub async fn create_lecture(&self, form: &LectureForm) -> ApiResult<Lecture> {
        validate_lecture(form, FormMode::Create)?;

        let req = self
            .request(Method::POST, "lecture/create-lecture")?
            .multipart(lecture_multipart(form, FormMode::Create)?);
        self.send_data(req, Lecture::get_resource_type()).await
    }

    /// New notes are appended to the existing ones.
    #[tracing::instrument(skip(self, form))]
    pub async fn update_lecture(&self, id: &str, form: &LectureForm) -> ApiResult<Lecture> {
        validate_lecture(form, FormMode::Edit)?;

        let req = self
            .request_to(Method::PATCH, "lecture", &[id])?
            .multipart(lecture_multipart(form, FormMode::Edit)?);
        self.send_data(req, Lecture::get_resource_type()).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_lecture(&self, id: &str) -> ApiResult<String> {
        let req = self.request_to(Method::DELETE, "lecture", &[id])?;
        let env = self
            .send::<serde_json::Value>(req, Lecture::get_resource_type())
            .await?;
        Ok(env.message)
    }

    /// Lectures annotated with the caller's lock and completion flags.
    pub async fn lectures_with_access(&self, filter: &LectureFilter) -> ApiResult<Vec<Lecture>> {
        let req = self
            .request(Method::GET, "lecture/with-access")?
            .query(filter);
        let env = self.send::<Vec<Lecture>>(req, Lecture::get_resource_type()).await?;
        Ok(env.data.unwrap_or_default())
    }
}
