use reqwest::{Method, multipart::Form};

use crate::{
    api::{ApiClient, ApiResult, client::file_part},
    model::{
        Page, PaginationParams, ResourceTyped,
        entity::{Course, CourseForm, CourseWithProgress},
    },
    validation::{FormMode, validate_course},
};

fn course_multipart(form: &CourseForm) -> ApiResult<Form> {
    let mut multipart = Form::new()
        .text("title", form.title.trim().to_string())
        .text("description", form.description.trim().to_string())
        .text("price", form.price.trim().to_string());

    if let Some(thumbnail) = &form.thumbnail {
        multipart = multipart.part("thumbnail", file_part(thumbnail)?);
    }
    Ok(multipart)
}

impl ApiClient {
    /// Admin listing, drafts included.
    pub async fn list_courses(&self, params: &PaginationParams) -> ApiResult<Page<Course>> {
        let req = self.request(Method::GET, "course/get-all")?.query(params);
        let env = self.send::<Vec<Course>>(req, Course::get_resource_type()).await?;
        Ok(Page::new(env.data.unwrap_or_default(), env.meta))
    }

    pub async fn list_published_courses(
        &self,
        params: &PaginationParams,
    ) -> ApiResult<Page<Course>> {
        let req = self
            .request(Method::GET, "course/get-all-course-user")?
            .query(params);
        let env = self.send::<Vec<Course>>(req, Course::get_resource_type()).await?;
        Ok(Page::new(env.data.unwrap_or_default(), env.meta))
    }

    pub async fn get_course(&self, id: &str) -> ApiResult<Course> {
        let req = self.request_to(Method::GET, "course", &[id])?;
        self.send_data(req, Course::get_resource_type()).await
    }

    pub async fn get_course_for_user(&self, id: &str) -> ApiResult<Course> {
        let req = self.request_to(Method::GET, "course/user-single-course", &[id])?;
        self.send_data(req, Course::get_resource_type()).await
    }

    #[tracing::instrument(skip(self, form), fields(title = %form.title))]
    pub async fn create_course(&self, form: &CourseForm) -> ApiResult<Course> {
        validate_course(form, FormMode::Create)?;

        let req = self
            .request(Method::POST, "course/create-course")?
            .multipart(course_multipart(form)?);
        self.send_data(req, Course::get_resource_type()).await
    }

    #[tracing::instrument(skip(self, form))]
    pub async fn update_course(&self, id: &str, form: &CourseForm) -> ApiResult<Course> {
        validate_course(form, FormMode::Edit)?;

        let req = self
            .request_to(Method::PATCH, "course", &[id])?
            .multipart(course_multipart(form)?);
        self.send_data(req, Course::get_resource_type()).await
    }

    /// Deletes the course; the server cascades to its modules and lectures.
    #[tracing::instrument(skip(self))]
    pub async fn delete_course(&self, id: &str) -> ApiResult<String> {
        let req = self.request_to(Method::DELETE, "course", &[id])?;
        let env = self
            .send::<serde_json::Value>(req, Course::get_resource_type())
            .await?;
        Ok(env.message)
    }

    /// Course, modules, lectures with lock flags and the caller's progress.
    pub async fn course_with_progress(&self, id: &str) -> ApiResult<CourseWithProgress> {
        let req = self.request_to(Method::GET, "course/with-progress", &[id])?;
        self.send_data(req, Course::get_resource_type()).await
    }
}
