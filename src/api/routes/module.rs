use reqwest::Method;

use crate::{
    api::{ApiClient, ApiResult},
    model::{
        Page, PaginationParams, ResourceTyped,
        entity::{Module, ModuleCreate, ModuleUpdate},
    },
    validation::validate_module_title,
};

impl ApiClient {
    /// Modules of a course; callers sort by `module_number` when order matters.
    pub async fn list_modules(
        &self,
        course_id: &str,
        params: &PaginationParams,
    ) -> ApiResult<Page<Module>> {
        let req = self
            .request_to(Method::GET, "module/get-all", &[course_id])?
            .query(params);
        let env = self.send::<Vec<Module>>(req, Module::get_resource_type()).await?;
        Ok(Page::new(env.data.unwrap_or_default(), env.meta))
    }

    /// The server assigns the next `moduleNumber`.
    #[tracing::instrument(skip(self))]
    pub async fn create_module(&self, title: &str, course_id: &str) -> ApiResult<Module> {
        validate_module_title(title)?;

        let body = ModuleCreate {
            title: title.trim().to_string(),
            course_id: course_id.to_string(),
        };
        let req = self
            .request(Method::POST, "module/create-module")?
            .json(&body);
        self.send_data(req, Module::get_resource_type()).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_module(&self, id: &str, patch: &ModuleUpdate) -> ApiResult<Module> {
        if let Some(title) = &patch.title {
            validate_module_title(title)?;
        }

        let req = self
            .request_to(Method::PATCH, "module", &[id])?
            .json(patch);
        self.send_data(req, Module::get_resource_type()).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_module(&self, id: &str) -> ApiResult<String> {
        let req = self.request_to(Method::DELETE, "module", &[id])?;
        let env = self
            .send::<serde_json::Value>(req, Module::get_resource_type())
            .await?;
        Ok(env.message)
    }
}
