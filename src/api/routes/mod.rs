//! One file per REST resource, each extending [`crate::api::ApiClient`].

mod auth;
mod course;
mod lecture;
mod module;
mod progress;
