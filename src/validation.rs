//! Field-level checks run before a form is submitted.

use thiserror::Error;

use crate::model::entity::{CourseForm, LectureForm};
use crate::utils::is_valid_url;

pub type ValidationResult = std::result::Result<(), ValidationErrors>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", summarize(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<M: Into<String>>(&mut self, field: &'static str, message: M) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_result(self) -> ValidationResult {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    fn required(&mut self, field: &'static str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, message);
            return false;
        }
        true
    }

    fn min_len(&mut self, field: &'static str, value: &str, min: usize, message: &str) {
        if value.trim().chars().count() < min {
            self.add(field, message);
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

pub fn validate_course(form: &CourseForm, mode: FormMode) -> ValidationResult {
    let mut errors = ValidationErrors::new();

    if errors.required("title", &form.title, "Title is required") && mode == FormMode::Create {
        errors.min_len("title", &form.title, 3, "At least 3 characters");
    }

    if errors.required("description", &form.description, "Description is required")
        && mode == FormMode::Create
    {
        errors.min_len("description", &form.description, 10, "At least 10 characters");
    }

    if errors.required("price", &form.price, "Price is required") {
        match form.price.trim().parse::<f64>() {
            Ok(p) if p < 0.0 => errors.add("price", "Price cannot be negative"),
            Ok(p) if !p.is_finite() => errors.add("price", "Price must be a number"),
            Ok(_) => {}
            Err(_) => errors.add("price", "Price must be a number"),
        }
    }

    if mode == FormMode::Create {
        match &form.thumbnail {
            None => errors.add("thumbnail", "Thumbnail is required"),
            Some(t) if !t.is_image() => errors.add("thumbnail", "Thumbnail must be an image"),
            Some(_) => {}
        }
    }

    errors.into_result()
}

pub fn validate_module_title(title: &str) -> ValidationResult {
    let mut errors = ValidationErrors::new();
    errors.required("title", title, "Module title is required");
    errors.into_result()
}

pub fn validate_lecture(form: &LectureForm, mode: FormMode) -> ValidationResult {
    let mut errors = ValidationErrors::new();

    if errors.required("title", &form.title, "Title is required") {
        errors.min_len("title", &form.title, 3, "Title must be at least 3 characters");
    }

    if errors.required("videoUrl", &form.video_url, "Video URL is required")
        && !is_valid_url(form.video_url.trim())
    {
        errors.add("videoUrl", "Please enter a valid video URL");
    }

    if mode == FormMode::Create && form.module_id.as_deref().is_none_or(str::is_empty) {
        errors.add("moduleId", "Module is required");
    }

    if form.pdf_notes.iter().any(|n| !n.is_pdf()) {
        errors.add("pdfNotes", "Only PDF files are allowed");
    }

    errors.into_result()
}

pub fn validate_login(email: &str, password: &str) -> ValidationResult {
    let mut errors = ValidationErrors::new();
    errors.required("email", email, "Email is required");
    errors.required("password", password, "Password is required");
    errors.into_result()
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// Registration stops at the first failing rule, like the sign-up form.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> ValidationResult {
    let mut errors = ValidationErrors::new();

    if [name, email, password, confirm_password]
        .iter()
        .any(|v| v.is_empty())
    {
        errors.add("form", "Please fill in all fields");
    } else if password != confirm_password {
        errors.add("confirmPassword", "Passwords do not match");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add("password", "Password must be at least 6 characters long");
    }

    errors.into_result()
}
