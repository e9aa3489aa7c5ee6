#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path as FsPath;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use chrono::Utc;
use lectern::{
    api::ApiClient,
    auth::{FileCredentialStore, MemoryCredentialStore, Session},
    learn::LectureSequence,
    model::{
        Envelope, Meta,
        entity::{
            Asset, Course, CourseWithProgress, Lecture, LectureAccess, Module, Progress,
            ProgressSummary, Reference, Role, User,
        },
    },
    utils::{calculate_progress, generate_slug},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@lms.test";
pub const STUDENT_EMAIL: &str = "student@lms.test";
pub const PASSWORD: &str = "secret123";
pub const COURSE_ID: &str = "c-rust";

type Shared = Arc<Mutex<MockState>>;
type Reply = Result<Response, Response>;

/// In-memory stand-in for the LMS backend.
#[derive(Debug, Default)]
pub struct MockState {
    users: Vec<(User, String)>,
    tokens: HashMap<String, String>,
    pub courses: Vec<Course>,
    pub modules: Vec<Module>,
    pub lectures: Vec<Lecture>,
    pub progress: HashMap<(String, String), Progress>,
    /// Lecture ids received by the current-lecture endpoint, in order.
    pub current_updates: Vec<String>,
    /// Makes the completion endpoint answer 500.
    pub fail_completions: bool,
}

impl MockState {
    fn seeded() -> Self {
        let mut state = Self::default();
        state.add_user("Admin", ADMIN_EMAIL, Role::Admin);
        state.add_user("Student", STUDENT_EMAIL, Role::User);

        let mut course = Course::new(COURSE_ID, "Rust Basics", "49.99");
        course.description = String::from("Ownership, borrowing and the rest");
        state.courses.push(course);

        state.modules.push(Module::new("m1", "Getting started", 1, COURSE_ID));
        state.modules.push(Module::new("m2", "Going further", 2, COURSE_ID));

        for (id, title, module, order) in [
            ("l1", "Intro", "m1", 1),
            ("l2", "Setup", "m1", 2),
            ("l3", "Advanced Setup", "m2", 1),
        ] {
            let mut lecture = Lecture::new(id, title, module, order);
            lecture.video_url = String::from("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
            lecture.course_id = Some(Reference::from(COURSE_ID));
            state.lectures.push(lecture);
        }
        state
    }

    fn add_user(&mut self, name: &str, email: &str, role: Role) -> User {
        let user = User::new(Uuid::new_v4().to_string(), name.into(), email.into(), role);
        self.users.push((user.clone(), PASSWORD.to_string()));
        user
    }

    fn caller(&self, headers: &HeaderMap) -> Result<User, Response> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "You are not authorized"))?;
        let user_id = self
            .tokens
            .get(token)
            .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;
        self.users
            .iter()
            .find(|(u, _)| u.id() == user_id)
            .map(|(u, _)| u.clone())
            .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "User not found"))
    }

    fn admin(&self, headers: &HeaderMap) -> Result<User, Response> {
        let user = self.caller(headers)?;
        if !user.is_admin() {
            return Err(fail(StatusCode::FORBIDDEN, "Admin access required"));
        }
        Ok(user)
    }

    fn course(&self, id_or_slug: &str) -> Result<Course, Response> {
        self.courses
            .iter()
            .find(|c| c.id == id_or_slug || c.slug == id_or_slug)
            .cloned()
            .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Course not found"))
    }

    fn completed(&self, user_id: &str, course_id: &str) -> Vec<String> {
        self.progress
            .get(&(user_id.to_string(), course_id.to_string()))
            .map(|p| p.completed_lectures.clone())
            .unwrap_or_default()
    }

    /// The course's lectures with lock flags worked out for one user.
    fn sequence(&self, user_id: &str, course_id: &str) -> LectureSequence {
        let completed = self.completed(user_id, course_id);
        let modules = self
            .modules
            .iter()
            .filter(|m| m.course_id.id() == course_id)
            .cloned()
            .collect();
        let lectures = self
            .lectures
            .iter()
            .filter(|l| l.course_id.as_ref().is_some_and(|c| c.id() == course_id))
            .cloned()
            .map(|mut l| {
                l.is_completed = Some(completed.contains(&l.id));
                l.is_locked = None;
                l
            })
            .collect();
        LectureSequence::new(modules, lectures)
    }

    fn progress_entry(&mut self, user_id: &str, course_id: &str) -> &mut Progress {
        self.progress
            .entry((user_id.to_string(), course_id.to_string()))
            .or_insert_with(|| Progress {
                id: Uuid::new_v4().to_string(),
                user_id: Some(user_id.to_string()),
                course_id: Reference::from(course_id),
                completed_lectures: Vec::new(),
                current_lecture: None,
                progress_percentage: 0.0,
                last_accessed: Utc::now(),
            })
    }
}

pub struct MockServer {
    pub base_url: Url,
    state: Shared,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(MockState::seeded()));
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/api/v1/")).unwrap(),
            state,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Forgets every issued token, as if they all expired.
    pub fn revoke_tokens(&self) {
        self.state().tokens.clear();
    }

    pub fn client(&self) -> ApiClient {
        let session = Arc::new(Session::new(MemoryCredentialStore::new(), None));
        ApiClient::new(self.base_url.clone(), session).unwrap()
    }

    pub fn client_with_file_store(&self, path: &FsPath) -> ApiClient {
        let session = Arc::new(Session::new(FileCredentialStore::new(path), None));
        ApiClient::new(self.base_url.clone(), session).unwrap()
    }

    pub async fn student(&self) -> ApiClient {
        let client = self.client();
        client.login(STUDENT_EMAIL, PASSWORD).await.unwrap();
        client
    }

    pub async fn admin(&self) -> ApiClient {
        let client = self.client();
        client.login(ADMIN_EMAIL, PASSWORD).await.unwrap();
        client
    }
}

fn ok<T: Serialize>(message: &str, data: T) -> Reply {
    Ok(Json(Envelope::ok(message, data)).into_response())
}

fn fail(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "success": false, "message": message, "data": null })),
    )
        .into_response()
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/course/get-all", get(list_courses))
        .route("/api/v1/course/get-all-course-user", get(list_courses))
        .route("/api/v1/course/create-course", post(create_course))
        .route("/api/v1/course/with-progress/{id}", get(course_with_progress))
        .route("/api/v1/course/user-single-course/{id}", get(get_course))
        .route(
            "/api/v1/course/{id}",
            get(get_course).patch(update_course).delete(delete_course),
        )
        .route("/api/v1/module/get-all/{course_id}", get(list_modules))
        .route("/api/v1/module/create-module", post(create_module))
        .route("/api/v1/module/{id}", patch(update_module).delete(delete_module))
        .route("/api/v1/lecture/get-all", get(list_lectures))
        .route("/api/v1/lecture/with-access", get(lectures_with_access))
        .route("/api/v1/lecture/create-lecture", post(create_lecture))
        .route(
            "/api/v1/lecture/{id}",
            get(get_lecture).patch(update_lecture).delete(delete_lecture),
        )
        .route("/api/v1/progress/get-course/{course_id}", get(course_progress))
        .route("/api/v1/progress/get-user-progress", get(user_progress))
        .route("/api/v1/progress/lecture-completed", post(lecture_completed))
        .route("/api/v1/progress/current-lecture", patch(current_lecture))
        .route(
            "/api/v1/progress/check-lecture-access/{course_id}/{lecture_id}",
            get(check_access),
        )
        .with_state(state)
}

// auth

#[derive(Deserialize)]
struct LoginReq {
    email: String,
    password: String,
}

async fn login(State(state): State<Shared>, Json(req): Json<LoginReq>) -> Reply {
    let mut st = state.lock().unwrap();
    let user = st
        .users
        .iter()
        .find(|(u, p)| u.email() == req.email && *p == req.password)
        .map(|(u, _)| u.clone())
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Invalid email or password"))?;

    let token = format!("tok-{}", Uuid::new_v4());
    st.tokens.insert(token.clone(), user.id().to_string());
    ok("Logged in successfully", json!({ "accessToken": token, "user": user }))
}

#[derive(Deserialize)]
struct RegisterReq {
    name: String,
    email: String,
    password: String,
}

async fn register(State(state): State<Shared>, Json(req): Json<RegisterReq>) -> Reply {
    let mut st = state.lock().unwrap();
    if st.users.iter().any(|(u, _)| u.email() == req.email) {
        return Err(fail(StatusCode::CONFLICT, "User already exists"));
    }
    let user = User::new(Uuid::new_v4().to_string(), req.name, req.email, Role::User);
    st.users.push((user.clone(), req.password));
    ok("User registered successfully", user)
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    if let Some(token) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        state.lock().unwrap().tokens.remove(token);
    }
    ok("Logged out", Value::Null)
}

// courses

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    page: Option<u64>,
    limit: Option<u64>,
    search_term: Option<String>,
}

async fn list_courses(State(state): State<Shared>, Query(q): Query<ListQuery>) -> Reply {
    let st = state.lock().unwrap();
    let needle = q.search_term.unwrap_or_default().to_lowercase();
    let matching: Vec<Course> = st
        .courses
        .iter()
        .filter(|c| c.title.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    let page = q.page.unwrap_or(1).max(1);
    let limit = q.limit.unwrap_or(10).max(1);
    let items: Vec<Course> = matching
        .iter()
        .skip(((page - 1) * limit) as usize)
        .take(limit as usize)
        .cloned()
        .collect();
    let meta = Meta {
        page,
        limit,
        total: matching.len() as u64,
    };
    Ok(Json(Envelope::ok("Courses retrieved", items).with_meta(meta)).into_response())
}

async fn get_course(State(state): State<Shared>, Path(id): Path<String>) -> Reply {
    let course = state.lock().unwrap().course(&id)?;
    ok("Course retrieved", course)
}

/// Text fields and uploaded file names of a multipart body.
async fn read_form(
    mut multipart: Multipart,
) -> Result<(HashMap<String, String>, Vec<(String, String)>), Response> {
    let malformed = |_| fail(StatusCode::BAD_REQUEST, "Malformed form");

    let mut text = HashMap::new();
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                field.bytes().await.map_err(malformed)?;
                files.push((name, file_name));
            }
            None => {
                text.insert(name, field.text().await.map_err(malformed)?);
            }
        }
    }
    Ok((text, files))
}

fn asset(file_name: &str) -> Asset {
    Asset {
        public_id: Uuid::new_v4().to_string(),
        secure_url: format!("https://cdn.lms.test/{file_name}"),
    }
}

async fn create_course(
    State(state): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Reply {
    let admin = state.lock().unwrap().admin(&headers)?;
    let (text, files) = read_form(multipart).await?;

    let title = text.get("title").cloned().unwrap_or_default();
    let mut course = Course::new(
        &Uuid::new_v4().to_string(),
        &title,
        text.get("price").map(String::as_str).unwrap_or("0"),
    );
    course.description = text.get("description").cloned().unwrap_or_default();
    course.created_by = Some(admin.id().to_string());
    course.thumbnail = files
        .iter()
        .filter(|(field, _)| field == "thumbnail")
        .map(|(_, name)| asset(name))
        .collect();
    if course.thumbnail.is_empty() {
        return Err(fail(StatusCode::BAD_REQUEST, "Thumbnail is required"));
    }

    state.lock().unwrap().courses.push(course.clone());
    ok("Course created successfully", course)
}

async fn update_course(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Reply {
    state.lock().unwrap().admin(&headers)?;
    let (text, files) = read_form(multipart).await?;

    let mut st = state.lock().unwrap();
    let course = st
        .courses
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Course not found"))?;
    if let Some(title) = text.get("title") {
        course.title = title.clone();
        course.slug = generate_slug(title);
    }
    if let Some(description) = text.get("description") {
        course.description = description.clone();
    }
    if let Some(price) = text.get("price") {
        course.price = price.clone();
    }
    if let Some((_, name)) = files.iter().find(|(field, _)| field == "thumbnail") {
        course.thumbnail = vec![asset(name)];
    }
    let course = course.clone();
    ok("Course updated successfully", course)
}

async fn delete_course(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    let mut st = state.lock().unwrap();
    st.admin(&headers)?;
    let before = st.courses.len();
    st.courses.retain(|c| c.id != id);
    if st.courses.len() == before {
        return Err(fail(StatusCode::NOT_FOUND, "Course not found"));
    }
    st.modules.retain(|m| m.course_id.id() != id);
    st.lectures
        .retain(|l| l.course_id.as_ref().is_none_or(|c| c.id() != id));
    ok("Course deleted successfully", Value::Null)
}

async fn course_with_progress(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    let st = state.lock().unwrap();
    let user = st.caller(&headers)?;
    let course = st.course(&id)?;
    let sequence = st.sequence(user.id(), &course.id);

    let progress = st
        .progress
        .get(&(user.id().to_string(), course.id.clone()))
        .map(|p| ProgressSummary {
            total_lectures: sequence.len() as u32,
            completed_lectures: p.completed_lectures.len() as u32,
            progress_percentage: p.progress_percentage,
            current_lecture: p.current_lecture.clone(),
            last_accessed: Some(p.last_accessed),
        });

    ok(
        "Course retrieved",
        CourseWithProgress {
            course,
            modules: sequence.modules().to_vec(),
            lectures: sequence.lectures().to_vec(),
            progress,
        },
    )
}

// modules

async fn list_modules(State(state): State<Shared>, Path(course_id): Path<String>) -> Reply {
    let st = state.lock().unwrap();
    let mut modules: Vec<Module> = st
        .modules
        .iter()
        .filter(|m| m.course_id.id() == course_id)
        .cloned()
        .collect();
    modules.sort_by_key(|m| m.module_number);
    ok("Modules retrieved", modules)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleReq {
    title: Option<String>,
    course_id: Option<String>,
}

async fn create_module(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(req): Json<ModuleReq>,
) -> Reply {
    let mut st = state.lock().unwrap();
    st.admin(&headers)?;
    let course_id = req.course_id.unwrap_or_default();
    st.course(&course_id)?;

    let number = st
        .modules
        .iter()
        .filter(|m| m.course_id.id() == course_id)
        .map(|m| m.module_number)
        .max()
        .unwrap_or(0)
        + 1;
    let module = Module::new(
        &Uuid::new_v4().to_string(),
        &req.title.unwrap_or_default(),
        number,
        &course_id,
    );
    st.modules.push(module.clone());
    ok("Module created successfully", module)
}

async fn update_module(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<ModuleReq>,
) -> Reply {
    let mut st = state.lock().unwrap();
    st.admin(&headers)?;
    let module = st
        .modules
        .iter_mut()
        .find(|m| m.id == id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Module not found"))?;
    if let Some(title) = req.title {
        module.slug = generate_slug(&title);
        module.title = title;
    }
    if let Some(course_id) = req.course_id {
        module.course_id = Reference::from(course_id.as_str());
    }
    let module = module.clone();
    ok("Module updated successfully", module)
}

async fn delete_module(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    let mut st = state.lock().unwrap();
    st.admin(&headers)?;
    if !st.modules.iter().any(|m| m.id == id) {
        return Err(fail(StatusCode::NOT_FOUND, "Module not found"));
    }
    st.modules.retain(|m| m.id != id);
    st.lectures.retain(|l| l.module_id.id() != id);
    ok("Module deleted successfully", Value::Null)
}

// lectures

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LectureQuery {
    course_id: Option<String>,
    module_id: Option<String>,
}

async fn list_lectures(State(state): State<Shared>, Query(q): Query<LectureQuery>) -> Reply {
    let st = state.lock().unwrap();
    let mut lectures: Vec<Lecture> = st
        .lectures
        .iter()
        .filter(|l| {
            q.course_id.as_deref().is_none_or(|c| {
                l.course_id.as_ref().is_some_and(|lc| lc.id() == c)
            })
        })
        .filter(|l| q.module_id.as_deref().is_none_or(|m| l.module_id.id() == m))
        .cloned()
        .collect();
    lectures.sort_by_key(|l| l.order);
    ok("Lectures retrieved", lectures)
}

async fn lectures_with_access(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(q): Query<LectureQuery>,
) -> Reply {
    let st = state.lock().unwrap();
    let user = st.caller(&headers)?;
    let course = st.course(q.course_id.as_deref().unwrap_or_default())?;
    let lectures = st.sequence(user.id(), &course.id).lectures().to_vec();
    ok("Lectures retrieved", lectures)
}

async fn get_lecture(State(state): State<Shared>, Path(id): Path<String>) -> Reply {
    let st = state.lock().unwrap();
    let lecture = st
        .lectures
        .iter()
        .find(|l| l.id == id)
        .cloned()
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Lecture not found"))?;
    // this endpoint wraps the document
    ok("Lecture retrieved", json!({ "lecture": lecture }))
}

fn notes(files: &[(String, String)]) -> Vec<Asset> {
    files
        .iter()
        .filter(|(field, _)| field == "pdfNotes")
        .map(|(_, name)| asset(name))
        .collect()
}

async fn create_lecture(
    State(state): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Reply {
    state.lock().unwrap().admin(&headers)?;
    let (text, files) = read_form(multipart).await?;

    let mut st = state.lock().unwrap();
    let module_id = text.get("moduleId").cloned().unwrap_or_default();
    let module = st
        .modules
        .iter()
        .find(|m| m.id == module_id)
        .cloned()
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Module not found"))?;

    let order = st
        .lectures
        .iter()
        .filter(|l| l.module_id.id() == module.id)
        .count() as i32
        + 1;
    let mut lecture = Lecture::new(
        &Uuid::new_v4().to_string(),
        text.get("title").map(String::as_str).unwrap_or_default(),
        &module.id,
        order,
    );
    lecture.video_url = text.get("videoUrl").cloned().unwrap_or_default();
    lecture.course_id = Some(Reference::from(
        text.get("courseId")
            .map(String::as_str)
            .unwrap_or(module.course_id.id()),
    ));
    lecture.pdf_notes = notes(&files);
    lecture.created_at = Some(Utc::now());

    st.lectures.push(lecture.clone());
    ok("Lecture created successfully", lecture)
}

async fn update_lecture(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Reply {
    state.lock().unwrap().admin(&headers)?;
    let (text, files) = read_form(multipart).await?;

    let mut st = state.lock().unwrap();
    let lecture = st
        .lectures
        .iter_mut()
        .find(|l| l.id == id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Lecture not found"))?;
    if let Some(title) = text.get("title") {
        lecture.title = title.clone();
        lecture.slug = generate_slug(title);
    }
    if let Some(url) = text.get("videoUrl") {
        lecture.video_url = url.clone();
    }
    lecture.pdf_notes.extend(notes(&files));
    let lecture = lecture.clone();
    ok("Lecture updated successfully", lecture)
}

async fn delete_lecture(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    let mut st = state.lock().unwrap();
    st.admin(&headers)?;
    if !st.lectures.iter().any(|l| l.id == id) {
        return Err(fail(StatusCode::NOT_FOUND, "Lecture not found"));
    }
    st.lectures.retain(|l| l.id != id);
    ok("Lecture deleted successfully", Value::Null)
}

// progress

async fn course_progress(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(course_id): Path<String>,
) -> Reply {
    let st = state.lock().unwrap();
    let user = st.caller(&headers)?;
    let progress = st
        .progress
        .get(&(user.id().to_string(), course_id))
        .cloned();
    ok("Progress retrieved", progress)
}

async fn user_progress(State(state): State<Shared>, headers: HeaderMap) -> Reply {
    let st = state.lock().unwrap();
    let user = st.caller(&headers)?;
    let records: Vec<Progress> = st
        .progress
        .iter()
        .filter(|((u, _), _)| u == user.id())
        .map(|(_, p)| p.clone())
        .collect();
    ok("Progress retrieved", records)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LectureRef {
    course_id: String,
    lecture_id: String,
}

async fn lecture_completed(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(req): Json<LectureRef>,
) -> Reply {
    let mut guard = state.lock().unwrap();
    let st = &mut *guard;
    let user = st.caller(&headers)?;
    if st.fail_completions {
        return Err(fail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"));
    }
    let course = st.course(&req.course_id)?;

    let mut sequence = st.sequence(user.id(), &course.id);
    let index = sequence
        .position(&req.lecture_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Lecture not found"))?;
    if sequence.get(index).is_some_and(Lecture::locked) {
        return Err(fail(StatusCode::FORBIDDEN, "Complete the previous lecture first"));
    }
    let next = sequence
        .complete(index)
        .and_then(|i| sequence.get(i).cloned());
    let total = sequence.len();

    let entry = st.progress_entry(user.id(), &course.id);
    if !entry.completed_lectures.contains(&req.lecture_id) {
        entry.completed_lectures.push(req.lecture_id.clone());
    }
    if let Some(next) = &next {
        entry.current_lecture = Some(next.id.clone());
    }
    entry.progress_percentage = f64::from(calculate_progress(entry.completed_lectures.len(), total));
    entry.last_accessed = Utc::now();
    let progress = entry.clone();

    ok(
        "Lecture marked as complete",
        json!({ "nextLecture": next, "progress": progress }),
    )
}

async fn current_lecture(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(req): Json<LectureRef>,
) -> Reply {
    let mut guard = state.lock().unwrap();
    let st = &mut *guard;
    let user = st.caller(&headers)?;
    let course = st.course(&req.course_id)?;

    let entry = st.progress_entry(user.id(), &course.id);
    entry.current_lecture = Some(req.lecture_id.clone());
    entry.last_accessed = Utc::now();
    st.current_updates.push(req.lecture_id);
    ok("Current lecture updated", Value::Null)
}

async fn check_access(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((course_id, lecture_id)): Path<(String, String)>,
) -> Reply {
    let st = state.lock().unwrap();
    let user = st.caller(&headers)?;
    let sequence = st.sequence(user.id(), &course_id);
    let lecture = sequence
        .position(&lecture_id)
        .and_then(|i| sequence.get(i))
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Lecture not found"))?;

    let access = if lecture.locked() {
        LectureAccess {
            has_access: false,
            lock_reason: Some(String::from("Complete the previous lecture first")),
        }
    } else {
        LectureAccess {
            has_access: true,
            lock_reason: None,
        }
    };
    ok("Access checked", access)
}
