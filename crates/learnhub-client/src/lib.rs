//! Typed client for the learnhub HTTP API.
//!
//! Reads go through a [`ResponseCache`]; every successful mutation drops the
//! cached collections it can affect. Failed calls leave the cache alone.

pub mod cache;
pub mod error;

use learnhub_config::CacheConfig;
use learnhub_core::{
    AccessRequest, AccessState, Course, CourseFilter, CourseUpdate, CreateUser, Credentials,
    DashboardStats, Enrollment, NewCourse, NewUser, PasswordReset, ProgressSummary, StudentCourse,
    User, UserUpdate, WatchedVideos,
};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

pub use cache::{CacheKey, Collection, ResponseCache};
pub use error::ClientError;

use Collection::*;

const PAIR_WRITES: &[Collection] = &[Enrollments, Courses, Users, Requests, Stats];

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct StateBody {
    state: AccessState,
}

#[derive(Debug, Clone)]
pub struct LearnhubClient {
    http: Client,
    base: Url,
    cache: ResponseCache,
}

impl LearnhubClient {
    /// `base_url` is the server root, e.g. `http://localhost:4000`.
    pub fn new(base_url: &str, cache: CacheConfig) -> Result<Self, ClientError> {
        let invalid = || ClientError::InvalidUrl(base_url.to_string());
        let mut base = Url::parse(base_url).map_err(|_| invalid())?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid());
        }
        base.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push("api");
        Ok(Self {
            http: Client::new(),
            base,
            cache: ResponseCache::new(cache),
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// `segments` are appended to `/api`, each percent-encoded.
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .extend(segments);
        Ok(self.http.request(method, url))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        Ok(serde_json::from_value(checked(response).await?)?)
    }

    /// GET through the cache.
    async fn read<T: DeserializeOwned>(
        &self,
        key: CacheKey,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        if let Some(value) = self.cache.get(&key).await {
            debug!(collection = %key.collection, detail = %key.detail, "cache hit");
            return Ok(serde_json::from_value(value)?);
        }
        let value = checked(request.send().await?).await?;
        let decoded = serde_json::from_value(value.clone())?;
        self.cache.insert(key, value).await;
        Ok(decoded)
    }

    async fn write<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        invalidates: &[Collection],
    ) -> Result<T, ClientError> {
        let result = self.send(request).await?;
        self.cache.invalidate(invalidates).await;
        Ok(result)
    }

    pub async fn health(&self) -> Result<(), ClientError> {
        let _: Value = self.send(self.request(Method::GET, &["health"])?).await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<DashboardStats, ClientError> {
        let request = self.request(Method::GET, &["stats"])?;
        self.read(CacheKey::new(Stats, ""), request).await
    }

    /// Courses matching `filter`; each distinct filter is cached separately.
    pub async fn courses(&self, filter: &CourseFilter) -> Result<Vec<Course>, ClientError> {
        let request = self.request(Method::GET, &["courses"])?.query(filter);
        let key = CacheKey::new(Courses, serde_json::to_string(filter)?);
        self.read(key, request).await
    }

    pub async fn course(&self, id: Uuid) -> Result<Course, ClientError> {
        let id = id.to_string();
        let request = self.request(Method::GET, &["courses", &id])?;
        self.read(CacheKey::new(Courses, id), request).await
    }

    pub async fn create_course(&self, new: &NewCourse) -> Result<Course, ClientError> {
        let request = self.request(Method::POST, &["courses"])?.json(new);
        self.write(request, &[Courses, Stats]).await
    }

    pub async fn update_course(&self, id: Uuid, update: &CourseUpdate) -> Result<Course, ClientError> {
        let request = self
            .request(Method::PUT, &["courses", &id.to_string()])?
            .json(update);
        self.write(request, &[Courses, Stats]).await
    }

    pub async fn delete_course(&self, id: Uuid) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, &["courses", &id.to_string()])?;
        let _: Value = self
            .write(request, &[Courses, Enrollments, Requests, Progress, Stats])
            .await?;
        Ok(())
    }

    pub async fn users(&self) -> Result<Vec<User>, ClientError> {
        let request = self.request(Method::GET, &["users"])?;
        self.read(CacheKey::new(Users, ""), request).await
    }

    pub async fn user(&self, id: Uuid) -> Result<User, ClientError> {
        let id = id.to_string();
        let request = self.request(Method::GET, &["users", &id])?;
        self.read(CacheKey::new(Users, id), request).await
    }

    pub async fn create_user(&self, create: &CreateUser) -> Result<User, ClientError> {
        let request = self.request(Method::POST, &["users"])?.json(create);
        self.write(request, &[Users, Stats]).await
    }

    pub async fn update_user(&self, id: Uuid, update: &UserUpdate) -> Result<User, ClientError> {
        let request = self
            .request(Method::PUT, &["users", &id.to_string()])?
            .json(update);
        self.write(request, &[Users, Stats]).await
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, &["users", &id.to_string()])?;
        let _: Value = self
            .write(
                request,
                &[Users, Courses, Enrollments, Requests, Progress, Stats],
            )
            .await?;
        Ok(())
    }

    pub async fn register(&self, new: &NewUser) -> Result<User, ClientError> {
        let request = self.request(Method::POST, &["register"])?.json(new);
        self.write(request, &[Users, Stats]).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<User, ClientError> {
        self.send(self.request(Method::POST, &["login"])?.json(credentials))
            .await
    }

    pub async fn reset_password(&self, reset: &PasswordReset) -> Result<(), ClientError> {
        let request = self.request(Method::POST, &["reset-password"])?.json(reset);
        let _: Value = self.write(request, &[Users]).await?;
        Ok(())
    }

    pub async fn enrollments(&self) -> Result<Vec<Enrollment>, ClientError> {
        let request = self.request(Method::GET, &["enrollments"])?;
        self.read(CacheKey::new(Enrollments, ""), request).await
    }

    /// Course ids `student_id` is enrolled in.
    pub async fn enrollments_for(&self, student_id: Uuid) -> Result<Vec<Uuid>, ClientError> {
        let id = student_id.to_string();
        let request = self.request(Method::GET, &["enrollments", &id])?;
        self.read(CacheKey::new(Enrollments, id), request).await
    }

    pub async fn enroll(&self, pair: StudentCourse) -> Result<(), ClientError> {
        let request = self.request(Method::POST, &["enrollments"])?.json(&pair);
        let _: Value = self.write(request, PAIR_WRITES).await?;
        Ok(())
    }

    pub async fn unenroll(&self, pair: StudentCourse) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, &["enrollments"])?.json(&pair);
        let _: Value = self.write(request, PAIR_WRITES).await?;
        Ok(())
    }

    pub async fn requests(&self, student_id: Option<Uuid>) -> Result<Vec<AccessRequest>, ClientError> {
        let mut request = self.request(Method::GET, &["requests"])?;
        if let Some(id) = student_id {
            request = request.query(&[("studentId", id)]);
        }
        let detail = student_id.map(|id| id.to_string()).unwrap_or_default();
        self.read(CacheKey::new(Requests, detail), request).await
    }

    pub async fn create_request(&self, pair: StudentCourse) -> Result<(), ClientError> {
        let request = self.request(Method::POST, &["requests"])?.json(&pair);
        let _: Value = self.write(request, &[Requests, Stats]).await?;
        Ok(())
    }

    pub async fn delete_request(&self, pair: StudentCourse) -> Result<(), ClientError> {
        let request = self.request(Method::DELETE, &["requests"])?.json(&pair);
        let _: Value = self.write(request, &[Requests, Stats]).await?;
        Ok(())
    }

    pub async fn approve_request(&self, pair: StudentCourse) -> Result<(), ClientError> {
        let request = self
            .request(Method::POST, &["requests", "approve"])?
            .json(&pair);
        let _: Value = self.write(request, PAIR_WRITES).await?;
        Ok(())
    }

    /// Uncached: the state is derived from two collections at once.
    pub async fn access_state(&self, pair: StudentCourse) -> Result<AccessState, ClientError> {
        let request = self.request(
            Method::GET,
            &[
                "access",
                &pair.student_id.to_string(),
                &pair.course_id.to_string(),
            ],
        )?;
        let body: StateBody = self.send(request).await?;
        Ok(body.state)
    }

    pub async fn watched(&self, user_id: Uuid, course_id: Uuid) -> Result<WatchedVideos, ClientError> {
        let (user, course) = (user_id.to_string(), course_id.to_string());
        let request = self.request(Method::GET, &["progress", &user, &course])?;
        self.read(CacheKey::new(Progress, format!("{user}/{course}")), request)
            .await
    }

    pub async fn mark_watched(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        video_id: &str,
    ) -> Result<WatchedVideos, ClientError> {
        let request = self.request(
            Method::POST,
            &[
                "progress",
                &user_id.to_string(),
                &course_id.to_string(),
                video_id,
            ],
        )?;
        self.write(request, &[Progress]).await
    }

    pub async fn progress_summary(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<ProgressSummary, ClientError> {
        let (user, course) = (user_id.to_string(), course_id.to_string());
        let request = self.request(Method::GET, &["progress", &user, &course, "summary"])?;
        self.read(
            CacheKey::new(Progress, format!("{user}/{course}/summary")),
            request,
        )
        .await
    }
}

/// Body of a successful response, or the server's `{error}` as [`ClientError::Api`].
async fn checked(response: Response) -> Result<Value, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let text = response.text().await?;
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
