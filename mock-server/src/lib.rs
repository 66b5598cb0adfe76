//! In-memory stand-in for the parts of the Vimeo API the client uses.
//!
//! API routes require a bearer token and answer with rate-limit headers.
//! Upload tickets point at `/upload/pictures/{id}` on the same host; that
//! route refuses requests that carry an `Authorization` header, like a
//! pre-signed link would.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    body::Bytes,
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub const RATE_LIMIT: u64 = 250;
pub const RATE_LIMIT_RESET: &str = "2030-01-01T00:00:00+00:00";
pub const PER_PAGE: u32 = 25;
/// Embed presets every seeded video may be switched to.
pub const EMBED_PRESETS: &[u64] = &[1234, 5678];
/// Videos present in a freshly seeded store.
pub const SEEDED_VIDEOS: &[u64] = &[42, 7];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
    pub link: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Picture {
    pub active: bool,
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub sizes: Vec<Size>,
    pub link: Option<String>,
    pub resource_key: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PrivacyDomain {
    pub domain: String,
    pub allow_hd: bool,
    pub uri: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Paging {
    pub next: Option<String>,
    pub previous: Option<String>,
    pub first: String,
    pub last: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub total: u32,
    pub page: u32,
    pub per_page: u32,
    pub paging: Paging,
    pub data: Vec<T>,
}

/// Bytes received on an upload link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceivedUpload {
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub bytes: usize,
}

#[derive(Debug, Default)]
pub struct Video {
    pub pictures: BTreeMap<u64, Picture>,
    pub domains: BTreeMap<String, PrivacyDomain>,
    pub embed_preset: Option<u64>,
}

#[derive(Debug, Default)]
pub struct Store {
    pub videos: HashMap<u64, Video>,
    /// Ticket picture id → owning video.
    pub tickets: HashMap<u64, u64>,
    pub uploads: HashMap<u64, ReceivedUpload>,
    pub api_calls: u64,
    next_picture_id: u64,
}

impl Store {
    pub fn with_videos(ids: &[u64]) -> Self {
        Self {
            videos: ids.iter().map(|id| (*id, Video::default())).collect(),
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_picture_id += 1;
        self.next_picture_id
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn seeded_db() -> Db {
    Arc::new(RwLock::new(Store::with_videos(SEEDED_VIDEOS)))
}

pub fn app() -> Router {
    router(seeded_db())
}

pub fn router(db: Db) -> Router {
    let api = Router::new()
        .route(
            "/videos/{clip_id}/pictures",
            get(list_pictures).post(create_picture_ticket),
        )
        .route(
            "/videos/{clip_id}/pictures/{picture_id}",
            get(get_picture).patch(update_picture).delete(delete_picture),
        )
        .route("/videos/{clip_id}/privacy/domains", get(list_domains))
        .route(
            "/videos/{clip_id}/privacy/domains/{domain}",
            put(add_domain).delete(delete_domain),
        )
        .route(
            "/videos/{clip_id}/presets/{preset_id}",
            put(update_embed_preset),
        )
        .layer(middleware::from_fn_with_state(db.clone(), api_guard));

    Router::new()
        .route("/upload/pictures/{picture_id}", put(receive_upload))
        .merge(api)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, router(db)).await
}

/// Bearer check plus rate-limit headers on every API response.
async fn api_guard(State(db): State<Db>, request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.get(..7).filter(|p| p.eq_ignore_ascii_case("bearer ")).map(|_| &v[7..]))
        .is_some_and(|token| !token.trim().is_empty());
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let remaining = {
        let mut store = db.write().await;
        store.api_calls += 1;
        RATE_LIMIT.saturating_sub(store.api_calls)
    };

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(RATE_LIMIT));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
    headers.insert(
        "x-ratelimit-reset",
        HeaderValue::from_static(RATE_LIMIT_RESET),
    );
    response
}

fn page<T>(items: Vec<T>, base: String) -> Page<T> {
    Page {
        total: items.len() as u32,
        page: 1,
        per_page: PER_PAGE,
        paging: Paging {
            next: None,
            previous: None,
            first: format!("{base}?page=1"),
            last: format!("{base}?page=1"),
        },
        data: items,
    }
}

async fn list_pictures(
    State(db): State<Db>,
    Path(clip_id): Path<u64>,
) -> Result<Json<Page<Picture>>, StatusCode> {
    let store = db.read().await;
    let video = store.videos.get(&clip_id).ok_or(StatusCode::NOT_FOUND)?;
    let pictures = video.pictures.values().cloned().collect();
    Ok(Json(page(pictures, format!("/videos/{clip_id}/pictures"))))
}

#[derive(Debug, Deserialize)]
pub struct TicketQuery {
    pub time: Option<f32>,
    pub active: Option<bool>,
}

async fn create_picture_ticket(
    State(db): State<Db>,
    Path(clip_id): Path<u64>,
    Query(query): Query<TicketQuery>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Picture>), StatusCode> {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::BAD_REQUEST)?
        .to_string();

    let mut store = db.write().await;
    if !store.videos.contains_key(&clip_id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let id = store.next_id();
    let picture = Picture {
        active: query.active.unwrap_or(false),
        uri: format!("/videos/{clip_id}/pictures/{id}"),
        kind: "custom".to_string(),
        sizes: Vec::new(),
        link: Some(format!("http://{host}/upload/pictures/{id}")),
        resource_key: format!("rk{id:08x}"),
    };
    store.tickets.insert(id, clip_id);
    if let Some(video) = store.videos.get_mut(&clip_id) {
        video.pictures.insert(id, picture.clone());
    }
    Ok((StatusCode::CREATED, Json(picture)))
}

async fn get_picture(
    State(db): State<Db>,
    Path((clip_id, picture_id)): Path<(u64, u64)>,
) -> Result<Json<Picture>, StatusCode> {
    let store = db.read().await;
    store
        .videos
        .get(&clip_id)
        .and_then(|v| v.pictures.get(&picture_id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[derive(Debug, Deserialize)]
pub struct ActiveQuery {
    pub active: Option<bool>,
}

async fn update_picture(
    State(db): State<Db>,
    Path((clip_id, picture_id)): Path<(u64, u64)>,
    Query(query): Query<ActiveQuery>,
) -> Result<Json<Picture>, StatusCode> {
    let mut store = db.write().await;
    let video = store.videos.get_mut(&clip_id).ok_or(StatusCode::NOT_FOUND)?;
    if !video.pictures.contains_key(&picture_id) {
        return Err(StatusCode::NOT_FOUND);
    }
    if let Some(active) = query.active {
        // Only one picture can be the active thumbnail.
        if active {
            for picture in video.pictures.values_mut() {
                picture.active = false;
            }
        }
        if let Some(picture) = video.pictures.get_mut(&picture_id) {
            picture.active = active;
        }
    }
    video
        .pictures
        .get(&picture_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_picture(
    State(db): State<Db>,
    Path((clip_id, picture_id)): Path<(u64, u64)>,
) -> StatusCode {
    let mut store = db.write().await;
    let removed = store
        .videos
        .get_mut(&clip_id)
        .and_then(|v| v.pictures.remove(&picture_id));
    match removed {
        Some(_) => {
            store.tickets.remove(&picture_id);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn receive_upload(
    State(db): State<Db>,
    Path(picture_id): Path<u64>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if headers.contains_key(header::AUTHORIZATION) {
        return StatusCode::BAD_REQUEST;
    }
    let mut store = db.write().await;
    let Some(clip_id) = store.tickets.get(&picture_id).copied() else {
        return StatusCode::NOT_FOUND;
    };

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let content_length = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());
    tracing::debug!(picture_id, bytes = body.len(), "upload received");
    store.uploads.insert(
        picture_id,
        ReceivedUpload {
            content_type,
            content_length,
            bytes: body.len(),
        },
    );
    if let Some(picture) = store
        .videos
        .get_mut(&clip_id)
        .and_then(|v| v.pictures.get_mut(&picture_id))
    {
        picture.sizes = vec![Size {
            width: 640,
            height: 360,
            link: format!("https://i.vimeocdn.test/video/{picture_id}_640x360.jpg"),
        }];
    }
    StatusCode::OK
}

async fn list_domains(
    State(db): State<Db>,
    Path(clip_id): Path<u64>,
) -> Result<Json<Page<PrivacyDomain>>, StatusCode> {
    let store = db.read().await;
    let video = store.videos.get(&clip_id).ok_or(StatusCode::NOT_FOUND)?;
    let domains = video.domains.values().cloned().collect();
    Ok(Json(page(domains, format!("/videos/{clip_id}/privacy/domains"))))
}

async fn add_domain(
    State(db): State<Db>,
    Path((clip_id, domain)): Path<(u64, String)>,
) -> StatusCode {
    let mut store = db.write().await;
    let Some(video) = store.videos.get_mut(&clip_id) else {
        return StatusCode::NOT_FOUND;
    };
    let entry = PrivacyDomain {
        uri: format!("/videos/{clip_id}/privacy/domains/{domain}"),
        domain: domain.clone(),
        allow_hd: true,
    };
    video.domains.insert(domain, entry);
    StatusCode::NO_CONTENT
}

async fn delete_domain(
    State(db): State<Db>,
    Path((clip_id, domain)): Path<(u64, String)>,
) -> StatusCode {
    let mut store = db.write().await;
    match store
        .videos
        .get_mut(&clip_id)
        .and_then(|v| v.domains.remove(&domain))
    {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

async fn update_embed_preset(
    State(db): State<Db>,
    Path((clip_id, preset_id)): Path<(u64, u64)>,
) -> StatusCode {
    if !EMBED_PRESETS.contains(&preset_id) {
        return StatusCode::NOT_FOUND;
    }
    let mut store = db.write().await;
    match store.videos.get_mut(&clip_id) {
        Some(video) => {
            video.embed_preset = Some(preset_id);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}
