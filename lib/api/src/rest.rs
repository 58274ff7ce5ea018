use actix_cors::Cors;
use actix_files::NamedFile;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Result as ActixResult};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, error, info};
use wardrobe_core::{CatalogService, DEFAULT_RECOMMENDATIONS};

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

#[derive(Deserialize)]
struct RecommendQuery {
    id: Option<String>,
    count: Option<String>,
}

/// Shared, read-only handler state
pub struct ApiState {
    service: Arc<CatalogService>,
    images_dir: PathBuf,
}

impl ApiState {
    pub fn new(service: Arc<CatalogService>, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            service,
            images_dir: images_dir.into(),
        }
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        service: Arc<CatalogService>,
        images_dir: PathBuf,
        host: String,
        port: u16,
    ) -> std::io::Result<()> {
        let state = web::Data::new(ApiState::new(service, images_dir));

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(state.clone())
                .configure(configure)
        })
        .bind((host, port))?
        .run()
        .await
    }

    /// Run the server on its own thread with a dedicated actix system
    ///
    /// The handle yields the server's exit status, including bind failures.
    pub fn spawn(
        service: Arc<CatalogService>,
        images_dir: PathBuf,
        host: String,
        port: u16,
    ) -> JoinHandle<std::io::Result<()>> {
        std::thread::spawn(move || {
            info!("Starting HTTP server on {}:{}", host, port);
            let sys = actix_web::rt::System::new();
            let result = sys.block_on(RestApi::start(service, images_dir, host, port));
            if let Err(e) = &result {
                error!("HTTP server error: {}", e);
            }
            result
        })
    }
}

/// Register the catalog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/search", web::get().to(search))
        .route("/recommend", web::get().to(recommend))
        .route("/image/{id}", web::get().to(image));
}

async fn home(state: web::Data<ApiState>) -> ActixResult<HttpResponse> {
    let summary = state.service.summary();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Clothing Recommendation API running!",
        "items": summary.items,
        "groups": summary.groups,
    })))
}

async fn search(
    state: web::Data<ApiState>,
    query: web::Query<SearchQuery>,
) -> ActixResult<HttpResponse> {
    let records = state.service.search_records(query.q.as_deref());
    Ok(HttpResponse::Ok().json(records))
}

async fn recommend(
    state: web::Data<ApiState>,
    query: web::Query<RecommendQuery>,
) -> ActixResult<HttpResponse> {
    let id = match query.id.as_deref().map(|raw| raw.trim().parse::<i64>()) {
        Some(Ok(id)) => id,
        Some(Err(_)) => return Ok(bad_request("'id' must be an integer")),
        None => return Ok(bad_request("'id' is required")),
    };

    let count = match query.count.as_deref().map(|raw| raw.trim().parse::<usize>()) {
        Some(Ok(count)) => count,
        Some(Err(_)) => return Ok(bad_request("'count' must be a non-negative integer")),
        None => DEFAULT_RECOMMENDATIONS,
    };

    // Negative ids name no catalog item
    let records = match u64::try_from(id) {
        Ok(id) => state.service.recommend_records(id, count),
        Err(_) => Vec::new(),
    };
    Ok(HttpResponse::Ok().json(records))
}

async fn image(
    req: HttpRequest,
    state: web::Data<ApiState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    // Only numeric ids map to files, so the path never leaves images_dir
    let Ok(id) = path.into_inner().parse::<u64>() else {
        return Ok(image_not_found());
    };

    let file_path = state.images_dir.join(format!("{}.jpg", id));
    match NamedFile::open(&file_path) {
        Ok(file) => Ok(file.into_response(&req)),
        Err(e) => {
            debug!("Image {:?} unavailable: {}", file_path, e);
            Ok(image_not_found())
        }
    }
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": message
    }))
}

fn image_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "Image not found"
    }))
}
