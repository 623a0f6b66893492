//! Web服务器

use axum::{
    routing::{get, post},
    Router,
};
use clinic_core::{Appointment, Assistant, Drug, Patient, Prescription, Result};
use serde::de::DeserializeOwned;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::handlers::{
    api_root, create_record, delete_record, delete_template, get_record, get_template, health,
    list_records, list_templates, save_as_template, update_record, update_template, AppState,
    Resource,
};
use crate::validation::Validate;
use crate::views::{
    apply_template_to_draft, appointments_by_date, dashboard, drug_medication, drug_search,
    patient_overview, patient_search, prescription_search, template_draft, template_search,
};

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        let app = create_app(state);

        Self { addr, app }
    }

    pub async fn run(self) -> Result<()> {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app).await?;

        Ok(())
    }
}

/// 构造完整应用路由
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // 根路径
        .route("/", get(api_root))
        // 健康检查
        .route("/health", get(health))
        // API路由
        .nest("/api/v1", api_routes())
        .with_state(state)
        // 全局中间件
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

/// API v1 路由
fn api_routes() -> Router<AppState> {
    let router = Router::new().route("/", get(api_root));
    let router = resource_routes::<Patient>(router, "/patients");
    let router = resource_routes::<Appointment>(router, "/appointments");
    let router = resource_routes::<Assistant>(router, "/assistants");
    let router = resource_routes::<Drug>(router, "/drugs");
    let router = resource_routes::<Prescription>(router, "/prescriptions");

    router
        .route("/prescriptions/:id/template", post(save_as_template))
        .route("/templates", get(list_templates))
        .route(
            "/templates/:id",
            get(get_template).put(update_template).delete(delete_template),
        )
        .nest("/views", view_routes())
}

/// 单一实体的增删改查路由
fn resource_routes<T>(router: Router<AppState>, path: &str) -> Router<AppState>
where
    T: Resource,
    T::Patch: DeserializeOwned + Validate,
{
    router
        .route(path, get(list_records::<T>).post(create_record::<T>))
        .route(
            &format!("{}/:id", path),
            get(get_record::<T>)
                .put(update_record::<T>)
                .delete(delete_record::<T>),
        )
}

/// 派生视图路由
fn view_routes() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(appointments_by_date))
        .route("/templates", get(template_search))
        .route("/templates/:id/draft", get(template_draft))
        .route("/templates/:id/apply", post(apply_template_to_draft))
        .route("/drugs", get(drug_search))
        .route("/drugs/:id/medication", get(drug_medication))
        .route("/patients", get(patient_search))
        .route("/patients/:id/summary", get(patient_overview))
        .route("/prescriptions", get(prescription_search))
        .route("/dashboard", get(dashboard))
}
