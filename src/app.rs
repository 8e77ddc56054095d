// app.rs - Shared state and router assembly
//
// Public routes sit at the root; everything else is nested under
// /api/{version} behind the bearer-token gate.

use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenVerifier;
use crate::config::{ApiConfig, AppConfig};
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, security_headers_middleware};

const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub verifier: Arc<TokenVerifier>,
    pub api: ApiConfig,
}

impl AppState {
    pub fn new(pool: PgPool, verifier: TokenVerifier, api: ApiConfig) -> Self {
        Self {
            pool,
            verifier: Arc::new(verifier),
            api,
        }
    }
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    let protected = protected_routes()
        .route_layer(from_fn_with_state(state.verifier.clone(), jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected API
        .nest(&config.api_prefix(), protected)
        // Global middleware
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(&config.security.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn protected_routes() -> Router<AppState> {
    use protected::{budgets, categories, dashboard, goals, transactions};

    Router::new()
        // Categories
        .route("/categories", post(categories::create).get(categories::list))
        .route(
            "/categories/:id",
            get(categories::get).put(categories::update).delete(categories::delete),
        )
        // Transactions
        .route("/transactions", post(transactions::create).get(transactions::list))
        .route(
            "/transactions/:id",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        // Budgets; the static segment wins over :id
        .route("/budgets", post(budgets::create).get(budgets::list))
        .route("/budgets/with-spent", get(budgets::with_spent))
        .route(
            "/budgets/:id",
            get(budgets::get).put(budgets::update).delete(budgets::delete),
        )
        // Goals
        .route("/goals", post(goals::create).get(goals::list))
        .route(
            "/goals/:id",
            get(goals::get).put(goals::update).delete(goals::delete),
        )
        .route("/goals/:id/contribute", post(goals::contribute))
        // Dashboard
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/dashboard/expenses-by-category", get(dashboard::expenses_by_category))
        .route("/dashboard/monthly-data", get(dashboard::monthly_data))
        .route("/dashboard/daily-data", get(dashboard::daily_data))
        .route("/dashboard/recent-transactions", get(dashboard::recent_transactions))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}
