use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{delete, get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, state::AppState, utils::Config};

pub fn create_router(state: AppState) -> Router {
    let cors_layer = create_cors_layer(&state.config);

    Router::new()
        .route("/health", get(health_check))
        // Skill catalog
        .route("/api/skills", get(handlers::catalog::list_skills))
        .route("/api/skill-categories", get(handlers::catalog::list_categories))
        // Profiles and skill inventory
        .route(
            "/api/profile",
            get(handlers::profiles::get_profile).put(handlers::profiles::update_profile),
        )
        .route("/api/profiles/{user_id}", get(handlers::profiles::get_public_profile))
        .route(
            "/api/profile/skills",
            get(handlers::profiles::list_skills).post(handlers::profiles::save_skill),
        )
        .route("/api/profile/skills/{id}", delete(handlers::profiles::delete_skill))
        // Listing board
        .route(
            "/api/listings",
            get(handlers::listings::list_listings).post(handlers::listings::create_listing),
        )
        .route("/api/listings/{id}/close", post(handlers::listings::close_listing))
        // Offer negotiation
        .route(
            "/api/offers",
            get(handlers::offers::list_offers).post(handlers::offers::propose_offer),
        )
        .route("/api/offers/{id}/accept", post(handlers::offers::accept_offer))
        .route("/api/offers/{id}/reject", post(handlers::offers::reject_offer))
        .route("/api/offers/{id}/complete", post(handlers::offers::complete_offer))
        // Messaging
        .route("/api/conversations", get(handlers::messages::list_conversations))
        .route("/api/conversations/{partner_id}", get(handlers::messages::open_conversation))
        .route("/api/messages", post(handlers::messages::send_message))
        // Fairness calculator
        .route("/api/fairness", post(handlers::fairness::calculate))
        .route("/api/fairness/rates", get(handlers::fairness::rates))
        // Strategy generator and relays
        .route("/api/strategy", post(handlers::relay::generate_strategy))
        .route("/api/strategy/progress", post(handlers::relay::strategy_progress))
        .route("/functions/get-secret", post(handlers::relay::get_secret))
        .route("/functions/generate-hashtags", post(handlers::relay::generate_hashtags))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

fn create_cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    let origins: Vec<HeaderValue> = config
        .origins()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        // Default to permissive for development
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::issue_token,
        constants::*,
        error::AppError,
        services::gemini::{GenerationConfig, TextGenerator},
        store::MemoryStore,
    };
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        extract::ConnectInfo,
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::{net::SocketAddr, sync::Arc};
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "router-test-secret";

    struct CannedGenerator;

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str, config: Option<GenerationConfig>) -> Result<String, AppError> {
            match config {
                Some(_) => Ok("marketing, #growth, ".to_string()),
                None => Ok("## Plan\n\n- post daily\n- reply fast".to_string()),
            }
        }
    }

    fn config(api_key: Option<&str>, rate_limit: u32) -> Config {
        Config {
            database_url: "postgres://localhost/skillswap".to_string(),
            port: DEFAULT_SERVER_PORT,
            jwt_secret: SECRET.to_string(),
            jwt_audience: DEFAULT_JWT_AUDIENCE.to_string(),
            gemini_api_key: api_key.map(String::from),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            allowed_origins: None,
            relay_rate_limit_per_minute: rate_limit,
            trust_forwarded_headers: false,
        }
    }

    fn app_with(store: Arc<MemoryStore>, config: Config) -> Router {
        create_router(AppState::new(store, Arc::new(CannedGenerator), config))
    }

    fn token(user_id: Uuid) -> String {
        issue_token(user_id, SECRET, DEFAULT_JWT_AUDIENCE, chrono::Duration::minutes(10)).unwrap()
    }

    fn request(method: &str, uri: &str, user: Option<Uuid>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user {
            builder = builder.header("authorization", format!("Bearer {}", token(user_id)));
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(Arc::new(MemoryStore::new()), config(None, 10));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_requires_session() {
        let app = app_with(Arc::new(MemoryStore::new()), config(None, 10));
        let (status, body) = send(&app, request("GET", "/api/listings", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_listing_offer_flow() {
        let store = Arc::new(MemoryStore::new());
        let web = store.add_skill("Web Development", None).await.id;
        let logo = store.add_skill("Logo Design", None).await.id;
        let app = app_with(store, config(None, 10));
        let owner = Uuid::new_v4();
        let proposer = Uuid::new_v4();

        let (status, listing) = send(
            &app,
            request(
                "POST",
                "/api/listings",
                Some(owner),
                Some(json!({
                    "title": "Website for a logo",
                    "description": "A small marketing site in exchange for a logo",
                    "offering_skill_id": web,
                    "needing_skill_id": logo,
                    "estimated_hours": 12,
                    "delivery_time": "2 weeks"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(listing["status"], "active");

        let (status, board) = send(&app, request("GET", "/api/listings?search=logo", Some(proposer), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(board.as_array().map(Vec::len), Some(1));
        assert_eq!(board[0]["owner_name"], ANONYMOUS_DISPLAY_NAME);

        let (status, offer) = send(
            &app,
            request(
                "POST",
                "/api/offers",
                Some(proposer),
                Some(json!({
                    "listing_id": listing["id"],
                    "offering_skill_id": logo,
                    "needing_skill_id": web,
                    "proposed_hours": 10,
                    "proposed_delivery_time": "10 days",
                    "message": "I can design the logo next week"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(offer["status"], "pending");
        let offer_id = offer["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            request("POST", &format!("/api/offers/{offer_id}/accept"), Some(proposer), None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, accepted) = send(
            &app,
            request("POST", &format!("/api/offers/{offer_id}/accept"), Some(owner), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(accepted["status"], "accepted");

        let (status, _) = send(
            &app,
            request("POST", &format!("/api/offers/{offer_id}/reject"), Some(owner), None),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, offers) = send(&app, request("GET", "/api/offers", Some(owner), None)).await;
        assert_eq!(offers[0]["listing_title"], "Website for a logo");
    }

    #[tokio::test]
    async fn test_validation_errors_are_422_with_fields() {
        let app = app_with(Arc::new(MemoryStore::new()), config(None, 10));
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/api/listings",
                Some(Uuid::new_v4()),
                Some(json!({
                    "title": "Logo",
                    "description": "short",
                    "offering_skill_id": null,
                    "needing_skill_id": null,
                    "estimated_hours": 0,
                    "delivery_time": ""
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["fields"]["title"].is_array());
        assert!(body["fields"]["estimated_hours"].is_array());
    }

    #[tokio::test]
    async fn test_messages_mark_read_on_open() {
        let app = app_with(Arc::new(MemoryStore::new()), config(None, 10));
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let (status, _) = send(
            &app,
            request("POST", "/api/messages", Some(b), Some(json!({ "recipient_id": a, "content": "hello" }))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, inbox) = send(&app, request("GET", "/api/conversations", Some(a), None)).await;
        assert_eq!(inbox[0]["unread_count"], 1);

        let (status, thread) = send(&app, request("GET", &format!("/api/conversations/{b}"), Some(a), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(thread[0]["read_at"].is_string());

        let (_, inbox) = send(&app, request("GET", "/api/conversations", Some(a), None)).await;
        assert_eq!(inbox[0]["unread_count"], 0);
    }

    #[tokio::test]
    async fn test_fairness_endpoint() {
        let app = app_with(Arc::new(MemoryStore::new()), config(None, 10));
        let (status, report) = send(
            &app,
            request(
                "POST",
                "/api/fairness",
                None,
                Some(json!({
                    "yours": { "skill": "Web Development", "hours": 10, "level": "Expert" },
                    "theirs": { "skill": "Content Writing", "hours": 10, "level": "beginner" }
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["verdict"], "Favors You");
        assert_eq!(report["fairness_percentage"], 0);
        assert_eq!(report["difference"], 955.0);

        let (status, rates) = send(&app, request("GET", "/api/fairness/rates", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rates["levels"].as_array().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn test_get_secret_contract() {
        let user = Some(Uuid::new_v4());

        let app = app_with(Arc::new(MemoryStore::new()), config(Some("k-123"), 10));
        let (status, body) = send(
            &app,
            request("POST", "/functions/get-secret", user, Some(json!({ "secretName": "GEMINI_API_KEY" }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["publicData"]["secret"], "k-123");

        let (status, _) = send(
            &app,
            request("POST", "/functions/get-secret", user, Some(json!({ "secretName": "DATABASE_URL" }))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, request("POST", "/functions/get-secret", user, Some(json!("nope")))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let keyless = app_with(Arc::new(MemoryStore::new()), config(None, 10));
        let (status, body) = send(
            &keyless,
            request("POST", "/functions/get-secret", user, Some(json!({ "secretName": "GEMINI_API_KEY" }))),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_hashtags_are_normalized() {
        let app = app_with(Arc::new(MemoryStore::new()), config(Some("k-123"), 10));
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/functions/generate-hashtags",
                None,
                Some(json!({
                    "businessName": "Acme",
                    "industry": "Retail",
                    "platforms": ["Instagram"],
                    "goals": [],
                    "targetAudience": "Students"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hashtags"], json!(["#marketing", "#growth"]));

        let keyless = app_with(Arc::new(MemoryStore::new()), config(None, 10));
        let (status, _) = send(
            &keyless,
            request("POST", "/functions/generate-hashtags", None, Some(json!({ "businessName": "Acme" }))),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    fn hashtag_request_from(peer: [u8; 4], forwarded_for: &str) -> Request<Body> {
        let mut req = request(
            "POST",
            "/functions/generate-hashtags",
            None,
            Some(json!({ "businessName": "Acme" })),
        );
        req.headers_mut().insert("x-forwarded-for", forwarded_for.parse().unwrap());
        req.extensions_mut().insert(ConnectInfo(SocketAddr::from((peer, 40000))));
        req
    }

    #[tokio::test]
    async fn test_relay_limit_keys_on_peer_not_forwarded_for() {
        let app = app_with(Arc::new(MemoryStore::new()), config(Some("k-123"), 1));

        let mut allowed = 0;
        for n in 0..10 {
            let (status, _) = send(&app, hashtag_request_from([192, 0, 2, 10], &format!("198.51.100.{n}"))).await;
            if status == StatusCode::OK {
                allowed += 1;
            } else {
                assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
            }
        }
        assert_eq!(allowed, 1);

        let (status, _) = send(&app, hashtag_request_from([192, 0, 2, 11], "198.51.100.1")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_relay_limit_uses_forwarded_for_behind_trusted_proxy() {
        let mut trusted = config(Some("k-123"), 1);
        trusted.trust_forwarded_headers = true;
        let app = app_with(Arc::new(MemoryStore::new()), trusted);

        let (status, _) = send(&app, hashtag_request_from([10, 0, 0, 1], "198.51.100.1")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, hashtag_request_from([10, 0, 0, 1], "198.51.100.2")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, hashtag_request_from([10, 0, 0, 1], "198.51.100.1")).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_strategy_generation_and_rate_limit() {
        let app = app_with(Arc::new(MemoryStore::new()), config(Some("k-123"), 1));
        let profile = json!({
            "businessName": "Acme Coffee",
            "industry": "Food",
            "businessDescription": "Roastery",
            "uniqueSellingPoint": "Fresh",
            "audience": "Commuters",
            "brandPersonality": "Warm",
            "platforms": ["Instagram"]
        });

        let (status, body) = send(&app, request("POST", "/api/strategy", None, Some(profile.clone()))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["export_file_stem"], "social-media-strategy-Acme-Coffee");
        assert_eq!(body["blocks"][0]["type"], "heading");
        assert_eq!(body["blocks"][1]["items"], json!(["post daily", "reply fast"]));

        let (status, _) = send(&app, request("POST", "/api/strategy", None, Some(profile))).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_strategy_progress_reports_current_step() {
        let app = app_with(Arc::new(MemoryStore::new()), config(None, 1));
        let partial = json!({
            "businessName": "Acme Coffee",
            "industry": "Food",
            "businessDescription": "Roastery",
            "uniqueSellingPoint": "Fresh"
        });

        // not rate limited and needs no key
        for _ in 0..2 {
            let (status, body) = send(&app, request("POST", "/api/strategy/progress", None, Some(partial.clone()))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["current_step"], "audience_and_goals");
            assert_eq!(body["previous_step"], "business_details");
            assert_eq!(body["steps"][0]["title"], "Business Details");
            assert_eq!(body["steps"][0]["complete"], true);
            assert_eq!(body["ready"], false);
        }
    }
}
