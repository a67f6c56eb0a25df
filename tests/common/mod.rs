#![allow(dead_code)]

use actix_web::{dev::ServiceResponse, test, web, App, HttpRequest, HttpResponse, Responder};
use mongodb::bson::oid::ObjectId;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use planora_api::config::AppConfig;
use planora_api::middleware::auth::issue_token;
use planora_api::routes;
use planora_api::services::emergency_service::EmergencyServiceFinder;
use planora_api::services::http::build_client;
use planora_api::services::trip_planner_service::TripPlannerService;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_KEY: &str = "test-key";

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum EmergencyScenario {
    /// One police station and one hospital
    #[default]
    Staffed,
    /// Valid response without features
    Empty,
    /// Upstream answers 500
    Failing,
}

/// Canned behaviour of the stub upstream.
#[derive(Clone, Default)]
pub struct Scenario {
    pub attraction_count: usize,
    pub emergency: EmergencyScenario,
    /// Image searches containing this text fail with 500
    pub failing_photo: Option<String>,
    pub requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl Scenario {
    pub fn with_attractions(count: usize) -> Self {
        Self {
            attraction_count: count,
            ..Default::default()
        }
    }

    /// Raw query strings received on `path`, in arrival order.
    pub fn queries_for(&self, path: &str) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, q)| q.clone())
            .collect()
    }

    fn record(&self, req: &HttpRequest) {
        self.requests
            .lock()
            .unwrap()
            .push((req.path().to_string(), req.query_string().to_string()));
    }
}

type Query = web::Query<HashMap<String, String>>;

fn known_place(name: &str) -> Option<(f64, f64)> {
    match name.trim().to_lowercase().as_str() {
        "paris" => Some((48.8566, 2.3522)),
        "delhi" => Some((28.6139, 77.2090)),
        "goa" => Some((15.2993, 74.1240)),
        _ => None,
    }
}

async fn nominatim_search(req: HttpRequest, scenario: web::Data<Scenario>, query: Query) -> impl Responder {
    scenario.record(&req);
    let place = query.get("q").cloned().unwrap_or_default();

    if place == "Broken" {
        return HttpResponse::InternalServerError().finish();
    }
    match known_place(&place) {
        // Nominatim sends degrees as strings
        Some((lat, lon)) => HttpResponse::Ok().json(json!([
            { "lat": lat.to_string(), "lon": lon.to_string(), "display_name": place }
        ])),
        None => HttpResponse::Ok().json(json!([])),
    }
}

async fn geoapify_geocode(req: HttpRequest, scenario: web::Data<Scenario>, query: Query) -> impl Responder {
    scenario.record(&req);
    if query.get("apiKey").map(String::as_str) != Some(TEST_KEY) {
        return HttpResponse::Unauthorized().json(json!({ "error": "Unauthorized" }));
    }

    let features: Vec<Value> = query
        .get("text")
        .and_then(|text| known_place(text))
        .map(|(lat, lon)| {
            vec![json!({
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Point", "coordinates": [lon, lat] }
            })]
        })
        .unwrap_or_default();

    HttpResponse::Ok().json(json!({ "type": "FeatureCollection", "features": features }))
}

async fn geoapify_places(req: HttpRequest, scenario: web::Data<Scenario>, query: Query) -> impl Responder {
    scenario.record(&req);
    if query.get("apiKey").map(String::as_str) != Some(TEST_KEY) {
        return HttpResponse::Unauthorized().json(json!({ "error": "Unauthorized" }));
    }

    let categories = query.get("categories").cloned().unwrap_or_default();
    let features: Vec<Value> = if categories == "tourism.attraction" {
        (0..scenario.attraction_count)
            .map(|i| {
                json!({
                    "type": "Feature",
                    "properties": {
                        "name": format!("Attraction {}", i),
                        "formatted": format!("{} Rue de Test, Paris", i + 1),
                        "categories": ["tourism.attraction"]
                    },
                    "geometry": { "type": "Point", "coordinates": [2.35 + i as f64 * 0.001, 48.85] }
                })
            })
            .collect()
    } else {
        match scenario.emergency {
            EmergencyScenario::Failing => return HttpResponse::InternalServerError().finish(),
            EmergencyScenario::Empty => Vec::new(),
            EmergencyScenario::Staffed => vec![
                json!({
                    "properties": {
                        "name": "City Police Station",
                        "formatted": "1 Police Road",
                        "categories": ["public_service.police"]
                    },
                    "geometry": { "coordinates": [2.351, 48.857] }
                }),
                json!({
                    "properties": {
                        "name": "General Hospital",
                        "formatted": "2 Hospital Road",
                        "categories": ["healthcare.hospital", "healthcare"],
                        "contact:phone": "+33 1 23 45 67 89"
                    },
                    "geometry": { "coordinates": [2.353, 48.858] }
                }),
            ],
        }
    };

    HttpResponse::Ok().json(json!({ "type": "FeatureCollection", "features": features }))
}

async fn unsplash_search(req: HttpRequest, scenario: web::Data<Scenario>, query: Query) -> impl Responder {
    scenario.record(&req);
    let search = query.get("query").cloned().unwrap_or_default();

    if let Some(failing) = &scenario.failing_photo {
        if search.contains(failing.as_str()) {
            return HttpResponse::InternalServerError().finish();
        }
    }

    let slug = search.replace(' ', "-").to_lowercase();
    HttpResponse::Ok().json(json!({
        "total": 1,
        "results": [ { "urls": { "regular": format!("https://images.example/{}.jpg", slug) } } ]
    }))
}

/// Starts the stub upstream on an ephemeral port and returns its base URL.
pub fn start_stub(scenario: Scenario) -> String {
    let scenario = web::Data::new(scenario);

    let server = actix_web::HttpServer::new(move || {
        App::new()
            .app_data(scenario.clone())
            .route("/search", web::get().to(nominatim_search))
            .route("/v1/geocode/search", web::get().to(geoapify_geocode))
            .route("/v2/places", web::get().to(geoapify_places))
            .route("/search/photos", web::get().to(unsplash_search))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind stub upstream");

    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());

    format!("http://{}", addr)
}

/// Config pointing every upstream at `base_url`, with all keys present.
pub fn test_config(base_url: &str) -> AppConfig {
    AppConfig {
        jwt_secret: TEST_SECRET.to_string(),
        geoapify_api_key: Some(TEST_KEY.to_string()),
        unsplash_access_key: Some(TEST_KEY.to_string()),
        nominatim_url: base_url.to_string(),
        geoapify_url: base_url.to_string(),
        unsplash_url: base_url.to_string(),
        request_timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

pub fn planner(config: &AppConfig) -> TripPlannerService {
    TripPlannerService::new(config, build_client(config).unwrap())
}

pub struct TestApp {
    pub config: AppConfig,
    pub client: Arc<mongodb::Client>,
}

impl TestApp {
    pub async fn new(config: AppConfig) -> Self {
        // Nothing needs to listen here; only trip history writes touch it
        let client = mongodb::Client::with_uri_str(
            "mongodb://127.0.0.1:27017/?serverSelectionTimeoutMS=200",
        )
        .await
        .unwrap();

        Self {
            config,
            client: Arc::new(client),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let http_client = build_client(&self.config).unwrap();

        App::new()
            .app_data(web::Data::new(self.config.clone()))
            .app_data(web::Data::new(self.client.clone()))
            .app_data(web::Data::new(TripPlannerService::new(
                &self.config,
                http_client.clone(),
            )))
            .app_data(web::Data::new(EmergencyServiceFinder::new(
                &self.config,
                http_client,
            )))
            .configure(routes::configure)
    }
}

pub fn bearer_token() -> String {
    let token = issue_token(TEST_SECRET, "asha@example.com", &ObjectId::new().to_hex()).unwrap();
    format!("Bearer {}", token)
}

/// Status of a request, whether the service answered or a middleware rejected it.
pub async fn status_of<S>(app: &S, req: actix_http::Request) -> actix_web::http::StatusCode
where
    S: actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => resp.status(),
        Err(err) => err.error_response().status(),
    }
}
