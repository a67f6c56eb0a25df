use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{bson::doc, bson::oid::ObjectId, Client};
use std::sync::Arc;

use crate::db::mongo;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::trip::{Trip, TripForm};
use crate::services::trip_planner_service::TripPlannerService;

const TRIP_HISTORY_LIMIT: i64 = 100;

/*
    /plan_trip and /api/plan_trip
*/
pub async fn plan_trip(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    planner: web::Data<TripPlannerService>,
    form: web::Form<TripForm>,
) -> impl Responder {
    let request = match form.into_inner().into_request() {
        Ok(request) => request,
        Err(err) => return HttpResponse::BadRequest().body(err.to_string()),
    };

    let plan = planner.plan(&request).await;

    // History is best effort and must not hold up the response
    let client = data.into_inner();
    let destination = request.destination.clone();
    actix_web::rt::spawn(async move {
        record_trip(&client, user.user_id, destination).await;
    });

    HttpResponse::Ok().json(plan)
}

/*
    /api/trips
*/
pub async fn list_trips(user: AuthenticatedUser, data: web::Data<Arc<Client>>) -> impl Responder {
    let collection = mongo::trips(&data);

    let cursor = collection
        .find(doc! { "user_id": user.user_id })
        .sort(doc! { "created_at": -1 })
        .limit(TRIP_HISTORY_LIMIT)
        .await;

    match cursor {
        Ok(cursor) => match cursor.try_collect::<Vec<Trip>>().await {
            Ok(trips) => HttpResponse::Ok().json(trips),
            Err(err) => {
                log::error!("Failed to collect trips: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to collect trips.")
            }
        },
        Err(err) => {
            log::error!("Failed to find trips: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to find trips.")
        }
    }
}

async fn record_trip(client: &Client, user_id: ObjectId, destination: String) {
    let trip = Trip {
        id: None,
        destination,
        user_id,
        created_at: Utc::now(),
    };

    if let Err(err) = mongo::trips(client).insert_one(&trip).await {
        log::warn!("Failed to record trip for user {}: {}", user_id, err);
    }
}
