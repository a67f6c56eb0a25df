use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use mongodb::bson::{doc, to_bson, Bson, Document};
use mongodb::error::{ErrorKind, WriteError, WriteFailure};
use mongodb::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::mongo;
use crate::middleware::auth::issue_token;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::user::{Credentials, ProfileUpdate, User, UserSession};

const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

/*
    /api/auth/signup
*/
pub async fn signup(
    data: web::Data<Arc<Client>>,
    config: web::Data<AppConfig>,
    input: web::Json<User>,
) -> impl Responder {
    let collection = mongo::users(&data);

    let mut user = input.into_inner();
    user.email = user.email.trim().to_lowercase();

    if !is_valid_email(&user.email) {
        return HttpResponse::BadRequest().body("Invalid email address");
    }
    if user.name.trim().is_empty() || user.password.is_empty() {
        return HttpResponse::BadRequest().body("Name and password are required");
    }

    user.password = match bcrypt::hash(&user.password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(err) => {
            log::error!("Failed to hash password: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to create account");
        }
    };
    let curr_time = Utc::now();
    user.id = None;
    user.created_at = Some(curr_time);
    user.updated_at = Some(curr_time);

    match collection.insert_one(&user).await {
        Ok(result) => {
            let Some(user_id) = result.inserted_id.as_object_id() else {
                return HttpResponse::InternalServerError().body("Failed to create account");
            };
            token_response(&config, &user.email, &user_id.to_hex())
        }
        Err(err) if is_duplicate_key(&err) => {
            HttpResponse::Conflict().body("Email already registered")
        }
        Err(err) => {
            log::error!("Failed to insert user: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create account")
        }
    }
}

/*
    /api/auth/signin
*/
pub async fn signin(
    data: web::Data<Arc<Client>>,
    config: web::Data<AppConfig>,
    input: web::Json<Credentials>,
) -> impl Responder {
    let collection = mongo::users(&data);
    let credentials = input.into_inner();
    let email = credentials.email.trim().to_lowercase();

    match collection.find_one(doc! { "email": &email }).await {
        Ok(Some(user)) => {
            if !bcrypt::verify(&credentials.password, &user.password).unwrap_or(false) {
                return HttpResponse::Unauthorized().body("Invalid email or password");
            }
            match user.id {
                Some(user_id) => token_response(&config, &user.email, &user_id.to_hex()),
                None => HttpResponse::InternalServerError().body("Failed to process signin"),
            }
        }
        Ok(None) => HttpResponse::Unauthorized().body("Invalid email or password"),
        Err(err) => {
            log::error!("Database error during signin: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to process signin")
        }
    }
}

/*
    /api/auth/session
*/
pub async fn user_session(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let collection = mongo::users(&data);

    match collection.find_one(doc! { "_id": user.user_id }).await {
        Ok(Some(found)) => HttpResponse::Ok().json(UserSession {
            id: found.id.unwrap_or(user.user_id),
            name: found.name,
            email: found.email,
            location: found.location,
            created_at: found.created_at.unwrap_or_default(),
        }),
        Ok(None) => HttpResponse::NotFound().body("User not found"),
        Err(err) => {
            log::error!("Failed to fetch user: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch user")
        }
    }
}

/*
    /api/account
*/
pub async fn update_profile(
    user: AuthenticatedUser,
    data: web::Data<Arc<Client>>,
    input: web::Json<ProfileUpdate>,
) -> impl Responder {
    let update = input.into_inner();

    // Same representation as the timestamps written at signup
    let updated_at = match to_bson(&Utc::now()) {
        Ok(updated_at) => updated_at,
        Err(err) => {
            log::error!("Failed to encode timestamp: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to update profile");
        }
    };

    let changes = match profile_changes(update, updated_at) {
        Ok(changes) => changes,
        Err(message) => return HttpResponse::BadRequest().body(message),
    };

    let collection = mongo::users(&data);
    match collection
        .update_one(doc! { "_id": user.user_id }, doc! { "$set": changes })
        .await
    {
        Ok(result) if result.matched_count == 0 => {
            HttpResponse::NotFound().body("User not found")
        }
        Ok(_) => HttpResponse::Ok().body("Profile updated successfully"),
        Err(err) if is_duplicate_key(&err) => {
            HttpResponse::Conflict().body("Email already registered")
        }
        Err(err) => {
            log::error!("Failed to update profile: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to update profile")
        }
    }
}

/// `$set` document for the provided, non-blank profile fields.
fn profile_changes(update: ProfileUpdate, updated_at: Bson) -> Result<Document, &'static str> {
    let mut changes = Document::new();

    if let Some(name) = update.name.map(|n| n.trim().to_string()) {
        if name.is_empty() {
            return Err("Name cannot be empty");
        }
        changes.insert("name", name);
    }
    if let Some(email) = update.email.map(|e| e.trim().to_lowercase()) {
        if !is_valid_email(&email) {
            return Err("Invalid email address");
        }
        changes.insert("email", email);
    }
    if let Some(location) = update.location {
        changes.insert("location", location.trim());
    }

    if changes.is_empty() {
        return Err("Nothing to update");
    }
    changes.insert("updated_at", updated_at);
    Ok(changes)
}

fn token_response(config: &AppConfig, email: &str, user_id: &str) -> HttpResponse {
    match issue_token(&config.jwt_secret, email, user_id) {
        Ok(token) => HttpResponse::Ok().json(TokenResponse { auth_token: token }),
        Err(err) => {
            log::error!("Token generation failed: {:?}", err);
            HttpResponse::InternalServerError().body("Token generation failed")
        }
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError { code, .. })) if *code == DUPLICATE_KEY
    )
}

fn is_valid_email(email: &str) -> bool {
    let re = regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
    );
    re.map(|re| re.is_match(email)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("traveller@planora.in"));
        assert!(!is_valid_email("traveller.planora.in"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_profile_changes_only_sets_provided_fields() {
        let changes = profile_changes(
            ProfileUpdate {
                name: Some(" Asha ".to_string()),
                email: None,
                location: Some("Pune".to_string()),
            },
            to_bson(&Utc::now()).unwrap(),
        )
        .unwrap();

        assert_eq!(changes.get_str("name").unwrap(), "Asha");
        assert_eq!(changes.get_str("location").unwrap(), "Pune");
        assert!(changes.get("email").is_none());
        assert!(changes.get("updated_at").is_some());
    }

    #[test]
    fn test_profile_changes_rejects_bad_input() {
        let now = to_bson(&Utc::now()).unwrap();
        assert!(profile_changes(ProfileUpdate::default(), now.clone()).is_err());
        assert!(profile_changes(
            ProfileUpdate {
                email: Some("nope".to_string()),
                ..Default::default()
            },
            now,
        )
        .is_err());
    }

    #[test]
    fn test_updated_at_matches_signup_format() {
        let now = Utc::now();
        let user = User {
            id: None,
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            location: None,
            password: "hash".to_string(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        let stored = mongodb::bson::to_document(&user).unwrap();

        let changes = profile_changes(
            ProfileUpdate {
                location: Some("Goa".to_string()),
                ..Default::default()
            },
            to_bson(&now).unwrap(),
        )
        .unwrap();

        assert_eq!(changes.get("updated_at"), stored.get("created_at"));
        assert!(changes.get_str("updated_at").unwrap().ends_with('Z'));
    }
}
