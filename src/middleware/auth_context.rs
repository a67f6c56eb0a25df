use std::future::{ready, Ready};

use actix_web::{
    dev::Payload, error::ErrorUnauthorized, Error, FromRequest, HttpMessage, HttpRequest,
};
use mongodb::bson::oid::ObjectId;

use crate::middleware::auth::Claims;

/// The signed-in user, taken from claims placed by `AuthMiddleware`.
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub user_id: ObjectId,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<Claims>().and_then(|claims| {
            ObjectId::parse_str(&claims.user_id)
                .ok()
                .map(|user_id| AuthenticatedUser {
                    user_id,
                    email: claims.sub.clone(),
                })
        });

        match user {
            Some(user) => ready(Ok(user)),
            None => ready(Err(ErrorUnauthorized("User not authenticated"))),
        }
    }
}
