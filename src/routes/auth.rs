use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, post, State};
use serde::{Deserialize, Serialize};

use crate::models::place::Place;
use crate::models::user::User;
use crate::repository::counter_repository::CounterRepository;
use crate::repository::place_repository::PlaceRepository;
use crate::repository::user_repository::UserRepository;
use crate::response::ApiResponse;

pub const BCRYPT_COST: u32 = 10;

/// Usernames are derived from the display name: lowercased, whitespace
/// stripped.
pub fn slug_username(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Collision fallback: append the freshly drawn user id.
pub fn suffixed_username(slug: &str, id: i32) -> String {
    format!("{}{}", slug, id)
}

#[derive(Deserialize, Debug)]
pub struct SignupRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(rename = "jobTitle")]
    pub job_title: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "raID")]
    pub ra_id: String,
}

#[post("/signup", format = "json", data = "<signup>")]
pub async fn signup(
    user_repo: &State<UserRepository>,
    counter_repo: &State<CounterRepository>,
    signup: Json<SignupRequest>,
) -> (Status, Json<ApiResponse<User>>) {
    let signup = signup.into_inner();

    match user_repo.find_by_ra_id(&signup.ra_id).await {
        Ok(Some(_)) => {
            return (
                Status::BadRequest,
                Json(ApiResponse {
                    message: "Ration Card Number already exists.".to_string(),
                    result: None,
                }),
            );
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("error checking raID: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "500: Internal Server Error".to_string(),
                    result: None,
                }),
            );
        }
    }

    let id = match counter_repo.next_sequence("users").await {
        Ok(Some(id)) => id,
        Ok(None) => {
            log::error!("counter document for \"users\" is missing");
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "500: Internal Server Error".to_string(),
                    result: None,
                }),
            );
        }
        Err(e) => {
            log::error!("error drawing user id: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "500: Internal Server Error".to_string(),
                    result: None,
                }),
            );
        }
    };

    let mut username = slug_username(&signup.name);
    match user_repo.find_by_username(&username).await {
        Ok(Some(_)) => username = suffixed_username(&username, id),
        Ok(None) => {}
        Err(e) => {
            log::error!("error checking username: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "500: Internal Server Error".to_string(),
                    result: None,
                }),
            );
        }
    }

    let hashed = match bcrypt::hash(&signup.password, BCRYPT_COST) {
        Ok(hashed) => hashed,
        Err(e) => {
            log::error!("error hashing password: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "500: Internal Server Error".to_string(),
                    result: None,
                }),
            );
        }
    };

    let user = User {
        id,
        username,
        name: Some(signup.name),
        phone: Some(signup.phone),
        address: Some(signup.address),
        job_title: Some(signup.job_title),
        email: Some(signup.email),
        password: Some(hashed),
        activation: 0,
        user_type: "user".to_string(),
        ra_id: signup.ra_id,
        photo_id: None,
    };

    match user_repo.insert(&user).await {
        Ok(_) => (
            Status::Ok,
            Json(ApiResponse {
                message: "User registered successfully. Awaiting activation.".to_string(),
                result: Some(user),
            }),
        ),
        Err(e) => {
            log::error!("error inserting user: {}", e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "500: Internal Server Error".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResult {
    pub success: bool,
    #[serde(rename = "userType", skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
}

#[post("/login", format = "json", data = "<login>")]
pub async fn login(
    user_repo: &State<UserRepository>,
    login: Json<LoginRequest>,
) -> (Status, Json<ApiResponse<LoginResult>>) {
    let user = match user_repo.find_by_username(&login.username).await {
        Ok(user) => user,
        Err(e) => {
            log::error!("error finding user: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "500: Internal Server Error".to_string(),
                    result: None,
                }),
            );
        }
    };

    let Some(user) = user else {
        return (
            Status::Unauthorized,
            Json(ApiResponse {
                message: "Invalid credentials".to_string(),
                result: Some(LoginResult {
                    success: false,
                    user_type: None,
                }),
            }),
        );
    };

    let matches = user
        .password
        .as_deref()
        .map(|hash| bcrypt::verify(&login.password, hash).unwrap_or(false))
        .unwrap_or(false);

    if !matches {
        return (
            Status::Unauthorized,
            Json(ApiResponse {
                message: "Invalid credentials".to_string(),
                result: Some(LoginResult {
                    success: false,
                    user_type: None,
                }),
            }),
        );
    }

    if user.activation == 0 {
        return (
            Status::Ok,
            Json(ApiResponse {
                message: "Account not activated".to_string(),
                result: Some(LoginResult {
                    success: false,
                    user_type: None,
                }),
            }),
        );
    }

    (
        Status::Ok,
        Json(ApiResponse {
            message: "Login successful".to_string(),
            result: Some(LoginResult {
                success: true,
                user_type: Some(user.user_type),
            }),
        }),
    )
}

#[get("/locations")]
pub async fn locations(
    place_repo: &State<PlaceRepository>,
) -> (Status, Json<ApiResponse<Vec<Place>>>) {
    match place_repo.find_all().await {
        Ok(places) if !places.is_empty() => (
            Status::Ok,
            Json(ApiResponse {
                message: "200: Success".to_string(),
                result: Some(places),
            }),
        ),
        Ok(_) => (
            Status::NotFound,
            Json(ApiResponse {
                message: "No locations found".to_string(),
                result: None,
            }),
        ),
        Err(e) => {
            log::error!("error fetching locations: {}", e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "500: Internal Server Error".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_strips_whitespace() {
        assert_eq!(slug_username("Anju George"), "anjugeorge");
        assert_eq!(slug_username("  K  V  Thomas "), "kvthomas");
        assert_eq!(slug_username("meera"), "meera");
    }

    #[test]
    fn collision_appends_the_drawn_id() {
        assert_eq!(suffixed_username("anjugeorge", 42), "anjugeorge42");
    }

    #[test]
    fn signup_body_uses_the_frontend_field_names() {
        let body = r#"{
            "name": "Anju George",
            "phone": "9876543210",
            "address": "Kumarakom",
            "jobTitle": "Farmer",
            "email": "anju@example.com",
            "password": "secret",
            "raID": "RA-777"
        }"#;
        let parsed: SignupRequest = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.job_title, "Farmer");
        assert_eq!(parsed.ra_id, "RA-777");
    }
}
