use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, post, State};
use serde::{Deserialize, Serialize};

use crate::models::place::Place;
use crate::models::user::{AdminContact, PresidentRow, User};
use crate::repository::counter_repository::CounterRepository;
use crate::repository::place_repository::PlaceRepository;
use crate::repository::user_repository::UserRepository;
use crate::response::ApiResponse;
use crate::routes::auth::{slug_username, BCRYPT_COST};
use crate::services::mailer::Mailer;

#[get("/admin-presidents")]
pub async fn presidents(
    user_repo: &State<UserRepository>,
) -> (Status, Json<ApiResponse<Vec<PresidentRow>>>) {
    match user_repo.presidents_with_places().await {
        Ok(rows) if !rows.is_empty() => (
            Status::Ok,
            Json(ApiResponse {
                message: "200: Success".to_string(),
                result: Some(rows),
            }),
        ),
        Ok(_) => (
            Status::NotFound,
            Json(ApiResponse {
                message: "No presidents found".to_string(),
                result: None,
            }),
        ),
        Err(e) => {
            log::error!("error fetching presidents: {}", e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Internal server error".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[derive(Serialize, Debug)]
pub struct UserCount {
    pub place_name: String,
    #[serde(rename = "userCount")]
    pub user_count: i64,
}

#[get("/count-users/<place_name>")]
pub async fn count_users(
    place_name: String,
    user_repo: &State<UserRepository>,
) -> (Status, Json<ApiResponse<UserCount>>) {
    match user_repo.count_villagers_in_place(&place_name).await {
        Ok(count) if count > 0 => (
            Status::Ok,
            Json(ApiResponse {
                message: "200: Success".to_string(),
                result: Some(UserCount {
                    place_name,
                    user_count: count,
                }),
            }),
        ),
        Ok(_) => (
            Status::NotFound,
            Json(ApiResponse {
                message: "No users found for this place".to_string(),
                result: None,
            }),
        ),
        Err(e) => {
            log::error!("error counting users in {}: {}", place_name, e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Internal server error".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[get("/all-admins/<place_name>")]
pub async fn all_admins(
    place_name: String,
    user_repo: &State<UserRepository>,
) -> (Status, Json<ApiResponse<Vec<AdminContact>>>) {
    match user_repo.admins_in_place(&place_name).await {
        Ok(rows) if !rows.is_empty() => (
            Status::Ok,
            Json(ApiResponse {
                message: "200: Success".to_string(),
                result: Some(rows),
            }),
        ),
        Ok(_) => (
            Status::NotFound,
            Json(ApiResponse {
                message: "No admins found for this place".to_string(),
                result: None,
            }),
        ),
        Err(e) => {
            log::error!("error fetching admins in {}: {}", place_name, e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Internal server error".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AddPlaceRequest {
    pub place_name: String,
}

#[post("/add-place", format = "json", data = "<request>")]
pub async fn add_place(
    request: Json<AddPlaceRequest>,
    place_repo: &State<PlaceRepository>,
    counter_repo: &State<CounterRepository>,
) -> (Status, Json<ApiResponse<Place>>) {
    let place_name = request.into_inner().place_name.trim().to_string();
    if place_name.is_empty() {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "Place name is required".to_string(),
                result: None,
            }),
        );
    }

    match place_repo.find_by_name(&place_name).await {
        Ok(Some(_)) => {
            return (
                Status::BadRequest,
                Json(ApiResponse {
                    message: "Place with this name already exists.".to_string(),
                    result: None,
                }),
            );
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("error checking place name: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Internal server error".to_string(),
                    result: None,
                }),
            );
        }
    }

    let id = match counter_repo.next_sequence("places").await {
        Ok(Some(id)) => id,
        Ok(None) => {
            log::error!("counter document for \"places\" is missing");
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Internal server error".to_string(),
                    result: None,
                }),
            );
        }
        Err(e) => {
            log::error!("error drawing place id: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Internal server error".to_string(),
                    result: None,
                }),
            );
        }
    };

    let place = Place { id, place_name };
    match place_repo.insert(&place).await {
        Ok(_) => (
            Status::Ok,
            Json(ApiResponse {
                message: "Village added successfully.".to_string(),
                result: Some(place),
            }),
        ),
        Err(e) => {
            log::error!("error inserting place: {}", e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Internal server error".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AddAdminUserRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub place: String,
    #[serde(rename = "raID")]
    pub ra_id: String,
}

#[derive(Serialize, Debug)]
pub struct CreatedAdmin {
    pub username: String,
}

/// Registers the president for a village. The generated username falls
/// back to a 4-char prefix plus the drawn id when the name slug is taken.
#[post("/add-admin-user", format = "json", data = "<request>")]
pub async fn add_admin_user(
    request: Json<AddAdminUserRequest>,
    user_repo: &State<UserRepository>,
    counter_repo: &State<CounterRepository>,
) -> (Status, Json<ApiResponse<CreatedAdmin>>) {
    let request = request.into_inner();
    if request.name.trim().is_empty()
        || request.phone.trim().is_empty()
        || request.email.trim().is_empty()
        || request.password.trim().is_empty()
        || request.place.trim().is_empty()
    {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "All fields are required".to_string(),
                result: None,
            }),
        );
    }

    let id = match counter_repo.next_sequence("users").await {
        Ok(Some(id)) => id,
        Ok(None) => {
            log::error!("counter document for \"users\" is missing");
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Internal server error".to_string(),
                    result: None,
                }),
            );
        }
        Err(e) => {
            log::error!("error drawing user id: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Internal server error".to_string(),
                    result: None,
                }),
            );
        }
    };

    let mut username = slug_username(&request.name);
    match user_repo.find_by_username(&username).await {
        Ok(Some(_)) => {
            let prefix: String = username.chars().take(4).collect();
            username = format!("{}{}", prefix, id);
            match user_repo.find_by_username(&username).await {
                Ok(Some(_)) => {
                    return (
                        Status::BadRequest,
                        Json(ApiResponse {
                            message: "Unable to generate a unique username".to_string(),
                            result: None,
                        }),
                    );
                }
                Ok(None) => {}
                Err(e) => {
                    log::error!("error checking username: {}", e);
                    return (
                        Status::InternalServerError,
                        Json(ApiResponse {
                            message: "Internal server error".to_string(),
                            result: None,
                        }),
                    );
                }
            }
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("error checking username: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Internal server error".to_string(),
                    result: None,
                }),
            );
        }
    }

    let hashed = match bcrypt::hash(&request.password, BCRYPT_COST) {
        Ok(hashed) => hashed,
        Err(e) => {
            log::error!("error hashing password: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Internal server error".to_string(),
                    result: None,
                }),
            );
        }
    };

    let user = User {
        id,
        username: username.clone(),
        name: Some(request.name),
        phone: Some(request.phone),
        address: Some(request.place),
        job_title: Some("President".to_string()),
        email: Some(request.email),
        password: Some(hashed),
        activation: 1,
        user_type: "admin".to_string(),
        ra_id: request.ra_id,
        photo_id: Some(2),
    };

    match user_repo.insert(&user).await {
        Ok(_) => (
            Status::Ok,
            Json(ApiResponse {
                message: "Admin user added successfully.".to_string(),
                result: Some(CreatedAdmin { username }),
            }),
        ),
        Err(e) => {
            log::error!("error inserting admin user: {}", e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Internal server error".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct SendEmailRequest {
    pub name: String,
    pub email: String,
    pub place: String,
    pub username: String,
    pub password: String,
}

/// Mails the freshly created president their credentials. Unlike the
/// notification mails, a delivery failure here is surfaced to the caller.
#[post("/send-email", format = "json", data = "<request>")]
pub async fn send_email(
    request: Json<SendEmailRequest>,
    mailer: &State<Mailer>,
) -> (Status, Json<ApiResponse<String>>) {
    let request = request.into_inner();
    let body = format!(
        "Dear {},\n\nYou have been registered as the president of {}.\n\n\
         Username: {}\nPassword: {}\n\nPlease log in and change your password.",
        request.name, request.place, request.username, request.password
    );

    match mailer
        .send(&request.email, "Your administrator account", body)
        .await
    {
        Ok(()) => (
            Status::Ok,
            Json(ApiResponse {
                message: "Email sent successfully.".to_string(),
                result: None,
            }),
        ),
        Err(e) => {
            log::error!("error sending credentials email: {}", e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Failed to send email".to_string(),
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
    fn user_count_serializes_with_wire_name() {
        let count = UserCount {
            place_name: "Kumarakom".to_string(),
            user_count: 12,
        };
        let json = serde_json::to_value(&count).unwrap();
        assert_eq!(json["userCount"], 12);
        assert_eq!(json["place_name"], "Kumarakom");
    }
}
