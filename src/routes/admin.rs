use chrono::Utc;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put, State};
use serde::{Deserialize, Serialize};

use crate::models::crop::{Crop, Price};
use crate::models::message::{Announcement, Query};
use crate::models::user::User;
use crate::repository::announcement_repository::AnnouncementRepository;
use crate::repository::counter_repository::CounterRepository;
use crate::repository::crop_repository::{CropRepository, PriceRepository};
use crate::repository::place_repository::PlaceRepository;
use crate::repository::query_repository::QueryRepository;
use crate::repository::suggestion_repository::SuggestionRepository;
use crate::repository::user_repository::UserRepository;
use crate::response::ApiResponse;
use crate::routes::auth::{slug_username, suffixed_username, BCRYPT_COST};
use crate::services::mailer::Mailer;

fn internal_error<T>() -> (Status, Json<ApiResponse<T>>) {
    (
        Status::InternalServerError,
        Json(ApiResponse {
            message: "Internal server error".to_string(),
            result: None,
        }),
    )
}

fn not_found<T>(message: &str) -> (Status, Json<ApiResponse<T>>) {
    (
        Status::NotFound,
        Json(ApiResponse {
            message: message.to_string(),
            result: None,
        }),
    )
}

fn bad_request<T>(message: &str) -> (Status, Json<ApiResponse<T>>) {
    (
        Status::BadRequest,
        Json(ApiResponse {
            message: message.to_string(),
            result: None,
        }),
    )
}

#[derive(Deserialize, Debug)]
pub struct AnnouncementRequest {
    pub admin: String,
    pub title: String,
    pub content: String,
}

#[post("/createAnnouncement", format = "json", data = "<request>")]
pub async fn create_announcement(
    request: Json<AnnouncementRequest>,
    announcement_repo: &State<AnnouncementRepository>,
    counter_repo: &State<CounterRepository>,
) -> (Status, Json<ApiResponse<Announcement>>) {
    let request = request.into_inner();
    let id = match counter_repo.next_sequence("announcements").await {
        Ok(Some(id)) => id,
        Ok(None) => {
            log::error!("counter document for \"announcements\" is missing");
            return internal_error();
        }
        Err(e) => {
            log::error!("error drawing announcement id: {}", e);
            return internal_error();
        }
    };

    let announcement = Announcement {
        id,
        admin: request.admin,
        title: request.title,
        content: request.content,
        created_at: Utc::now(),
    };

    match announcement_repo.insert(&announcement).await {
        Ok(_) => (
            Status::Ok,
            Json(ApiResponse {
                message: "Announcement created successfully".to_string(),
                result: Some(announcement),
            }),
        ),
        Err(e) => {
            log::error!("error inserting announcement: {}", e);
            internal_error()
        }
    }
}

#[put("/updateAnnouncement/<id>", format = "json", data = "<request>")]
pub async fn update_announcement(
    id: i32,
    request: Json<AnnouncementRequest>,
    announcement_repo: &State<AnnouncementRepository>,
) -> (Status, Json<ApiResponse<String>>) {
    let request = request.into_inner();
    match announcement_repo
        .update_by_id(id, &request.admin, &request.title, &request.content)
        .await
    {
        Ok(matched) if matched > 0 => (
            Status::Ok,
            Json(ApiResponse {
                message: "Announcement updated successfully".to_string(),
                result: None,
            }),
        ),
        Ok(_) => not_found("Announcement not found"),
        Err(e) => {
            log::error!("error updating announcement {}: {}", id, e);
            internal_error()
        }
    }
}

#[delete("/deleteAnnouncement/<id>")]
pub async fn delete_announcement(
    id: i32,
    announcement_repo: &State<AnnouncementRepository>,
) -> (Status, Json<ApiResponse<String>>) {
    match announcement_repo.delete_by_id(id).await {
        Ok(deleted) if deleted > 0 => (
            Status::Ok,
            Json(ApiResponse {
                message: "Announcement deleted successfully".to_string(),
                result: None,
            }),
        ),
        Ok(_) => not_found("Announcement not found"),
        Err(e) => {
            log::error!("error deleting announcement {}: {}", id, e);
            internal_error()
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct ActivationRequest {
    pub user_id: i32,
    pub admin: String,
}

#[post("/activate-user", format = "json", data = "<request>")]
pub async fn activate_user(
    request: Json<ActivationRequest>,
    user_repo: &State<UserRepository>,
    mailer: &State<Mailer>,
) -> (Status, Json<ApiResponse<String>>) {
    let request = request.into_inner();

    let user = match user_repo.find_by_id(request.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return not_found("User details not found"),
        Err(e) => {
            log::error!("error finding user: {}", e);
            return internal_error();
        }
    };

    let admin = match user_repo.find_by_username(&request.admin).await {
        Ok(Some(admin)) => admin,
        Ok(None) => return not_found("Admin not found"),
        Err(e) => {
            log::error!("error finding admin: {}", e);
            return internal_error();
        }
    };

    if let Err(e) = user_repo.set_activation(request.user_id, 1).await {
        log::error!("error activating user {}: {}", request.user_id, e);
        return internal_error();
    }

    if let Some(email) = &user.email {
        let body = format!(
            "Dear {},\n\nYour account has been activated by {}. You can now \
             log in with your username: {}.\n\nWelcome aboard!",
            user.name.as_deref().unwrap_or(&user.username),
            admin.name.as_deref().unwrap_or(&admin.username),
            user.username
        );
        mailer
            .send_best_effort(email, "Account activated", body)
            .await;
    }

    (
        Status::Ok,
        Json(ApiResponse {
            message: "User activated successfully".to_string(),
            result: None,
        }),
    )
}

/// Rejecting a pending registration removes the user document outright so
/// the ration card number can be registered again later.
#[post("/deactivate-user", format = "json", data = "<request>")]
pub async fn deactivate_user(
    request: Json<ActivationRequest>,
    user_repo: &State<UserRepository>,
    mailer: &State<Mailer>,
) -> (Status, Json<ApiResponse<String>>) {
    let request = request.into_inner();

    let user = match user_repo.find_by_id(request.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return not_found("User details not found"),
        Err(e) => {
            log::error!("error finding user: {}", e);
            return internal_error();
        }
    };

    let admin = match user_repo.find_by_username(&request.admin).await {
        Ok(Some(admin)) => admin,
        Ok(None) => return not_found("Admin not found"),
        Err(e) => {
            log::error!("error finding admin: {}", e);
            return internal_error();
        }
    };

    if let Err(e) = user_repo.delete_by_id(request.user_id).await {
        log::error!("error removing user {}: {}", request.user_id, e);
        return internal_error();
    }

    if let Some(email) = &user.email {
        let body = format!(
            "Dear {},\n\nYour registration request has been declined by {}. \
             Please contact your village office for details.",
            user.name.as_deref().unwrap_or(&user.username),
            admin.name.as_deref().unwrap_or(&admin.username)
        );
        mailer
            .send_best_effort(email, "Registration declined", body)
            .await;
    }

    (
        Status::Ok,
        Json(ApiResponse {
            message: "User rejected successfully".to_string(),
            result: None,
        }),
    )
}

#[get("/pending-users?<username>")]
pub async fn pending_users(
    username: Option<String>,
    user_repo: &State<UserRepository>,
) -> (Status, Json<ApiResponse<Vec<User>>>) {
    let Some(username) = username else {
        return bad_request("Username is required");
    };

    let admin = match user_repo.find_by_username(&username).await {
        Ok(Some(admin)) => admin,
        Ok(None) => return not_found("Admin not found"),
        Err(e) => {
            log::error!("error finding admin: {}", e);
            return internal_error();
        }
    };

    let address = admin.address.unwrap_or_default();
    match user_repo.find_pending_by_address(&address).await {
        Ok(users) if !users.is_empty() => (
            Status::Ok,
            Json(ApiResponse {
                message: "200: Success".to_string(),
                result: Some(users),
            }),
        ),
        Ok(_) => not_found("No pending users found"),
        Err(e) => {
            log::error!("error fetching pending users: {}", e);
            internal_error()
        }
    }
}

#[get("/admin/queries?<username>&<type>")]
pub async fn admin_queries(
    username: Option<String>,
    r#type: Option<i32>,
    user_repo: &State<UserRepository>,
    query_repo: &State<QueryRepository>,
) -> (Status, Json<ApiResponse<Vec<Query>>>) {
    let (Some(username), Some(query_type)) = (username, r#type) else {
        return bad_request("Username and type are required");
    };

    let admin = match user_repo.find_by_username(&username).await {
        Ok(Some(admin)) => admin,
        Ok(None) => return not_found("Admin not found"),
        Err(e) => {
            log::error!("error finding admin: {}", e);
            return internal_error();
        }
    };

    let address = admin.address.unwrap_or_default();
    let villagers = match user_repo.find_villagers_by_address(&address).await {
        Ok(villagers) => villagers,
        Err(e) => {
            log::error!("error fetching villagers: {}", e);
            return internal_error();
        }
    };
    if villagers.is_empty() {
        return not_found("No users found for this village");
    }
    let usernames: Vec<String> = villagers.into_iter().map(|u| u.username).collect();

    match query_repo
        .find_by_usernames_and_type(&usernames, query_type)
        .await
    {
        Ok(queries) => (
            Status::Ok,
            Json(ApiResponse {
                message: "200: Success".to_string(),
                result: Some(queries),
            }),
        ),
        Err(e) => {
            log::error!("error fetching queries: {}", e);
            internal_error()
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct QueryResponseRequest {
    pub response: String,
}

#[put("/admin/respondQuery/<id>", format = "json", data = "<request>")]
pub async fn respond_query(
    id: i32,
    request: Json<QueryResponseRequest>,
    query_repo: &State<QueryRepository>,
) -> (Status, Json<ApiResponse<String>>) {
    match query_repo.set_response(id, &request.response).await {
        Ok(matched) if matched > 0 => (
            Status::Ok,
            Json(ApiResponse {
                message: "Response saved successfully".to_string(),
                result: None,
            }),
        ),
        Ok(_) => not_found("Query not found"),
        Err(e) => {
            log::error!("error responding to query {}: {}", id, e);
            internal_error()
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct SuggestionResponseRequest {
    pub id: i32,
    pub response: String,
}

#[post("/respondSuggestion", format = "json", data = "<request>")]
pub async fn respond_suggestion(
    request: Json<SuggestionResponseRequest>,
    suggestion_repo: &State<SuggestionRepository>,
) -> (Status, Json<ApiResponse<String>>) {
    match suggestion_repo
        .set_response(request.id, &request.response)
        .await
    {
        Ok(matched) if matched > 0 => (
            Status::Ok,
            Json(ApiResponse {
                message: "Response saved successfully".to_string(),
                result: None,
            }),
        ),
        Ok(_) => not_found("Suggestion not found"),
        Err(e) => {
            log::error!("error responding to suggestion {}: {}", request.id, e);
            internal_error()
        }
    }
}

#[get("/all-crops")]
pub async fn all_crops(
    crop_repo: &State<CropRepository>,
) -> (Status, Json<ApiResponse<Vec<Crop>>>) {
    match crop_repo.find_all().await {
        Ok(crops) => (
            Status::Ok,
            Json(ApiResponse {
                message: "200: Success".to_string(),
                result: Some(crops),
            }),
        ),
        Err(e) => {
            log::error!("error fetching crops: {}", e);
            internal_error()
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct UpdatePriceRequest {
    pub id: i32,
    pub price: f64,
    pub month_year: String,
}

#[post("/update-price", format = "json", data = "<request>")]
pub async fn update_price(
    request: Json<UpdatePriceRequest>,
    price_repo: &State<PriceRepository>,
) -> (Status, Json<ApiResponse<String>>) {
    let request = request.into_inner();

    match price_repo.find_by_id(request.id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Price not found"),
        Err(e) => {
            log::error!("error finding price {}: {}", request.id, e);
            return internal_error();
        }
    }

    match price_repo
        .update_price(request.id, request.price, &request.month_year)
        .await
    {
        Ok(modified) if modified > 0 => (
            Status::Ok,
            Json(ApiResponse {
                message: "Price updated successfully".to_string(),
                result: None,
            }),
        ),
        Ok(_) => not_found("Price not modified"),
        Err(e) => {
            log::error!("error updating price {}: {}", request.id, e);
            internal_error()
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AddPriceRequest {
    pub place_id: i32,
    pub crop_id: i32,
    pub price: f64,
    pub month_year: String,
}

#[post("/add-price", format = "json", data = "<request>")]
pub async fn add_price(
    request: Json<AddPriceRequest>,
    price_repo: &State<PriceRepository>,
    counter_repo: &State<CounterRepository>,
) -> (Status, Json<ApiResponse<Price>>) {
    let request = request.into_inner();

    match price_repo
        .find_by_place_and_crop(request.place_id, request.crop_id)
        .await
    {
        Ok(Some(_)) => return bad_request("Crop is already available in the location"),
        Ok(None) => {}
        Err(e) => {
            log::error!("error checking existing price: {}", e);
            return internal_error();
        }
    }

    let id = match counter_repo.next_sequence("price").await {
        Ok(Some(id)) => id,
        Ok(None) => {
            log::error!("counter document for \"price\" is missing");
            return internal_error();
        }
        Err(e) => {
            log::error!("error drawing price id: {}", e);
            return internal_error();
        }
    };

    let price = Price {
        id,
        place_id: request.place_id,
        crop_id: request.crop_id,
        price: request.price,
        month_year: request.month_year,
    };

    match price_repo.insert(&price).await {
        Ok(_) => (
            Status::Ok,
            Json(ApiResponse {
                message: "Price added successfully".to_string(),
                result: Some(price),
            }),
        ),
        Err(e) => {
            log::error!("error inserting price: {}", e);
            internal_error()
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AverageRequest {
    pub crop_id: i32,
    pub average_price: f64,
}

#[post("/update-average-price", format = "json", data = "<request>")]
pub async fn update_average_price(
    request: Json<AverageRequest>,
    crop_repo: &State<CropRepository>,
) -> (Status, Json<ApiResponse<String>>) {
    match crop_repo
        .set_avg_price(request.crop_id, request.average_price)
        .await
    {
        Ok(modified) if modified > 0 => (
            Status::Ok,
            Json(ApiResponse {
                message: "Average price updated successfully".to_string(),
                result: None,
            }),
        ),
        Ok(_) => not_found("Crop not found"),
        Err(e) => {
            log::error!("error updating average price: {}", e);
            internal_error()
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AddCropRequest {
    pub crop_name: String,
    #[serde(default)]
    pub avg_price: f64,
}

#[post("/add-crop", format = "json", data = "<request>")]
pub async fn add_crop(
    request: Json<AddCropRequest>,
    crop_repo: &State<CropRepository>,
    counter_repo: &State<CounterRepository>,
) -> (Status, Json<ApiResponse<Crop>>) {
    let request = request.into_inner();

    match crop_repo.find_by_name(&request.crop_name).await {
        Ok(Some(_)) => return bad_request("Crop already exists"),
        Ok(None) => {}
        Err(e) => {
            log::error!("error checking crop name: {}", e);
            return internal_error();
        }
    }

    let id = match counter_repo.next_sequence("crop").await {
        Ok(Some(id)) => id,
        Ok(None) => {
            log::error!("counter document for \"crop\" is missing");
            return internal_error();
        }
        Err(e) => {
            log::error!("error drawing crop id: {}", e);
            return internal_error();
        }
    };

    let crop = Crop {
        id,
        crop_name: request.crop_name,
        avg_price: request.avg_price,
    };

    match crop_repo.insert(&crop).await {
        Ok(_) => (
            Status::Ok,
            Json(ApiResponse {
                message: "Crop added successfully".to_string(),
                result: Some(crop),
            }),
        ),
        Err(e) => {
            log::error!("error inserting crop: {}", e);
            internal_error()
        }
    }
}

#[get("/admin-users?<username>")]
pub async fn admin_users(
    username: Option<String>,
    user_repo: &State<UserRepository>,
) -> (Status, Json<ApiResponse<Vec<User>>>) {
    let Some(username) = username else {
        return bad_request("Username is required");
    };

    let admin = match user_repo.find_by_username(&username).await {
        Ok(Some(admin)) => admin,
        Ok(None) => return not_found("Admin not found"),
        Err(e) => {
            log::error!("error finding admin: {}", e);
            return internal_error();
        }
    };

    let address = admin.address.unwrap_or_default();
    match user_repo.find_admins_excluding(&address, &username).await {
        Ok(admins) => (
            Status::Ok,
            Json(ApiResponse {
                message: "200: Success".to_string(),
                result: Some(admins),
            }),
        ),
        Err(e) => {
            log::error!("error fetching admin users: {}", e);
            internal_error()
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct RemoveAdminRequest {
    pub user_id: i32,
}

#[post("/remove-admin", format = "json", data = "<request>")]
pub async fn remove_admin(
    request: Json<RemoveAdminRequest>,
    user_repo: &State<UserRepository>,
    mailer: &State<Mailer>,
) -> (Status, Json<ApiResponse<String>>) {
    let request = request.into_inner();

    let admin = match user_repo.find_by_id_and_type(request.user_id, "admin").await {
        Ok(Some(admin)) => admin,
        Ok(None) => return not_found("Admin not found or not an admin"),
        Err(e) => {
            log::error!("error finding admin: {}", e);
            return internal_error();
        }
    };

    if let Err(e) = user_repo
        .delete_by_id_and_type(request.user_id, "admin")
        .await
    {
        log::error!("error removing admin {}: {}", request.user_id, e);
        return internal_error();
    }

    if let Some(email) = &admin.email {
        let body = format!(
            "Dear {},\n\nYour administrator account has been removed. You no \
             longer have access to the village administration portal.",
            admin.name.as_deref().unwrap_or(&admin.username)
        );
        mailer
            .send_best_effort(email, "Administrator access revoked", body)
            .await;
    }

    (
        Status::Ok,
        Json(ApiResponse {
            message: "Admin removed successfully".to_string(),
            result: None,
        }),
    )
}

#[derive(Serialize, Debug)]
pub struct AddressResult {
    pub id: i32,
    pub address: String,
}

#[get("/address?<username>")]
pub async fn address(
    username: Option<String>,
    user_repo: &State<UserRepository>,
    place_repo: &State<PlaceRepository>,
) -> (Status, Json<ApiResponse<AddressResult>>) {
    let Some(username) = username else {
        return bad_request("Username is required");
    };

    let user = match user_repo.find_by_username(&username).await {
        Ok(Some(user)) => user,
        Ok(None) => return not_found("User not found"),
        Err(e) => {
            log::error!("error finding user: {}", e);
            return internal_error();
        }
    };

    let address = user.address.unwrap_or_default();
    match place_repo.find_by_name(&address).await {
        Ok(Some(place)) => (
            Status::Ok,
            Json(ApiResponse {
                message: "200: Success".to_string(),
                result: Some(AddressResult {
                    id: place.id,
                    address: place.place_name,
                }),
            }),
        ),
        Ok(None) => not_found("Address not found"),
        Err(e) => {
            log::error!("error finding place: {}", e);
            internal_error()
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct UpdateUserRequest {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(rename = "raID")]
    pub ra_id: String,
    pub job_title: String,
}

#[put("/update-user", format = "json", data = "<request>")]
pub async fn update_user(
    request: Json<UpdateUserRequest>,
    user_repo: &State<UserRepository>,
) -> (Status, Json<ApiResponse<User>>) {
    let request = request.into_inner();

    match user_repo
        .update_details(
            request.id,
            &request.name,
            &request.phone,
            &request.email,
            &request.ra_id,
            &request.job_title,
        )
        .await
    {
        Ok(matched) if matched > 0 => {}
        Ok(_) => return not_found("User not found"),
        Err(e) => {
            log::error!("error updating user {}: {}", request.id, e);
            return internal_error();
        }
    }

    match user_repo.find_by_id(request.id).await {
        Ok(user) => (
            Status::Ok,
            Json(ApiResponse {
                message: "User updated successfully".to_string(),
                result: user,
            }),
        ),
        Err(e) => {
            log::error!("error re-reading user {}: {}", request.id, e);
            internal_error()
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AddAdminRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub job_title: String,
    #[serde(rename = "raID")]
    pub ra_id: String,
    pub admin_name: String,
}

/// Lets a president appoint a fellow admin for their own village. The new
/// account inherits the president's address and is activated immediately.
#[post("/add-admin", format = "json", data = "<request>")]
pub async fn add_admin(
    request: Json<AddAdminRequest>,
    user_repo: &State<UserRepository>,
    counter_repo: &State<CounterRepository>,
    mailer: &State<Mailer>,
) -> (Status, Json<ApiResponse<User>>) {
    let request = request.into_inner();

    let appointing_admin = match user_repo.find_by_username(&request.admin_name).await {
        Ok(Some(admin)) => admin,
        Ok(None) => return bad_request("Admin user not found"),
        Err(e) => {
            log::error!("error finding admin: {}", e);
            return internal_error();
        }
    };

    match user_repo.find_by_ra_id(&request.ra_id).await {
        Ok(Some(_)) => return bad_request("Ration Card Number already exists."),
        Ok(None) => {}
        Err(e) => {
            log::error!("error checking raID: {}", e);
            return internal_error();
        }
    }

    let id = match counter_repo.next_sequence("users").await {
        Ok(Some(id)) => id,
        Ok(None) => {
            log::error!("counter document for \"users\" is missing");
            return internal_error();
        }
        Err(e) => {
            log::error!("error drawing user id: {}", e);
            return internal_error();
        }
    };

    let mut username = slug_username(&request.name);
    match user_repo.find_by_username(&username).await {
        Ok(Some(_)) => username = suffixed_username(&username, id),
        Ok(None) => {}
        Err(e) => {
            log::error!("error checking username: {}", e);
            return internal_error();
        }
    }

    let hashed = match bcrypt::hash(&request.password, BCRYPT_COST) {
        Ok(hashed) => hashed,
        Err(e) => {
            log::error!("error hashing password: {}", e);
            return internal_error();
        }
    };

    let user = User {
        id,
        username: username.clone(),
        name: Some(request.name.clone()),
        phone: Some(request.phone),
        address: appointing_admin.address.clone(),
        job_title: Some(request.job_title),
        email: Some(request.email.clone()),
        password: Some(hashed),
        activation: 1,
        user_type: "admin".to_string(),
        ra_id: request.ra_id,
        photo_id: Some(2),
    };

    match user_repo.insert(&user).await {
        Ok(_) => {
            let body = format!(
                "Dear {},\n\nYou have been appointed as an administrator of {}.\n\n\
                 Username: {}\nPassword: {}\n\nPlease log in and change your password.",
                request.name,
                appointing_admin.address.as_deref().unwrap_or("your village"),
                username,
                request.password
            );
            mailer
                .send_best_effort(&request.email, "Your administrator account", body)
                .await;
            (
                Status::Ok,
                Json(ApiResponse {
                    message: "Admin added successfully".to_string(),
                    result: Some(user),
                }),
            )
        }
        Err(e) => {
            log::error!("error inserting admin: {}", e);
            internal_error()
        }
    }
}

#[get("/users?<username>")]
pub async fn activated_users(
    username: Option<String>,
    user_repo: &State<UserRepository>,
) -> (Status, Json<ApiResponse<Vec<User>>>) {
    let Some(username) = username else {
        return bad_request("Username is required");
    };

    let admin = match user_repo.find_by_username(&username).await {
        Ok(Some(admin)) => admin,
        Ok(None) => return not_found("Admin not found"),
        Err(e) => {
            log::error!("error finding admin: {}", e);
            return internal_error();
        }
    };

    let address = admin.address.unwrap_or_default();
    match user_repo.find_activated_villagers(&address).await {
        Ok(users) => (
            Status::Ok,
            Json(ApiResponse {
                message: "200: Success".to_string(),
                result: Some(users),
            }),
        ),
        Err(e) => {
            log::error!("error fetching users: {}", e);
            internal_error()
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct RemoveUserRequest {
    pub user_id: i32,
    pub admin_username: String,
}

#[post("/remove-user", format = "json", data = "<request>")]
pub async fn remove_user(
    request: Json<RemoveUserRequest>,
    user_repo: &State<UserRepository>,
    mailer: &State<Mailer>,
) -> (Status, Json<ApiResponse<String>>) {
    let request = request.into_inner();

    let user = match user_repo.find_by_id(request.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return not_found("User not found"),
        Err(e) => {
            log::error!("error finding user: {}", e);
            return internal_error();
        }
    };

    let admin = match user_repo.find_by_username(&request.admin_username).await {
        Ok(Some(admin)) => admin,
        Ok(None) => return not_found("Admin not found"),
        Err(e) => {
            log::error!("error finding admin: {}", e);
            return internal_error();
        }
    };

    if let Err(e) = user_repo.delete_by_id(request.user_id).await {
        log::error!("error removing user {}: {}", request.user_id, e);
        return internal_error();
    }

    if let Some(email) = &user.email {
        let body = format!(
            "Dear {},\n\nYour account has been removed by {}. Please contact \
             your village office for details.",
            user.name.as_deref().unwrap_or(&user.username),
            admin.name.as_deref().unwrap_or(&admin.username)
        );
        mailer
            .send_best_effort(email, "Account removed", body)
            .await;
    }

    (
        Status::Ok,
        Json(ApiResponse {
            message: "User removed successfully".to_string(),
            result: None,
        }),
    )
}

/// Announcements posted at the district level, shown on the admin home
/// screen regardless of village.
#[get("/announcement-administrator")]
pub async fn administrator_announcements(
    user_repo: &State<UserRepository>,
    announcement_repo: &State<AnnouncementRepository>,
) -> (Status, Json<ApiResponse<Vec<Announcement>>>) {
    let administrators = match user_repo.find_by_type("administrator").await {
        Ok(administrators) => administrators,
        Err(e) => {
            log::error!("error fetching administrators: {}", e);
            return internal_error();
        }
    };
    if administrators.is_empty() {
        return not_found("No administrators found");
    }

    let names: Vec<String> = administrators
        .into_iter()
        .filter_map(|u| u.name)
        .collect();

    match announcement_repo.find_by_admins(&names).await {
        Ok(announcements) if !announcements.is_empty() => (
            Status::Ok,
            Json(ApiResponse {
                message: "200: Success".to_string(),
                result: Some(announcements),
            }),
        ),
        Ok(_) => not_found("No announcements found"),
        Err(e) => {
            log::error!("error fetching announcements: {}", e);
            internal_error()
        }
    }
}
