use chrono::Utc;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, post, put, State};
use serde::{Deserialize, Serialize};

use crate::models::crop::CropPriceInfo;
use crate::models::message::{Announcement, Query, Suggestion};
use crate::models::user::User;
use crate::models::weather::Weather;
use crate::repository::announcement_repository::AnnouncementRepository;
use crate::repository::counter_repository::CounterRepository;
use crate::repository::crop_repository::PriceRepository;
use crate::repository::query_repository::QueryRepository;
use crate::repository::suggestion_repository::SuggestionRepository;
use crate::repository::user_repository::UserRepository;
use crate::repository::weather_repository::WeatherRepository;
use crate::response::ApiResponse;
use crate::services::weather_client::{is_fresh, WeatherClient};

#[get("/weather?<username>&<lat>&<lon>")]
pub async fn weather(
    username: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    weather_repo: &State<WeatherRepository>,
    counter_repo: &State<CounterRepository>,
    weather_client: &State<WeatherClient>,
) -> (Status, Json<ApiResponse<Weather>>) {
    let (Some(username), Some(lat), Some(lon)) = (username, lat, lon) else {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "Username, latitude, and longitude are required.".to_string(),
                result: None,
            }),
        );
    };

    let cached = match weather_repo.find_by_username(&username).await {
        Ok(cached) => cached,
        Err(e) => {
            log::error!("error reading weather cache: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "500: Internal Server Error".to_string(),
                    result: None,
                }),
            );
        }
    };

    let now = Utc::now();
    if let Some(cached) = &cached {
        if is_fresh(cached.last_updated, now) {
            return (
                Status::Ok,
                Json(ApiResponse {
                    message: "200: Success".to_string(),
                    result: Some(cached.clone()),
                }),
            );
        }
    }

    let reading = match weather_client.current(lat, lon).await {
        Ok(reading) => reading,
        Err(e) => {
            log::error!("weather provider call failed: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Failed to fetch weather data from API".to_string(),
                    result: None,
                }),
            );
        }
    };

    match cached {
        Some(mut cached) => {
            let updated = weather_repo
                .update_reading(
                    &username,
                    &reading.temperature,
                    &reading.condition,
                    &reading.city,
                    now,
                )
                .await;
            if let Err(e) = updated {
                log::error!("error refreshing weather cache: {}", e);
                return (
                    Status::InternalServerError,
                    Json(ApiResponse {
                        message: "500: Internal Server Error".to_string(),
                        result: None,
                    }),
                );
            }
            cached.temperature = reading.temperature;
            cached.weather_condition = reading.condition;
            cached.city = reading.city;
            cached.last_updated = now;
            (
                Status::Ok,
                Json(ApiResponse {
                    message: "200: Success".to_string(),
                    result: Some(cached),
                }),
            )
        }
        None => {
            let id = match counter_repo.next_sequence("weather").await {
                Ok(Some(id)) => id,
                Ok(None) => {
                    log::error!("counter document for \"weather\" is missing");
                    return (
                        Status::InternalServerError,
                        Json(ApiResponse {
                            message: "500: Internal Server Error".to_string(),
                            result: None,
                        }),
                    );
                }
                Err(e) => {
                    log::error!("error drawing weather id: {}", e);
                    return (
                        Status::InternalServerError,
                        Json(ApiResponse {
                            message: "500: Internal Server Error".to_string(),
                            result: None,
                        }),
                    );
                }
            };
            let weather = Weather {
                id,
                username,
                temperature: reading.temperature,
                weather_condition: reading.condition,
                city: reading.city,
                last_updated: now,
            };
            match weather_repo.insert(&weather).await {
                Ok(_) => (
                    Status::Ok,
                    Json(ApiResponse {
                        message: "200: Success".to_string(),
                        result: Some(weather),
                    }),
                ),
                Err(e) => {
                    log::error!("error caching weather: {}", e);
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
    }
}

#[get("/announcements?<place>")]
pub async fn announcements(
    place: Option<String>,
    user_repo: &State<UserRepository>,
    announcement_repo: &State<AnnouncementRepository>,
) -> (Status, Json<ApiResponse<Vec<Announcement>>>) {
    let Some(place) = place else {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "Location is required".to_string(),
                result: None,
            }),
        );
    };

    let users = match user_repo.find_by_address(&place).await {
        Ok(users) => users,
        Err(e) => {
            log::error!("error finding users in {}: {}", place, e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "500: Internal Server Error".to_string(),
                    result: None,
                }),
            );
        }
    };
    if users.is_empty() {
        return (
            Status::NotFound,
            Json(ApiResponse {
                message: "No users found in the specified location.".to_string(),
                result: None,
            }),
        );
    }

    let names: Vec<String> = users.into_iter().filter_map(|u| u.name).collect();
    match announcement_repo.find_by_admins(&names).await {
        Ok(announcements) => (
            Status::Ok,
            Json(ApiResponse {
                message: "200: Success".to_string(),
                result: Some(announcements),
            }),
        ),
        Err(e) => {
            log::error!("error fetching announcements: {}", e);
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

// Empty villages legitimately return an empty list here, unlike most
// collection endpoints.
#[get("/crops/<place_id>")]
pub async fn crops_by_place(
    place_id: i32,
    price_repo: &State<PriceRepository>,
) -> (Status, Json<ApiResponse<Vec<CropPriceInfo>>>) {
    match price_repo.crops_for_place(place_id).await {
        Ok(rows) => (
            Status::Ok,
            Json(ApiResponse {
                message: "200: Success".to_string(),
                result: Some(rows),
            }),
        ),
        Err(e) => {
            log::error!("error fetching crops for place {}: {}", place_id, e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Failed to fetch crops".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[get("/suggestions?<username>")]
pub async fn suggestions(
    username: Option<String>,
    user_repo: &State<UserRepository>,
    suggestion_repo: &State<SuggestionRepository>,
) -> (Status, Json<ApiResponse<Vec<Suggestion>>>) {
    let Some(username) = username else {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "Username is required".to_string(),
                result: None,
            }),
        );
    };

    let user = match user_repo.find_by_username(&username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return (
                Status::NotFound,
                Json(ApiResponse {
                    message: "User not found".to_string(),
                    result: None,
                }),
            );
        }
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

    let address = user.address.unwrap_or_default();
    let neighbours = match user_repo.find_by_address(&address).await {
        Ok(neighbours) => neighbours,
        Err(e) => {
            log::error!("error finding users in {}: {}", address, e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "500: Internal Server Error".to_string(),
                    result: None,
                }),
            );
        }
    };
    let usernames: Vec<String> = neighbours.into_iter().map(|u| u.username).collect();

    match suggestion_repo.find_by_usernames(&usernames).await {
        Ok(suggestions) => (
            Status::Ok,
            Json(ApiResponse {
                message: "200: Success".to_string(),
                result: Some(suggestions),
            }),
        ),
        Err(e) => {
            log::error!("error fetching suggestions: {}", e);
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
pub struct CreateSuggestionRequest {
    pub title: String,
    pub content: String,
    pub username: String,
}

#[post("/createSuggestion", format = "json", data = "<request>")]
pub async fn create_suggestion(
    request: Json<CreateSuggestionRequest>,
    suggestion_repo: &State<SuggestionRepository>,
    counter_repo: &State<CounterRepository>,
) -> (Status, Json<ApiResponse<Suggestion>>) {
    let request = request.into_inner();
    let id = match counter_repo.next_sequence("suggestions").await {
        Ok(Some(id)) => id,
        Ok(None) => {
            log::error!("counter document for \"suggestions\" is missing");
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "500: Internal Server Error".to_string(),
                    result: None,
                }),
            );
        }
        Err(e) => {
            log::error!("error drawing suggestion id: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "500: Internal Server Error".to_string(),
                    result: None,
                }),
            );
        }
    };

    let suggestion = Suggestion {
        id,
        title: request.title,
        admin: None,
        content: request.content,
        username: request.username,
        created_at: Utc::now(),
        response: None,
    };

    match suggestion_repo.insert(&suggestion).await {
        Ok(_) => (
            Status::Ok,
            Json(ApiResponse {
                message: "Suggestion submitted successfully".to_string(),
                result: Some(suggestion),
            }),
        ),
        Err(e) => {
            log::error!("error inserting suggestion: {}", e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Database error".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct CreateQueryRequest {
    pub username: String,
    pub matter: String,
    pub time: chrono::DateTime<Utc>,
    #[serde(rename = "type")]
    pub query_type: i32,
}

#[post("/createQuery", format = "json", data = "<request>")]
pub async fn create_query(
    request: Json<CreateQueryRequest>,
    query_repo: &State<QueryRepository>,
    counter_repo: &State<CounterRepository>,
) -> (Status, Json<ApiResponse<Query>>) {
    let request = request.into_inner();
    let id = match counter_repo.next_sequence("queries").await {
        Ok(Some(id)) => id,
        Ok(None) => {
            log::error!("counter document for \"queries\" is missing");
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Failed to create query".to_string(),
                    result: None,
                }),
            );
        }
        Err(e) => {
            log::error!("error drawing query id: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Failed to create query".to_string(),
                    result: None,
                }),
            );
        }
    };

    let query = Query {
        id,
        username: request.username,
        admin: None,
        query_type: request.query_type,
        matter: request.matter,
        time: request.time,
        admin_response: None,
    };

    match query_repo.insert(&query).await {
        Ok(_) => (
            Status::Ok,
            Json(ApiResponse {
                message: "Query created successfully".to_string(),
                result: Some(query),
            }),
        ),
        Err(e) => {
            log::error!("error inserting query: {}", e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Failed to create query".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[get("/queries?<username>&<type>")]
pub async fn queries(
    username: Option<String>,
    r#type: Option<i32>,
    query_repo: &State<QueryRepository>,
) -> (Status, Json<ApiResponse<Vec<Query>>>) {
    let Some(username) = username else {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "Username query parameter is required".to_string(),
                result: None,
            }),
        );
    };
    let Some(query_type) = r#type else {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "Type query parameter is required".to_string(),
                result: None,
            }),
        );
    };

    match query_repo
        .find_by_username_and_type(&username, query_type)
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
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Failed to fetch queries".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AdminListing {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
}

#[get("/admins")]
pub async fn admins(
    user_repo: &State<UserRepository>,
) -> (Status, Json<ApiResponse<Vec<AdminListing>>>) {
    match user_repo.find_by_type("admin").await {
        Ok(admins) => {
            let listings = admins
                .into_iter()
                .map(|u| AdminListing {
                    name: u.name,
                    phone: u.phone,
                    job_title: u.job_title,
                })
                .collect();
            (
                Status::Ok,
                Json(ApiResponse {
                    message: "200: Success".to_string(),
                    result: Some(listings),
                }),
            )
        }
        Err(e) => {
            log::error!("error fetching admin contacts: {}", e);
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

#[get("/user/profile?<username>")]
pub async fn profile(
    username: Option<String>,
    user_repo: &State<UserRepository>,
) -> (Status, Json<ApiResponse<User>>) {
    let Some(username) = username else {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "Username is required".to_string(),
                result: None,
            }),
        );
    };

    match user_repo.find_by_username(&username).await {
        Ok(Some(user)) => (
            Status::Ok,
            Json(ApiResponse {
                message: "200: Success".to_string(),
                result: Some(user),
            }),
        ),
        Ok(None) => (
            Status::NotFound,
            Json(ApiResponse {
                message: "User not found".to_string(),
                result: None,
            }),
        ),
        Err(e) => {
            log::error!("error fetching profile: {}", e);
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
pub struct ProfileUpdateRequest {
    pub username: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(rename = "jobTitle")]
    pub job_title: String,
    pub email: String,
}

#[put("/user/profile/update", format = "json", data = "<request>")]
pub async fn update_profile(
    request: Json<ProfileUpdateRequest>,
    user_repo: &State<UserRepository>,
) -> (Status, Json<ApiResponse<String>>) {
    let request = request.into_inner();
    match user_repo
        .update_profile(
            &request.username,
            &request.name,
            &request.phone,
            &request.address,
            &request.job_title,
            &request.email,
        )
        .await
    {
        Ok(matched) if matched > 0 => (
            Status::Ok,
            Json(ApiResponse {
                message: "Profile updated successfully".to_string(),
                result: None,
            }),
        ),
        Ok(_) => (
            Status::NotFound,
            Json(ApiResponse {
                message: "User not found".to_string(),
                result: None,
            }),
        ),
        Err(e) => {
            log::error!("error updating profile: {}", e);
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
