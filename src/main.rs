#[macro_use]
extern crate rocket;

mod config;
mod models;
mod repository;
mod response;
mod routes;
mod services;

use mongodb::Client;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{Request, Response};

use config::AppConfig;
use repository::announcement_repository::AnnouncementRepository;
use repository::counter_repository::CounterRepository;
use repository::crop_repository::{CropRepository, PriceRepository};
use repository::image_repository::ImageRepository;
use repository::market_repository::{BuyRepository, SellRepository};
use repository::place_repository::PlaceRepository;
use repository::query_repository::QueryRepository;
use repository::suggestion_repository::SuggestionRepository;
use repository::user_repository::UserRepository;
use repository::weather_repository::WeatherRepository;
use response::ApiResponse;
use services::mailer::Mailer;
use services::otp_store::OtpStore;
use services::sms_client::SmsClient;
use services::weather_client::WeatherClient;

pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PUT, DELETE, OPTIONS",
        ));
        response.set_header(Header::new(
            "Access-Control-Allow-Headers",
            "Content-Type, Authorization",
        ));
    }
}

#[options("/<_path..>")]
fn all_options(_path: std::path::PathBuf) -> Status {
    Status::Ok
}

#[catch(404)]
fn not_found(req: &Request) -> Json<ApiResponse<String>> {
    Json(ApiResponse {
        message: format!("404: '{}' route not found", req.uri()),
        result: None,
    })
}

#[launch]
async fn rocket() -> _ {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env();

    let client = Client::with_uri_str(&config.mongo_uri)
        .await
        .unwrap_or_else(|e| {
            log::error!("failed to connect to MongoDB at {}: {}", config.mongo_uri, e);
            std::process::exit(1);
        });

    let mailer = Mailer::from_config(&config).unwrap_or_else(|e| {
        log::error!("failed to configure SMTP transport: {}", e);
        std::process::exit(1);
    });

    let weather_client = WeatherClient::new(config.weather_key.clone());
    let sms_client = SmsClient::from_config(&config);

    rocket::build()
        .manage(UserRepository::new(&client))
        .manage(PlaceRepository::new(&client))
        .manage(AnnouncementRepository::new(&client))
        .manage(SuggestionRepository::new(&client))
        .manage(QueryRepository::new(&client))
        .manage(CropRepository::new(&client))
        .manage(PriceRepository::new(&client))
        .manage(SellRepository::new(&client))
        .manage(BuyRepository::new(&client))
        .manage(WeatherRepository::new(&client))
        .manage(ImageRepository::new(&client))
        .manage(CounterRepository::new(&client))
        .manage(weather_client)
        .manage(mailer)
        .manage(sms_client)
        .manage(OtpStore::new())
        .attach(Cors)
        .mount(
            "/",
            routes![
                all_options,
                routes::auth::signup,
                routes::auth::login,
                routes::auth::locations,
                routes::user::weather,
                routes::user::announcements,
                routes::user::crops_by_place,
                routes::user::suggestions,
                routes::user::create_suggestion,
                routes::user::create_query,
                routes::user::queries,
                routes::user::admins,
                routes::user::profile,
                routes::user::update_profile,
                routes::market::create_sell,
                routes::market::list_sells,
                routes::market::filter_sells,
                routes::market::mark_sold,
                routes::market::purchases,
                routes::market::notifications,
                routes::market::create_notification,
                routes::market::confirm_purchase,
                routes::market::delete_notification,
                routes::admin::create_announcement,
                routes::admin::update_announcement,
                routes::admin::delete_announcement,
                routes::admin::activate_user,
                routes::admin::deactivate_user,
                routes::admin::pending_users,
                routes::admin::admin_queries,
                routes::admin::respond_query,
                routes::admin::respond_suggestion,
                routes::admin::all_crops,
                routes::admin::update_price,
                routes::admin::add_price,
                routes::admin::update_average_price,
                routes::admin::add_crop,
                routes::admin::admin_users,
                routes::admin::remove_admin,
                routes::admin::address,
                routes::admin::update_user,
                routes::admin::add_admin,
                routes::admin::activated_users,
                routes::admin::remove_user,
                routes::admin::administrator_announcements,
                routes::administrator::presidents,
                routes::administrator::count_users,
                routes::administrator::all_admins,
                routes::administrator::add_place,
                routes::administrator::add_admin_user,
                routes::administrator::send_email,
                routes::image::upload,
                routes::image::image,
                routes::otp::send_otp,
                routes::otp::verify_otp,
            ],
        )
        .register("/", catchers![not_found])
}
