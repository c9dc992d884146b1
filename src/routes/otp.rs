use rocket::http::Status;
use rocket::post;
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;

use crate::response::ApiResponse;
use crate::services::otp_store::{OtpStore, VerifyOutcome};
use crate::services::sms_client::SmsClient;

#[derive(Deserialize, Debug)]
pub struct SendOtpRequest {
    pub phone: String,
}

#[post("/send-otp", format = "json", data = "<request>")]
pub async fn send_otp(
    request: Json<SendOtpRequest>,
    store: &State<OtpStore>,
    sms: &State<SmsClient>,
) -> (Status, Json<ApiResponse<String>>) {
    let phone = request.into_inner().phone;
    if phone.trim().is_empty() {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "Phone number is required".to_string(),
                result: None,
            }),
        );
    }

    let code = store.issue(&phone);
    let message = format!("Your verification code is {}", code);
    if let Err(e) = sms.send(&phone, &message).await {
        log::error!("failed to deliver otp to {}: {}", phone, e);
    }

    (
        Status::Ok,
        Json(ApiResponse {
            message: "OTP sent successfully".to_string(),
            result: None,
        }),
    )
}

#[derive(Deserialize, Debug)]
pub struct VerifyOtpRequest {
    pub phone: String,
    pub otp: String,
}

#[post("/verify-otp", format = "json", data = "<request>")]
pub async fn verify_otp(
    request: Json<VerifyOtpRequest>,
    store: &State<OtpStore>,
) -> (Status, Json<ApiResponse<String>>) {
    let request = request.into_inner();
    match store.verify(&request.phone, &request.otp) {
        VerifyOutcome::Verified => (
            Status::Ok,
            Json(ApiResponse {
                message: "OTP verified successfully".to_string(),
                result: None,
            }),
        ),
        VerifyOutcome::Mismatch => (
            Status::BadRequest,
            Json(ApiResponse {
                message: "Invalid OTP".to_string(),
                result: None,
            }),
        ),
        VerifyOutcome::Expired => (
            Status::BadRequest,
            Json(ApiResponse {
                message: "OTP expired".to_string(),
                result: None,
            }),
        ),
        VerifyOutcome::Unknown => (
            Status::BadRequest,
            Json(ApiResponse {
                message: "No OTP issued for this phone".to_string(),
                result: None,
            }),
        ),
    }
}
