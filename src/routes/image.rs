use mongodb::bson::spec::BinarySubtype;
use mongodb::bson::Binary;
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::{ContentType, Status};
use rocket::serde::json::Json;
use rocket::tokio::io::AsyncReadExt;
use rocket::{get, post, FromForm, State};
use serde::Serialize;

use crate::models::image::{ImageBlob, ImageDoc};
use crate::repository::counter_repository::CounterRepository;
use crate::repository::image_repository::ImageRepository;
use crate::response::ApiResponse;

#[derive(FromForm)]
pub struct ImageUpload<'r> {
    pub image: TempFile<'r>,
}

#[derive(Serialize, Debug)]
pub struct UploadResult {
    #[serde(rename = "imageId")]
    pub image_id: i32,
}

#[post("/upload", data = "<upload>")]
pub async fn upload(
    upload: Form<ImageUpload<'_>>,
    image_repo: &State<ImageRepository>,
    counter_repo: &State<CounterRepository>,
) -> (Status, Json<ApiResponse<UploadResult>>) {
    let content_type = upload
        .image
        .content_type()
        .map(|ct| ct.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let name = upload
        .image
        .raw_name()
        .map(|n| n.dangerous_unsafe_unsanitized_raw().as_str().to_string())
        .unwrap_or_else(|| "upload".to_string());

    let mut bytes = Vec::new();
    let read = match upload.image.open().await {
        Ok(mut file) => file.read_to_end(&mut bytes).await,
        Err(e) => Err(e),
    };
    if let Err(e) = read {
        log::error!("error reading uploaded file: {}", e);
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "No file uploaded".to_string(),
                result: None,
            }),
        );
    }
    if bytes.is_empty() {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "No file uploaded".to_string(),
                result: None,
            }),
        );
    }

    let id = match counter_repo.next_sequence("image").await {
        Ok(Some(id)) => id,
        Ok(None) => {
            log::error!("counter document for \"image\" is missing");
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Error saving image".to_string(),
                    result: None,
                }),
            );
        }
        Err(e) => {
            log::error!("error drawing image id: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Error saving image".to_string(),
                    result: None,
                }),
            );
        }
    };

    let image = ImageDoc {
        id,
        name,
        img: ImageBlob {
            data: Binary {
                subtype: BinarySubtype::Generic,
                bytes,
            },
            content_type,
        },
    };

    match image_repo.insert(&image).await {
        Ok(_) => (
            Status::Ok,
            Json(ApiResponse {
                message: "Image uploaded successfully".to_string(),
                result: Some(UploadResult { image_id: image.id }),
            }),
        ),
        Err(e) => {
            log::error!("error inserting image: {}", e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Error saving image".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[get("/image/<id>")]
pub async fn image(
    id: i32,
    image_repo: &State<ImageRepository>,
) -> Result<(ContentType, Vec<u8>), Status> {
    match image_repo.find_by_id(id).await {
        Ok(Some(image)) => {
            let content_type = ContentType::parse_flexible(&image.img.content_type)
                .unwrap_or(ContentType::Binary);
            Ok((content_type, image.img.data.bytes))
        }
        Ok(None) => Err(Status::NotFound),
        Err(e) => {
            log::error!("error fetching image {}: {}", id, e);
            Err(Status::InternalServerError)
        }
    }
}
