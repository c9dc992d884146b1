use chrono::Utc;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{delete, get, post, put, State};
use serde::Deserialize;

use crate::models::market::{
    Buy, Purchase, SaleInfo, Sell, SellListing, SellerDetails, SellerNotification,
};
use crate::models::user::User;
use crate::repository::counter_repository::CounterRepository;
use crate::repository::market_repository::{BuyRepository, SellRepository};
use crate::repository::user_repository::UserRepository;
use crate::response::ApiResponse;

/// The buy screen never shows the requester their own listings, in either
/// filter mode.
fn exclude_own_listings(sells: Vec<Sell>, requester: Option<&str>) -> Vec<Sell> {
    match requester {
        Some(requester) => sells
            .into_iter()
            .filter(|s| s.sellername != requester)
            .collect(),
        None => sells,
    }
}

fn attach_seller_details(sells: Vec<Sell>, sellers: &[User]) -> Vec<SellListing> {
    sells
        .into_iter()
        .map(|sell| {
            let seller_details = sellers
                .iter()
                .find(|u| u.username == sell.sellername)
                .map(|u| SellerDetails {
                    username: u.username.clone(),
                    name: u.name.clone(),
                    phone: u.phone.clone(),
                    address: u.address.clone(),
                });
            SellListing {
                sell,
                seller_details,
            }
        })
        .collect()
}

#[derive(Deserialize, Debug)]
pub struct CreateSellRequest {
    pub sellername: String,
    pub cropname: String,
    pub quantity: i32,
    pub price: f64,
}

#[post("/sell", format = "json", data = "<request>")]
pub async fn create_sell(
    request: Json<CreateSellRequest>,
    sell_repo: &State<SellRepository>,
    counter_repo: &State<CounterRepository>,
) -> (Status, Json<ApiResponse<Sell>>) {
    let request = request.into_inner();
    let id = match counter_repo.next_sequence("Sell").await {
        Ok(Some(id)) => id,
        Ok(None) => {
            log::error!("counter document for \"Sell\" is missing");
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Error creating sell entry".to_string(),
                    result: None,
                }),
            );
        }
        Err(e) => {
            log::error!("error drawing sell id: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Error creating sell entry".to_string(),
                    result: None,
                }),
            );
        }
    };

    let sell = Sell {
        id,
        sellername: request.sellername,
        cropname: request.cropname,
        quantity: request.quantity,
        price: request.price,
        date_updated: Utc::now(),
        sold: false,
    };

    match sell_repo.insert(&sell).await {
        Ok(_) => (
            Status::Ok,
            Json(ApiResponse {
                message: "Crop listed for sale successfully".to_string(),
                result: Some(sell),
            }),
        ),
        Err(e) => {
            log::error!("error inserting sell entry: {}", e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Error creating sell entry".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[get("/sell?<sellername>&<sold>")]
pub async fn list_sells(
    sellername: Option<String>,
    sold: Option<bool>,
    sell_repo: &State<SellRepository>,
) -> (Status, Json<ApiResponse<Vec<Sell>>>) {
    let Some(sellername) = sellername else {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "Sellername is required".to_string(),
                result: None,
            }),
        );
    };

    match sell_repo.find_by_seller(&sellername, sold).await {
        Ok(sells) if !sells.is_empty() => (
            Status::Ok,
            Json(ApiResponse {
                message: "200: Success".to_string(),
                result: Some(sells),
            }),
        ),
        Ok(_) => (
            Status::NotFound,
            Json(ApiResponse {
                message: "No records found".to_string(),
                result: None,
            }),
        ),
        Err(e) => {
            log::error!("error fetching sell entries: {}", e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Server error".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[get("/sell/filter?<filter>&<username>")]
pub async fn filter_sells(
    filter: Option<String>,
    username: Option<String>,
    sell_repo: &State<SellRepository>,
    user_repo: &State<UserRepository>,
) -> (Status, Json<ApiResponse<Vec<SellListing>>>) {
    let filter = filter.unwrap_or_default();
    if filter != "my-village" && filter != "all-village" {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "Invalid filter value".to_string(),
                result: None,
            }),
        );
    }
    if filter == "my-village" && username.is_none() {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "Username is required for my-village filter".to_string(),
                result: None,
            }),
        );
    }

    let sells = if filter == "my-village" {
        let username = username.as_deref().unwrap_or_default();
        let user = match user_repo.find_by_username(username).await {
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
                        message: "An error occurred while fetching sell items".to_string(),
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
                        message: "An error occurred while fetching sell items".to_string(),
                        result: None,
                    }),
                );
            }
        };
        let sellers: Vec<String> = neighbours
            .into_iter()
            .map(|u| u.username)
            .filter(|u| u != username)
            .collect();
        sell_repo.find_unsold_by_sellers(&sellers).await
    } else {
        sell_repo.find_unsold().await
    };

    let sells = match sells {
        Ok(sells) => sells,
        Err(e) => {
            log::error!("error fetching sell items: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "An error occurred while fetching sell items".to_string(),
                    result: None,
                }),
            );
        }
    };

    let sells = exclude_own_listings(sells, username.as_deref());
    let seller_names: Vec<String> = sells.iter().map(|s| s.sellername.clone()).collect();
    let sellers = match user_repo.find_by_usernames(&seller_names).await {
        Ok(sellers) => sellers,
        Err(e) => {
            log::error!("error fetching seller details: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "An error occurred while fetching sell items".to_string(),
                    result: None,
                }),
            );
        }
    };

    (
        Status::Ok,
        Json(ApiResponse {
            message: "200: Success".to_string(),
            result: Some(attach_seller_details(sells, &sellers)),
        }),
    )
}

#[put("/sell/<id>")]
pub async fn mark_sold(
    id: i32,
    sell_repo: &State<SellRepository>,
) -> (Status, Json<ApiResponse<Sell>>) {
    match sell_repo.mark_sold(id).await {
        Ok(matched) if matched > 0 => match sell_repo.find_by_id(id).await {
            Ok(sell) => (
                Status::Ok,
                Json(ApiResponse {
                    message: "Crop marked as sold".to_string(),
                    result: sell,
                }),
            ),
            Err(e) => {
                log::error!("error re-reading sell entry: {}", e);
                (
                    Status::Ok,
                    Json(ApiResponse {
                        message: "Crop marked as sold".to_string(),
                        result: None,
                    }),
                )
            }
        },
        Ok(_) => (
            Status::NotFound,
            Json(ApiResponse {
                message: "Crop not found".to_string(),
                result: None,
            }),
        ),
        Err(e) => {
            log::error!("error updating sell entry: {}", e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Error updating sell entry".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[get("/buy?<buyername>")]
pub async fn purchases(
    buyername: Option<String>,
    buy_repo: &State<BuyRepository>,
    sell_repo: &State<SellRepository>,
    user_repo: &State<UserRepository>,
) -> (Status, Json<ApiResponse<Vec<Purchase>>>) {
    let Some(buyername) = buyername else {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "Buyername is required".to_string(),
                result: None,
            }),
        );
    };

    let buys = match buy_repo.find_completed_by_buyer(&buyername).await {
        Ok(buys) => buys,
        Err(e) => {
            log::error!("error fetching purchases: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Error fetching purchases".to_string(),
                    result: None,
                }),
            );
        }
    };

    // Manual populate: the sell_id join has no native reference.
    let mut populated = Vec::with_capacity(buys.len());
    for buy in buys {
        let sell = match sell_repo.find_by_id(buy.sell_id).await {
            Ok(sell) => sell,
            Err(e) => {
                log::error!("error resolving sell {}: {}", buy.sell_id, e);
                None
            }
        };
        let sell_info = match sell {
            Some(sell) => {
                let seller = match user_repo.find_by_username(&sell.sellername).await {
                    Ok(seller) => seller,
                    Err(e) => {
                        log::error!("error resolving seller {}: {}", sell.sellername, e);
                        None
                    }
                };
                Some(SaleInfo {
                    cropname: sell.cropname,
                    price: sell.price,
                    quantity: sell.quantity,
                    address: seller.and_then(|u| u.address),
                })
            }
            None => None,
        };
        populated.push(Purchase { buy, sell_info });
    }

    (
        Status::Ok,
        Json(ApiResponse {
            message: "200: Success".to_string(),
            result: Some(populated),
        }),
    )
}

#[get("/notify?<username>")]
pub async fn notifications(
    username: Option<String>,
    buy_repo: &State<BuyRepository>,
    sell_repo: &State<SellRepository>,
    user_repo: &State<UserRepository>,
) -> (Status, Json<ApiResponse<Vec<SellerNotification>>>) {
    let Some(username) = username else {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "Username is required".to_string(),
                result: None,
            }),
        );
    };

    let pending = match buy_repo.find_pending_by_seller(&username).await {
        Ok(pending) => pending,
        Err(e) => {
            log::error!("error fetching notifications: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Server Error".to_string(),
                    result: None,
                }),
            );
        }
    };

    let mut enriched = Vec::with_capacity(pending.len());
    for buy in pending {
        let buyerphone = match user_repo.find_by_username(&buy.buyername).await {
            Ok(buyer) => buyer.and_then(|u| u.phone),
            Err(e) => {
                log::error!("error resolving buyer {}: {}", buy.buyername, e);
                None
            }
        };
        let cropname = match sell_repo.find_by_id(buy.sell_id).await {
            Ok(sell) => sell.map(|s| s.cropname),
            Err(e) => {
                log::error!("error resolving sell {}: {}", buy.sell_id, e);
                None
            }
        };
        enriched.push(SellerNotification {
            buy,
            buyerphone,
            cropname,
        });
    }

    (
        Status::Ok,
        Json(ApiResponse {
            message: "200: Success".to_string(),
            result: Some(enriched),
        }),
    )
}

#[derive(Deserialize, Debug)]
pub struct NotifyRequest {
    pub buyername: String,
    pub sellername: String,
    pub sell_id: i32,
}

#[post("/notify", format = "json", data = "<request>")]
pub async fn create_notification(
    request: Json<NotifyRequest>,
    buy_repo: &State<BuyRepository>,
    sell_repo: &State<SellRepository>,
    counter_repo: &State<CounterRepository>,
) -> (Status, Json<ApiResponse<Buy>>) {
    let request = request.into_inner();

    match sell_repo.find_by_id(request.sell_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                Status::NotFound,
                Json(ApiResponse {
                    message: "Sell entry not found".to_string(),
                    result: None,
                }),
            );
        }
        Err(e) => {
            log::error!("error finding sell entry: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Error creating notification".to_string(),
                    result: None,
                }),
            );
        }
    }

    match buy_repo
        .find_duplicate(&request.buyername, &request.sellername, request.sell_id)
        .await
    {
        Ok(Some(_)) => {
            return (
                Status::BadRequest,
                Json(ApiResponse {
                    message:
                        "Notification already exists for this buyer, seller, and sell_id combination."
                            .to_string(),
                    result: None,
                }),
            );
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("error checking for duplicate notification: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Error creating notification".to_string(),
                    result: None,
                }),
            );
        }
    }

    let id = match counter_repo.next_sequence("Buy").await {
        Ok(Some(id)) => id,
        Ok(None) => {
            log::error!("counter document for \"Buy\" is missing");
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Error creating notification".to_string(),
                    result: None,
                }),
            );
        }
        Err(e) => {
            log::error!("error drawing buy id: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Error creating notification".to_string(),
                    result: None,
                }),
            );
        }
    };

    let notification = Buy {
        id,
        buyername: request.buyername,
        sell_id: request.sell_id,
        sellername: request.sellername,
        date: Utc::now(),
        buy: false,
    };

    match buy_repo.insert(&notification).await {
        Ok(_) => (
            Status::Created,
            Json(ApiResponse {
                message: "Notification sent to the seller and saved successfully".to_string(),
                result: Some(notification),
            }),
        ),
        Err(e) => {
            log::error!("error inserting notification: {}", e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Error creating notification".to_string(),
                    result: None,
                }),
            )
        }
    }
}

// The buy flag is one-way: once true the purchase is final.
#[put("/notify/<id>")]
pub async fn confirm_purchase(
    id: i32,
    buy_repo: &State<BuyRepository>,
) -> (Status, Json<ApiResponse<Buy>>) {
    let notification = match buy_repo.find_by_id(id).await {
        Ok(Some(notification)) => notification,
        Ok(None) => {
            return (
                Status::NotFound,
                Json(ApiResponse {
                    message: "Notification not found".to_string(),
                    result: None,
                }),
            );
        }
        Err(e) => {
            log::error!("error finding notification: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Server Error".to_string(),
                    result: None,
                }),
            );
        }
    };

    if notification.buy {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "Buy status is already true".to_string(),
                result: None,
            }),
        );
    }

    match buy_repo.mark_bought(id).await {
        Ok(_) => {
            let mut updated = notification;
            updated.buy = true;
            (
                Status::Ok,
                Json(ApiResponse {
                    message: "Purchase confirmed".to_string(),
                    result: Some(updated),
                }),
            )
        }
        Err(e) => {
            log::error!("error updating notification: {}", e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Server Error".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[delete("/notify/<id>")]
pub async fn delete_notification(
    id: i32,
    buy_repo: &State<BuyRepository>,
) -> (Status, Json<ApiResponse<String>>) {
    let notification = match buy_repo.find_by_id(id).await {
        Ok(Some(notification)) => notification,
        Ok(None) => {
            return (
                Status::NotFound,
                Json(ApiResponse {
                    message: "Notification not found".to_string(),
                    result: None,
                }),
            );
        }
        Err(e) => {
            log::error!("error finding notification: {}", e);
            return (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Server Error".to_string(),
                    result: None,
                }),
            );
        }
    };

    if notification.buy {
        return (
            Status::BadRequest,
            Json(ApiResponse {
                message: "Cannot delete: Buy status is true".to_string(),
                result: None,
            }),
        );
    }

    match buy_repo.delete_by_id(id).await {
        Ok(_) => (
            Status::Ok,
            Json(ApiResponse {
                message: "Notification deleted".to_string(),
                result: None,
            }),
        ),
        Err(e) => {
            log::error!("error deleting notification: {}", e);
            (
                Status::InternalServerError,
                Json(ApiResponse {
                    message: "Server Error".to_string(),
                    result: None,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sell(id: i32, sellername: &str) -> Sell {
        Sell {
            id,
            sellername: sellername.to_string(),
            cropname: "Paddy".to_string(),
            quantity: 10,
            price: 2200.0,
            date_updated: Utc::now(),
            sold: false,
        }
    }

    fn user(username: &str, address: &str) -> User {
        User {
            id: 1,
            username: username.to_string(),
            name: Some(username.to_string()),
            phone: Some("9876543210".to_string()),
            address: Some(address.to_string()),
            job_title: None,
            email: None,
            password: None,
            activation: 1,
            user_type: "user".to_string(),
            ra_id: format!("RA-{}", username),
            photo_id: None,
        }
    }

    #[test]
    fn own_listings_are_always_excluded() {
        let sells = vec![sell(1, "meera"), sell(2, "raju"), sell(3, "meera")];
        let filtered = exclude_own_listings(sells, Some("meera"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].sellername, "raju");
    }

    #[test]
    fn missing_requester_excludes_nothing() {
        let sells = vec![sell(1, "meera"), sell(2, "raju")];
        assert_eq!(exclude_own_listings(sells, None).len(), 2);
    }

    #[test]
    fn seller_details_attach_by_username() {
        let sells = vec![sell(1, "raju"), sell(2, "ghost")];
        let sellers = vec![user("raju", "Kumarakom")];
        let listings = attach_seller_details(sells, &sellers);

        let raju = &listings[0];
        assert_eq!(
            raju.seller_details.as_ref().unwrap().address.as_deref(),
            Some("Kumarakom")
        );
        // Sellers that no longer resolve keep the listing but carry no details.
        assert!(listings[1].seller_details.is_none());
    }

    #[test]
    fn listing_json_nests_seller_details_under_wire_name() {
        let listings = attach_seller_details(vec![sell(1, "raju")], &[user("raju", "Kumarakom")]);
        let json = serde_json::to_value(&listings[0]).unwrap();
        assert_eq!(json["sellername"], "raju");
        assert_eq!(json["sellerDetails"]["phone"], "9876543210");
    }
}
