use serde::{Deserialize, Serialize};

fn default_user_type() -> String {
    "user".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub job_title: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// 0 = pending, 1 = activated by an admin.
    #[serde(default)]
    pub activation: i32,
    #[serde(default = "default_user_type")]
    pub user_type: String,
    /// Ration-card number, the real-world identity key.
    #[serde(rename = "raID")]
    pub ra_id: String,
    #[serde(rename = "photoID")]
    pub photo_id: Option<i32>,
}

/// Projection produced by the president-per-village aggregation.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PresidentRow {
    pub name: Option<String>,
    #[serde(rename = "photoID")]
    pub photo_id: Option<i32>,
    pub place_name: String,
}

/// Contact-card projection of an admin user.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AdminContact {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub job_title: Option<String>,
    #[serde(rename = "photoID")]
    pub photo_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_preserved() {
        let user = User {
            id: 7,
            username: "ammu".to_string(),
            name: Some("Ammu".to_string()),
            phone: None,
            address: Some("Kumarakom".to_string()),
            job_title: None,
            email: None,
            password: None,
            activation: 1,
            user_type: "admin".to_string(),
            ra_id: "RA-1234".to_string(),
            photo_id: Some(2),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["raID"], "RA-1234");
        assert_eq!(json["photoID"], 2);
        assert!(json.get("ra_id").is_none());
    }

    #[test]
    fn activation_and_user_type_default_on_old_documents() {
        let user: User =
            serde_json::from_str(r#"{"id": 1, "username": "raju", "raID": "RA-9"}"#).unwrap();
        assert_eq!(user.activation, 0);
        assert_eq!(user.user_type, "user");
    }
}
