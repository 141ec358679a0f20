use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::usermodel::User;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginQueryDto {
    pub token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub fb_id: String,
    pub username: String,
    pub money: i64,
    pub is_super_admin: bool,
    pub is_manager: bool,
}

impl FilterUserDto {
    pub fn filter_user(user: &User, is_super_admin: bool, is_manager: bool) -> Self {
        FilterUserDto {
            fb_id: user.fb_id.clone(),
            username: user.username.clone(),
            money: user.money,
            is_super_admin,
            is_manager,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SetPinDto {
    #[validate(length(min = 4, max = 8, message = "PIN must be between 4-8 digits"))]
    pub pin: String,
}
