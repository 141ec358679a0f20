use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateCompanyDto {
    #[validate(length(min = 1, max = 100, message = "Company name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(length(min = 1, message = "Link is required"))]
    pub link: String,

    #[validate(length(min = 1, message = "Primary color is required"))]
    pub p_color: String,

    #[validate(length(min = 1, message = "Secondary color is required"))]
    pub s_color: String,

    #[validate(length(min = 1, message = "Background primary color is required"))]
    pub bp_color: String,

    #[validate(length(min = 1, message = "Background secondary color is required"))]
    pub bs_color: String,

    #[validate(length(min = 1, message = "PIN is required"))]
    pub pin: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateCompanyDto {
    #[validate(length(min = 1, max = 100, message = "Company name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(length(min = 1, message = "Link is required"))]
    pub link: String,

    pub p_color: Option<String>,
    pub s_color: Option<String>,
}
