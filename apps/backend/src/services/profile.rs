//! Profile updates for the authenticated caller's donor or NGO row.

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::validation::required_text;
use crate::error::AppError;
use crate::repos::donors::{self, DonorProfileUpdate};
use crate::repos::ngos::{self, NgoProfileUpdate};

#[derive(Debug, Serialize)]
pub struct ProfileUpdated {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct DonorProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub pan_number: Option<String>,
    pub aadhaar_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NgoProfileRequest {
    pub registration_number: Option<String>,
    pub registration_date: Option<String>,
    pub category: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub website: Option<String>,
}

fn required(field: &str, value: &Option<String>) -> Result<String, AppError> {
    required_text(field, value.as_deref()).map(str::to_string)
}

impl TryFrom<&DonorProfileRequest> for DonorProfileUpdate {
    type Error = AppError;

    fn try_from(req: &DonorProfileRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required("name", &req.name)?,
            phone: required("phone", &req.phone)?,
            dob: req.dob.clone(),
            gender: req.gender.clone(),
            pan_number: req.pan_number.clone(),
            aadhaar_number: req.aadhaar_number.clone(),
        })
    }
}

impl TryFrom<&NgoProfileRequest> for NgoProfileUpdate {
    type Error = AppError;

    fn try_from(req: &NgoProfileRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            registration_number: required("registration_number", &req.registration_number)?,
            registration_date: required("registration_date", &req.registration_date)?,
            category: required("category", &req.category)?,
            phone: required("phone", &req.phone)?,
            city: required("city", &req.city)?,
            state: required("state", &req.state)?,
            country: required("country", &req.country)?,
            mission: req.mission.clone(),
            vision: req.vision.clone(),
            website: req.website.clone(),
        })
    }
}

pub async fn update_donor<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    req: &DonorProfileRequest,
) -> Result<ProfileUpdated, AppError> {
    let update = DonorProfileUpdate::try_from(req)?;
    if donors::update_profile(conn, user_id, &update).await? == 0 {
        return Err(AppError::donor_not_found());
    }
    info!(user_id, "Donor profile updated");
    Ok(ProfileUpdated {
        message: "Donor profile updated",
    })
}

pub async fn update_ngo<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    req: &NgoProfileRequest,
) -> Result<ProfileUpdated, AppError> {
    let update = NgoProfileUpdate::try_from(req)?;
    if ngos::update_profile(conn, user_id, &update).await? == 0 {
        return Err(AppError::ngo_not_found());
    }
    info!(user_id, "NGO profile updated");
    Ok(ProfileUpdated {
        message: "NGO profile updated",
    })
}
