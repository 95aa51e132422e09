use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::schema::farmers;
use crate::utils::error::{AgriAssistError, Result};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, PartialEq, Serialize)]
#[diesel(table_name = farmers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Farmer {
    pub id: i32,
    pub name: String,
    pub farm_type: String,
    pub soil_type: String,
    pub area: String,
    pub region: String,
    pub state: String,
    pub district: String,
}

#[derive(Debug, Clone, Insertable, PartialEq)]
#[diesel(table_name = farmers)]
pub struct NewFarmer {
    pub name: String,
    pub farm_type: String,
    pub soil_type: String,
    pub area: String,
    pub region: String,
    pub state: String,
    pub district: String,
}

/// Raw registration form as submitted by the browser
///
/// Every field is optional here so a missing one can be reported by name
/// instead of failing the whole form extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FarmerForm {
    pub name: Option<String>,
    pub farm_type: Option<String>,
    pub soil_type: Option<String>,
    pub area: Option<String>,
    pub region: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
}

fn required(value: Option<String>, field: &'static str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AgriAssistError::MissingField(field)),
    }
}

impl FarmerForm {
    /// Validate the form; values are stored exactly as submitted
    pub fn into_new_farmer(self) -> Result<NewFarmer> {
        Ok(NewFarmer {
            name: required(self.name, "name")?,
            farm_type: required(self.farm_type, "farm_type")?,
            soil_type: required(self.soil_type, "soil_type")?,
            area: required(self.area, "area")?,
            region: required(self.region, "region")?,
            state: required(self.state, "state")?,
            district: required(self.district, "district")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> FarmerForm {
        FarmerForm {
            name: Some("Asha".into()),
            farm_type: Some("Organic".into()),
            soil_type: Some("loamy".into()),
            area: Some("2 acres".into()),
            region: Some("South".into()),
            state: Some("Karnataka".into()),
            district: Some("Mysuru".into()),
        }
    }

    #[test]
    fn test_complete_form_is_accepted_verbatim() {
        let mut form = full_form();
        form.area = Some(" 2 acres ".into());

        let farmer = form.into_new_farmer().unwrap();
        assert_eq!(farmer.name, "Asha");
        assert_eq!(farmer.area, " 2 acres ");
        assert_eq!(farmer.district, "Mysuru");
    }

    #[test]
    fn test_missing_field_is_named() {
        let mut form = full_form();
        form.region = None;

        let err = form.into_new_farmer().unwrap_err();
        assert!(matches!(err, AgriAssistError::MissingField("region")));
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let mut form = full_form();
        form.district = Some("   ".into());

        let err = form.into_new_farmer().unwrap_err();
        assert!(matches!(err, AgriAssistError::MissingField("district")));
    }

    #[test]
    fn test_first_missing_field_wins() {
        let err = FarmerForm::default().into_new_farmer().unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: name");
    }
}
