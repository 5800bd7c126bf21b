//! Field-level checks applied to inbound ARV requests before the pipeline
//! runs. Everything past this point may assume the documented bounds hold.

use serde_json::{Map, Value};

use super::domain::{Comp, MainProperty, PropertyDetails};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("mainProperty is required and must be an object")]
    MissingMainProperty,
    #[error("Invalid mainProperty address")]
    InvalidAddress,
    #[error("Invalid mainProperty bedrooms")]
    InvalidBedrooms,
    #[error("Invalid mainProperty bathrooms")]
    InvalidBathrooms,
    #[error("Invalid mainProperty square footage")]
    InvalidSquareFootage,
    #[error("mainProperty details are required and must be an object")]
    MissingDetails,
    #[error("Invalid mainProperty details.{0}")]
    InvalidDetail(&'static str),
    #[error("comps is required and must be a non-empty array")]
    MissingComps,
    #[error("Each comp must be an object")]
    CompNotObject,
    #[error("Invalid comp address")]
    InvalidCompAddress,
    #[error("Invalid comp detailUrl")]
    InvalidCompDetailUrl,
    #[error("Invalid comp hdpData")]
    InvalidCompListing,
    #[error("Invalid comp hdpData.homeInfo.price")]
    InvalidCompPrice,
}

/// Validates an `{ mainProperty, comps }` payload and converts it into typed records.
pub fn parse_request(payload: &Value) -> Result<(MainProperty, Vec<Comp>), ValidationError> {
    let main = payload
        .get("mainProperty")
        .and_then(Value::as_object)
        .ok_or(ValidationError::MissingMainProperty)?;
    let main = parse_main_property(main)?;

    let comps = payload
        .get("comps")
        .and_then(Value::as_array)
        .filter(|comps| !comps.is_empty())
        .ok_or(ValidationError::MissingComps)?;
    let comps = comps
        .iter()
        .map(parse_comp)
        .collect::<Result<Vec<_>, _>>()?;

    Ok((main, comps))
}

fn parse_main_property(main: &Map<String, Value>) -> Result<MainProperty, ValidationError> {
    let address = non_blank_str(main.get("address")).ok_or(ValidationError::InvalidAddress)?;
    let bedrooms = number_where(main.get("bedrooms"), |value| value >= 0.0)
        .ok_or(ValidationError::InvalidBedrooms)?;
    let bathrooms = number_where(main.get("bathrooms"), |value| value >= 0.0)
        .ok_or(ValidationError::InvalidBathrooms)?;
    let square_footage = number_where(main.get("squareFootage"), |value| value > 0.0)
        .ok_or(ValidationError::InvalidSquareFootage)?;
    let details = main
        .get("details")
        .and_then(Value::as_object)
        .ok_or(ValidationError::MissingDetails)?;

    Ok(MainProperty {
        address: address.to_string(),
        bedrooms,
        bathrooms,
        square_footage,
        detail_url: main
            .get("detailUrl")
            .and_then(Value::as_str)
            .map(str::to_string),
        details: parse_details(details)?,
    })
}

fn parse_details(details: &Map<String, Value>) -> Result<PropertyDetails, ValidationError> {
    let neighborhood = non_blank_str(details.get("neighborhood"))
        .ok_or(ValidationError::InvalidDetail("neighborhood"))?;
    let has_pool = details
        .get("hasPool")
        .and_then(Value::as_bool)
        .ok_or(ValidationError::InvalidDetail("hasPool"))?;
    let lot_size = number_where(details.get("lotSize"), |value| value > 0.0)
        .ok_or(ValidationError::InvalidDetail("lotSize"))?;
    let year_built = number_where(details.get("yearBuilt"), |value| {
        value > 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX)
    })
    .ok_or(ValidationError::InvalidDetail("yearBuilt"))?;
    let condition = non_blank_str(details.get("condition"))
        .ok_or(ValidationError::InvalidDetail("condition"))?;

    Ok(PropertyDetails {
        neighborhood: neighborhood.to_string(),
        has_pool,
        lot_size,
        year_built: year_built as u32,
        condition: condition.to_string(),
    })
}

fn parse_comp(comp: &Value) -> Result<Comp, ValidationError> {
    let comp = comp.as_object().ok_or(ValidationError::CompNotObject)?;

    non_blank_str(comp.get("address")).ok_or(ValidationError::InvalidCompAddress)?;
    comp.get("detailUrl")
        .and_then(Value::as_str)
        .filter(|url| url.starts_with("http"))
        .ok_or(ValidationError::InvalidCompDetailUrl)?;
    let home_info = comp
        .get("hdpData")
        .and_then(Value::as_object)
        .and_then(|listing| listing.get("homeInfo"))
        .filter(|home_info| !home_info.is_null())
        .ok_or(ValidationError::InvalidCompListing)?;
    number_where(home_info.get("price"), |value| value > 0.0)
        .ok_or(ValidationError::InvalidCompPrice)?;

    // Caller-supplied details are replaced during validation; everything else
    // on the listing is carried through to the response.
    let mut record = comp.clone();
    record.remove("details");

    serde_json::from_value(Value::Object(record)).map_err(|_| ValidationError::InvalidCompListing)
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|raw| !raw.trim().is_empty())
}

fn number_where(value: Option<&Value>, accept: impl Fn(f64) -> bool) -> Option<f64> {
    value
        .filter(|value| value.is_number())
        .and_then(Value::as_f64)
        .filter(|number| number.is_finite() && accept(*number))
}
