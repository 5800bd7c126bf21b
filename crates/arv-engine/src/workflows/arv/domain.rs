use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const UNKNOWN: &str = "Unknown";

/// Attribute record compared between the subject property and each comp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    pub neighborhood: String,
    pub has_pool: bool,
    pub lot_size: f64,
    pub year_built: u32,
    pub condition: String,
}

impl PropertyDetails {
    /// Defaults attached to every comp when none survives validation.
    pub fn placeholder() -> Self {
        Self {
            neighborhood: UNKNOWN.to_string(),
            has_pool: false,
            lot_size: 0.0,
            year_built: 0,
            condition: UNKNOWN.to_string(),
        }
    }
}

/// The property being valued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainProperty {
    pub address: String,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub square_footage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
    pub details: PropertyDetails,
}

/// Listing record wrapping the sale facts of a comp (`hdpData` on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleListing {
    pub home_info: HomeInfo,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeInfo {
    pub price: f64,
    /// Listing facts beyond the sale price, echoed back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A candidate comparable sale. `details` stays empty until validation
/// extracts it from `detail_url`. Fields the caller sent that the pipeline
/// does not read (listing ids, tax history, ...) ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comp {
    pub address: String,
    pub detail_url: String,
    pub hdp_data: SaleListing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<PropertyDetails>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Comp {
    pub fn new(address: impl Into<String>, detail_url: impl Into<String>, price: f64) -> Self {
        Self {
            address: address.into(),
            detail_url: detail_url.into(),
            hdp_data: SaleListing {
                home_info: HomeInfo {
                    price,
                    extra: Map::new(),
                },
                extra: Map::new(),
            },
            details: None,
            extra: Map::new(),
        }
    }

    pub fn sale_price(&self) -> f64 {
        self.hdp_data.home_info.price
    }

    pub fn with_details(mut self, details: PropertyDetails) -> Self {
        self.details = Some(details);
        self
    }
}

/// Final valuation handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArvResult {
    pub arv: f64,
    pub explanation: String,
    pub validated_comps: Vec<Comp>,
}
