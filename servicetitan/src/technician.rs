use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A technician as returned by the settings API.
///
/// Only the fields the dashboard reads are typed; everything else the API sends is kept in
/// `extra` so the proxy can pass records through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technician {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Technician {
    pub fn new(id: i64, name: impl Into<String>, active: bool) -> Self {
        Self {
            id,
            name: name.into(),
            active,
            extra: Map::new(),
        }
    }
}

/// Raw page envelope from `/settings/v2/tenant/{tenant}/technicians`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawTechnicianPage {
    pub data: Vec<Technician>,
    #[serde(default)]
    pub has_more: bool,
}

/// One page of technicians together with the request path it came from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianPage {
    pub path_used: String,
    pub count: usize,
    pub has_more: bool,
    pub technicians: Vec<Technician>,
}

/// Pagination and filter parameters for the technicians collection.
#[derive(Debug, Clone, Copy)]
pub struct TechnicianQuery {
    pub active: bool,
    pub page: u32,
    pub page_size: u32,
}

impl Default for TechnicianQuery {
    fn default() -> Self {
        Self {
            active: true,
            page: 1,
            page_size: 200,
        }
    }
}
