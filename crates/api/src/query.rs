//! Query parameter types shared by handler modules.

use lembranca_core::qr::QrFormat;
use lembranca_core::types::DbId;
use serde::Deserialize;

/// `GET /memorials?funeral_home_id=&family_user_id=` (admin filters).
#[derive(Debug, Default, Deserialize)]
pub struct MemorialListParams {
    pub funeral_home_id: Option<DbId>,
    pub family_user_id: Option<DbId>,
}

/// `GET /memorials/public?historical=`
#[derive(Debug, Default, Deserialize)]
pub struct PublicMemorialParams {
    pub historical: Option<bool>,
}

/// `GET /memorials/by-slug/{slug}/qr-code?format=&base_url=`
#[derive(Debug, Default, Deserialize)]
pub struct QrCodeParams {
    #[serde(default)]
    pub format: QrFormat,
    pub base_url: Option<String>,
}

/// Status filter by lookup-table name (`?status=pending`).
#[derive(Debug, Default, Deserialize)]
pub struct StatusFilterParams {
    pub status: Option<String>,
}

/// `GET /admin/orders?status=&priority=`
#[derive(Debug, Default, Deserialize)]
pub struct OrderListParams {
    pub status: Option<String>,
    pub priority: Option<String>,
}
