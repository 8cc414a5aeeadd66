use rust_decimal::Decimal;
use serde::Deserialize;

/// Top-level envelope for a `type=product` request.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductResponse {
    pub request_info: RequestInfo,
    pub product: Option<Product>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestInfo {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Product payload as returned by the Rainforest product endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub title: Option<String>,
    pub asin: Option<String>,
    pub link: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub ratings_total: Option<u64>,
    #[serde(default)]
    pub availability: Option<Availability>,
    pub main_image: Option<Image>,
    #[serde(default)]
    pub images: Vec<Image>,
    pub buybox_winner: Option<BuyboxWinner>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Availability {
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub link: String,
}

/// Current buybox offer, where the price lives.
#[derive(Debug, Clone, Deserialize)]
pub struct BuyboxWinner {
    pub price: Option<Price>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    pub value: Option<Decimal>,
    pub currency: Option<String>,
}
