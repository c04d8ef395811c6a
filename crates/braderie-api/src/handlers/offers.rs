//! Offer catalog handlers: list, detail, publish.

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::warn;

use braderie_models::{ImageDescriptor, Offer, OwnerSummary, ProductDetail};
use braderie_mongo::{MongoError, OfferFilter, PagePlan, SortOrder};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Storage folder offers' pictures are uploaded under.
const OFFER_IMAGE_FOLDER: &str = "vinted/offers";

// ============================================================================
// List
// ============================================================================

/// Query parameters accepted by the list endpoint.
///
/// Price bounds are typed: malformed numeric strings are rejected with 400
/// before any query is built.
#[derive(Debug, Deserialize)]
pub struct OffersQuery {
    pub title: Option<String>,
    #[serde(rename = "priceMin")]
    pub price_min: Option<f64>,
    #[serde(rename = "priceMax")]
    pub price_max: Option<f64>,
    pub sort: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct OfferSummaryResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub product_name: String,
    pub product_price: f64,
}

#[derive(Serialize)]
pub struct OffersResponse {
    /// Total number of offers matching the filter, independent of pagination.
    pub count: u64,
    pub offers: Vec<OfferSummaryResponse>,
}

/// List offers with filtering, sorting, and pagination.
pub async fn list_offers(
    State(state): State<AppState>,
    Query(params): Query<OffersQuery>,
) -> ApiResult<Json<OffersResponse>> {
    let filter = OfferFilter {
        title: params.title,
        price_min: params.price_min,
        price_max: params.price_max,
    };
    let sort = SortOrder::from_param(params.sort.as_deref());
    let plan = PagePlan::new(params.page, params.limit);

    let offers = state.offers.find_page(&filter, sort, plan).await?;
    let count = state.offers.count(&filter).await?;

    Ok(Json(OffersResponse {
        count,
        offers: offers
            .into_iter()
            .map(|o| OfferSummaryResponse {
                id: o.id.to_hex(),
                product_name: o.product_name,
                product_price: o.product_price,
            })
            .collect(),
    }))
}

// ============================================================================
// Detail
// ============================================================================

#[derive(Serialize)]
pub struct OfferDetailResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub product_name: String,
    pub product_description: String,
    pub product_price: f64,
    pub product_details: Vec<ProductDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_image: Option<ImageDescriptor>,
    /// Owner reference resolved into username and email.
    pub owner: Option<OwnerSummary>,
    pub created_at: String,
}

/// Fetch one offer by id, resolving the owner's username and email.
pub async fn get_offer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<OfferDetailResponse>> {
    let oid = ObjectId::parse_str(&id).map_err(MongoError::from)?;

    let offer = state
        .offers
        .get(oid)
        .await?
        .ok_or_else(|| ApiError::bad_request("Offer not found"))?;

    let owner = state.users.find_by_id(offer.owner).await?;

    Ok(Json(OfferDetailResponse {
        id: offer.id.to_hex(),
        product_name: offer.product_name,
        product_description: offer.product_description,
        product_price: offer.product_price,
        product_details: offer.product_details,
        product_image: offer.product_image,
        owner: owner.as_ref().map(OwnerSummary::from),
        created_at: offer.created_at.try_to_rfc3339_string().unwrap_or_default(),
    }))
}

// ============================================================================
// Publish
// ============================================================================

/// Validated publish input, collected from the multipart body.
#[derive(Debug)]
pub struct PublishForm {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub brand: String,
    pub size: String,
    pub condition: String,
    pub color: String,
    pub city: String,
    pub picture: Vec<u8>,
    pub picture_content_type: String,
}

impl PublishForm {
    /// Collect and validate the multipart fields.
    async fn from_multipart(mut multipart: Multipart) -> ApiResult<Self> {
        let mut title = None;
        let mut description = None;
        let mut price = None;
        let mut brand = None;
        let mut size = None;
        let mut condition = None;
        let mut color = None;
        let mut city = None;
        let mut picture = None;
        let mut picture_content_type = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "picture" => {
                    picture_content_type = Some(
                        field
                            .content_type()
                            .unwrap_or("application/octet-stream")
                            .to_string(),
                    );
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Failed to read picture: {}", e)))?;
                    picture = Some(bytes.to_vec());
                }
                _ => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(format!("Failed to read field {}: {}", name, e)))?;
                    match name.as_str() {
                        "title" => title = Some(value),
                        "description" => description = Some(value),
                        "price" => price = Some(value),
                        "brand" => brand = Some(value),
                        "size" => size = Some(value),
                        "condition" => condition = Some(value),
                        "color" => color = Some(value),
                        "city" => city = Some(value),
                        // Unknown fields are ignored.
                        _ => {}
                    }
                }
            }
        }

        let price = price
            .ok_or_else(|| ApiError::bad_request("price is required"))?
            .parse::<f64>()
            .map_err(|_| ApiError::bad_request("price must be a number"))?;

        Ok(Self {
            title: title.ok_or_else(|| ApiError::bad_request("title is required"))?,
            description: description
                .ok_or_else(|| ApiError::bad_request("description is required"))?,
            price,
            brand: brand.unwrap_or_default(),
            size: size.unwrap_or_default(),
            condition: condition.unwrap_or_default(),
            color: color.unwrap_or_default(),
            city: city.unwrap_or_default(),
            picture: picture.ok_or_else(|| ApiError::bad_request("picture file is required"))?,
            picture_content_type: picture_content_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
        })
    }

    /// The five fixed attribute key/value pairs, in their canonical order.
    fn details(&self) -> Vec<ProductDetail> {
        vec![
            ProductDetail::new("MARQUE", &self.brand),
            ProductDetail::new("TAILLE", &self.size),
            ProductDetail::new("ETAT", &self.condition),
            ProductDetail::new("COULEUR", &self.color),
            ProductDetail::new("EMPLACEMENT", &self.city),
        ]
    }
}

#[derive(Serialize)]
pub struct PublishedOfferResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub product_name: String,
    pub product_description: String,
    pub product_price: f64,
    pub product_details: Vec<ProductDetail>,
    pub product_image: ImageDescriptor,
    /// Owner id; the reference is only resolved on detail fetch.
    pub owner: String,
    pub created_at: String,
}

/// Publish a new offer: upload the picture to the image host, then persist
/// the offer document carrying the returned descriptor.
///
/// The upload and the insert are two independent network calls with no
/// atomicity guarantee; if the insert fails, a best-effort destroy of the
/// uploaded image is attempted so it does not stay orphaned.
pub async fn publish_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<PublishedOfferResponse>> {
    let form = PublishForm::from_multipart(multipart).await?;

    let mut offer = Offer::new(
        form.title.clone(),
        form.description.clone(),
        form.price,
        form.details(),
        auth.user.id,
    );

    // Human-readable public id: the title plus the freshly assigned offer id.
    let public_id = format!("{} - {}", form.title, offer.id.to_hex());

    let image = state
        .cloudinary
        .upload_image(
            &form.picture,
            &form.picture_content_type,
            OFFER_IMAGE_FOLDER,
            &public_id,
        )
        .await?;

    let image_public_id = image.public_id.clone();
    offer.product_image = Some(image);

    if let Err(err) = state.offers.insert(&offer).await {
        if let Err(cleanup_err) = state.cloudinary.destroy_image(&image_public_id).await {
            warn!(
                public_id = %image_public_id,
                error = %cleanup_err,
                "Failed to clean up uploaded image after persistence failure"
            );
        }
        return Err(err.into());
    }

    let image = offer.product_image.unwrap_or_default();
    Ok(Json(PublishedOfferResponse {
        id: offer.id.to_hex(),
        product_name: offer.product_name,
        product_description: offer.product_description,
        product_price: offer.product_price,
        product_details: offer.product_details,
        product_image: image,
        owner: offer.owner.to_hex(),
        created_at: offer.created_at.try_to_rfc3339_string().unwrap_or_default(),
    }))
}
