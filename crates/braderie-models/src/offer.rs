//! Offer (product listing) models.

use std::collections::HashMap;
use std::fmt;

use bson::oid::ObjectId;
use bson::DateTime;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One attribute of a listing, stored on the wire as a single-entry object
/// such as `{"MARQUE": "Zara"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetail {
    pub label: String,
    pub value: String,
}

impl ProductDetail {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl Serialize for ProductDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.label, &self.value)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProductDetail {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DetailVisitor;

        impl<'de> Visitor<'de> for DetailVisitor {
            type Value = ProductDetail;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a single-entry map of attribute label to value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let (label, value) = map
                    .next_entry::<String, String>()?
                    .ok_or_else(|| serde::de::Error::invalid_length(0, &self))?;
                // Extra entries are ignored; the canonical form has exactly one.
                while map.next_entry::<String, String>()?.is_some() {}
                Ok(ProductDetail { label, value })
            }
        }

        deserializer.deserialize_map(DetailVisitor)
    }
}

/// Image descriptor returned by the hosting provider.
///
/// Only `secure_url` and `public_id` are read back by the backend; everything
/// else the provider returns is carried along untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub secure_url: String,
    pub public_id: String,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A product listing stored in the `offers` collection.
///
/// Immutable after creation: there are no update or delete operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub product_name: String,
    pub product_description: String,
    pub product_price: f64,
    pub product_details: Vec<ProductDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_image: Option<ImageDescriptor>,
    /// Reference to the owning user, resolved only on detail fetch.
    pub owner: ObjectId,
    pub created_at: DateTime,
}

impl Offer {
    /// Build a new offer with a freshly generated id and the given owner.
    pub fn new(
        product_name: impl Into<String>,
        product_description: impl Into<String>,
        product_price: f64,
        product_details: Vec<ProductDetail>,
        owner: ObjectId,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            product_name: product_name.into(),
            product_description: product_description.into(),
            product_price,
            product_details,
            product_image: None,
            owner,
            created_at: DateTime::now(),
        }
    }
}

/// The projection of an offer returned by the list endpoint: name and price
/// only, besides the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub product_name: String,
    pub product_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_detail_serializes_as_single_entry_map() {
        let detail = ProductDetail::new("MARQUE", "Zara");
        let json = serde_json::to_string(&detail).unwrap();
        assert_eq!(json, r#"{"MARQUE":"Zara"}"#);
    }

    #[test]
    fn product_detail_round_trips() {
        let detail = ProductDetail::new("TAILLE", "M");
        let json = serde_json::to_string(&detail).unwrap();
        let back: ProductDetail = serde_json::from_str(&json).unwrap();
        assert_eq!(back, detail);
    }

    #[test]
    fn product_detail_rejects_empty_map() {
        let result: Result<ProductDetail, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn offer_bson_round_trips() {
        let owner = ObjectId::new();
        let offer = Offer::new(
            "Chaise",
            "Une chaise en bois",
            25.0,
            vec![
                ProductDetail::new("MARQUE", "Ikea"),
                ProductDetail::new("ETAT", "Bon"),
            ],
            owner,
        );

        let doc = bson::to_document(&offer).unwrap();
        let back: Offer = bson::from_document(doc).unwrap();
        assert_eq!(back.id, offer.id);
        assert_eq!(back.product_name, "Chaise");
        assert_eq!(back.product_price, 25.0);
        assert_eq!(back.product_details.len(), 2);
        assert_eq!(back.owner, owner);
    }

    #[test]
    fn image_descriptor_keeps_provider_metadata() {
        let json = r#"{
            "secure_url": "https://res.example.com/image/upload/v1/vinted/offers/abc.jpg",
            "public_id": "vinted/offers/abc",
            "width": 800,
            "format": "jpg"
        }"#;
        let image: ImageDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(image.public_id, "vinted/offers/abc");
        assert_eq!(image.extra["width"], 800);
        assert_eq!(image.extra["format"], "jpg");
    }
}
