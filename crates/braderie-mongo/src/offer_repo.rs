//! Typed repository for offers.

use bson::doc;
use bson::oid::ObjectId;
use futures_util::TryStreamExt;
use mongodb::Collection;
use tracing::info;

use braderie_models::{Offer, OfferSummary};

use crate::client::MongoHandle;
use crate::error::MongoResult;
use crate::query::{OfferFilter, PagePlan, SortOrder};

const COLLECTION: &str = "offers";

/// Repository for offer documents.
#[derive(Clone)]
pub struct OfferRepository {
    collection: Collection<Offer>,
}

impl OfferRepository {
    /// Create a new offer repository.
    pub fn new(handle: &MongoHandle) -> Self {
        Self {
            collection: handle.collection(COLLECTION),
        }
    }

    /// Insert a fully built offer document.
    pub async fn insert(&self, offer: &Offer) -> MongoResult<()> {
        self.collection.insert_one(offer).await?;
        info!(offer_id = %offer.id, "Created offer record");
        Ok(())
    }

    /// Fetch one offer by id.
    pub async fn get(&self, id: ObjectId) -> MongoResult<Option<Offer>> {
        let offer = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(offer)
    }

    /// List one page of offers matching the filter, projected down to name
    /// and price.
    pub async fn find_page(
        &self,
        filter: &OfferFilter,
        sort: SortOrder,
        plan: PagePlan,
    ) -> MongoResult<Vec<OfferSummary>> {
        let collection = self.collection.clone_with_type::<OfferSummary>();
        let mut find = collection
            .find(filter.to_document())
            .projection(doc! { "product_name": 1, "product_price": 1 })
            .skip(plan.skip)
            .limit(plan.limit);

        if let Some(sort_doc) = sort.to_document() {
            find = find.sort(sort_doc);
        }

        let offers = find.await?.try_collect().await?;
        Ok(offers)
    }

    /// Count all offers matching the filter, independent of pagination.
    pub async fn count(&self, filter: &OfferFilter) -> MongoResult<u64> {
        let count = self.collection.count_documents(filter.to_document()).await?;
        Ok(count)
    }
}
