use mongodb::bson::Bson;

use crate::config::Config;
use crate::db_mongo::models::{RestaurantRecord, ReviewRecord};
use crate::db_mongo::provision::ensure_collection;
use crate::db_mongo::queries::{self, display_id};
use crate::db_mongo::store::{CollectionRef, DocumentStore};
use crate::error::Result;

#[derive(Debug)]
pub struct RunSummary {
    pub restaurant_ids: Vec<Bson>,
    pub review_ids: Vec<Bson>,
    pub restaurants: Vec<RestaurantRecord>,
    /// Reviews of the first restaurant.
    pub reviews: Vec<ReviewRecord>,
}

/// Provision the collection, write two restaurants and two reviews of the
/// first one, then list restaurants and those reviews.
pub async fn run<S: DocumentStore>(store: &S, config: &Config) -> Result<RunSummary> {
    let target = ensure_collection(
        store,
        &config.db_name,
        &config.collection_name,
        config.throughput,
    )
    .await?;

    let mut restaurant_ids = Vec::new();
    for name in ["restaurant name 1", "restaurant name 2"] {
        let record = RestaurantRecord::new(name, "address", "description");
        restaurant_ids.push(queries::insert_restaurant(store, &target, &record).await?);
    }
    let first = restaurant_ids[0].clone();

    let mut review_ids = Vec::new();
    for (user_name, rating, text) in [("user 1", 3, "review text"), ("user 2", 4, "review text 2")] {
        let record = ReviewRecord::new(first.clone(), user_name, rating, text);
        review_ids.push(queries::insert_review(store, &target, &record).await?);
    }

    let restaurants = queries::find_restaurants(store, &target).await?;
    let reviews = queries::find_reviews_for(store, &target, &first).await?;

    println!("\nRestaurants in collection:");
    for record in &restaurants {
        let id = record.id.as_ref().map(display_id).unwrap_or_default();
        println!("{}, {}", record.name, id);
    }

    println!("\nReviews for restaurant 1:");
    for record in &reviews {
        println!("{}", record.review_text);
    }

    tracing::debug!(
        restaurants = restaurants.len(),
        reviews = reviews.len(),
        "Run complete"
    );

    Ok(RunSummary {
        restaurant_ids,
        review_ids,
        restaurants,
        reviews,
    })
}

/// Delete every document in the configured collection. Nothing is provisioned.
pub async fn clean<S: DocumentStore>(store: &S, config: &Config) -> Result<u64> {
    let target = CollectionRef::new(&config.db_name, &config.collection_name);
    queries::delete_all(store, &target).await
}
