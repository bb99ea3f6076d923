pub mod client;
pub mod error;
pub mod listing;
pub mod normalize;
pub mod product_number;
pub mod types;

pub use client::{DouglasClient, RenderService};
pub use error::ScraperError;
pub use listing::{ListingPage, ListingSelectors};
pub use normalize::normalize_product;
pub use product_number::{extract_product_number, resolve_product_numbers};
pub use types::ProductDetail;
