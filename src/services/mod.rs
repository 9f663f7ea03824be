// Service exports
pub mod cache;
pub mod sentiment;
pub mod supabase;

pub use cache::{CacheError, CacheKey, CacheManager, CachedReviews};
pub use sentiment::RemoteSentiment;
pub use supabase::{SupabaseClient, SupabaseError, SupabaseTables};
