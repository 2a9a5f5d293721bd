//! Read-only access to the site's CMS documents.
//!
//! The advisor only needs the service catalog, but the store serves every
//! document type the site renders. [`SanityClient`] talks to the hosted CMS,
//! [`StaticContentStore`] serves built-in documents, and
//! [`FallbackContentStore`] combines the two.

mod fallback;
mod sanity;
mod store;

pub use fallback::{FallbackContentStore, StaticContentStore};
pub use sanity::{SanityClient, SanityConfig};
pub use store::{ContentStore, ContentType};
