//! The browser seam: everything the extraction pipeline needs from a live DOM node.
//!
//! The pipeline is written against [`DomNode`] only. [`chrome`] implements it for
//! `chromiumoxide` element handles; tests use the in-memory tree in `memory`.

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::NodeSnapshot;

pub mod chrome;
#[cfg(test)]
pub(crate) mod memory;

/// A handle to one element of a rendered page.
///
/// Every method is a single browser round trip. Implementations must not retry; failures are
/// surfaced to the caller.
#[async_trait]
pub trait DomNode: Send + Sync + Sized {
    /// Reads the node's bounding rect, text flags and computed style.
    async fn snapshot(&self) -> Result<NodeSnapshot>;

    /// Direct element children, in document order.
    async fn children(&self) -> Result<Vec<Self>>;

    /// Lowercase tag names of every descendant element (not only direct children).
    async fn descendant_tag_names(&self) -> Result<Vec<String>>;

    async fn inner_html(&self) -> Result<String>;

    /// Serialized SVG markup of the node, with its computed text colour applied inline so that
    /// `currentColor` survives outside the page.
    async fn svg_markup(&self) -> Result<String>;

    /// Makes every element of the document transparent except this node, its ancestors and its
    /// descendants. The previous inline opacities are remembered for [`Self::restore_isolation`].
    async fn isolate(&self) -> Result<()>;

    /// Undoes [`Self::isolate`]. Calling it without a prior isolation is a no-op.
    async fn restore_isolation(&self) -> Result<()>;

    /// PNG capture of the node's box. May be empty if the browser produced no image.
    async fn screenshot_png(&self) -> Result<Vec<u8>>;
}
