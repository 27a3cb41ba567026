//! Asset handling around custom nodes: which uploaded files a document references, and the
//! rules uploads have to satisfy before they become custom nodes.

pub mod metadata;
pub mod references;

pub use metadata::{format_file_size, validate_upload, AssetCategory, UploadedAsset};
pub use references::{extract_asset_ids, orphaned_assets};
