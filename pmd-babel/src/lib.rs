//! Conversion engine between the editor document tree and portable markdown
//!
//!     The editor works on a typed document tree. Posts are stored and transmitted as portable
//!     text: Markdown plus single-line directives for the custom nodes (image, video and file
//!     attachments) Markdown cannot express. This crate converts between the two, renders stored
//!     text as HTML for read-only views, and reports which uploaded assets a document uses.
//!
//!     This is a pure lib: it powers pmd-cli but is shell agnostic. No code here prints, reads
//!     env vars or touches the file system.
//!
//! Architecture
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # FormatError, AssetError
//!     ├── tree.rs                 # Document tree model
//!     ├── directives.rs           # Custom node registry (directive schema)
//!     ├── converter.rs            # Converter facade and options
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── common
//!     │   ├── fences.rs           # Fenced code pre-scan
//!     │   └── placeholders.rs     # Directive placeholders
//!     ├── assets
//!     │   ├── references.rs       # Asset id extraction, orphan detection
//!     │   └── metadata.rs         # Upload categories, limits, sizes
//!     └── formats
//!         ├── portable            # Storage format (parser.rs, serializer.rs)
//!         ├── json                # Editor JSON snapshots
//!         └── html                # Read-only HTML output
//!
//! Testing
//!     tests
//!     └── <area>
//!         └── <testname>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Core Algorithms
//!
//!     Serialization is a single exhaustive walk over the tree, see
//!     ./formats/portable/serializer.rs.
//!
//!     Parsing runs in three passes. Directives are first swapped for placeholder tokens, skipping
//!     fenced code blocks (./common/fences.rs, ./common/placeholders.rs). The remaining Markdown is
//!     parsed by comrak. Placeholders are then resolved: into custom nodes, splitting the paragraph
//!     around them, or back into literal directive text where a block cannot go.
//!
//!     Every direction reads the directive schema from one place, the [`DirectiveRegistry`]. The
//!     matcher regex of each kind is generated from its attribute list, so emitting and matching
//!     cannot drift apart.
//!
//! Formats
//!
//!     Formats implement the Format trait (./format.rs) and are looked up by name or file
//!     extension through the FormatRegistry:
//!     - portable: parse and serialize (md, markdown, pmd)
//!     - json: parse and serialize editor snapshots (json)
//!     - html: serialize only (html, htm)
//!
//! Library Choices
//!
//!     Markdown parsing and rendering is offloaded to comrak; custom node elements are built with
//!     html5ever/rcdom. We only write the tree adapters and the directive layer.

pub mod assets;
pub mod common;
pub mod converter;
pub mod directives;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;
pub mod tree;

pub use assets::{extract_asset_ids, orphaned_assets};
pub use converter::{Converter, ConverterOptions};
pub use directives::{DirectiveRegistry, DirectiveSpec};
pub use error::{AssetError, FormatError};
pub use format::Format;
pub use registry::FormatRegistry;
pub use tree::{AssetAttrs, CustomKind, CustomNode, Mark, MarkKind, Marks, Node};
