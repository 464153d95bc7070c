//! # grypi-index — Static Simple Index Maintenance
//!
//! Maintains the `grypi/` tree served as a PEP 503 "simple repository":
//!
//! - [`PackageIndex`]: the top-level `index.html`, one anchor per package.
//! - [`PackagePage`]: `grypi/<name>/index.html`, one anchor per version.
//! - [`Registrar`]: `register`, `update`, `delete` and `publish` over both.
//! - [`LedgerUpdater`]: the per-package JSON list of released metadata.
//!
//! Pages are edited through [`markup::Document`], which keeps the
//! hand-written markup and whitespace of the pages intact.
//!
//! ## Key Design Principles
//!
//! 1. **Normalized names are the key.** An index anchor's href is the
//!    PEP 503 normalized name plus `/`; no two anchors share one.
//!
//! 2. **Append only.** New packages and versions go after the last
//!    anchor; nothing is re-sorted.
//!
//! 3. **Guards before writes.** Conflicts are detected before any file
//!    is touched. Writes to different files are not atomic together.

pub mod args;
pub mod error;
pub mod index;
pub mod ledger;
pub mod markup;
pub mod page;
pub mod registrar;

pub use args::IndexArgs;
pub use error::{IndexError, IndexResult, LedgerError, LedgerResult, MarkupError};
pub use index::{PackageEntry, PackageIndex};
pub use ledger::{legacy_to_list, load_ledger, LedgerUpdate, LedgerUpdater};
pub use page::{egg_link, PackagePage, PageFields};
pub use registrar::{publish_args, Publication, Registrar};
