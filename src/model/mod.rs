mod handle;
mod package;
mod record;
mod reference;
mod status;
mod version;

pub use handle::{Dialect, Handle};
pub use package::{Package, SourcePackage};
pub use record::{About, RefRecord, RepositoryRecord, VcsKind};
pub use reference::{RefKind, RefTarget};
pub use status::{ActivityStatus, ParseLabelError};
pub use version::Version;
