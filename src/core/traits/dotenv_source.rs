use std::collections::HashMap;
use std::path::Path;

use crate::core::errors::Result;

/// A loaded dotenv mapping.
pub type DotenvMap = HashMap<String, String>;

/// Port for loading the dotenv mapping of one environment.
///
/// `Ok(None)` means no mapping applies to `environment` (the file belongs to
/// another environment); `Ok(Some(map))` with an empty map means the mapping
/// was loaded but defines nothing. Resolution treats the two differently
/// only in what it reports, never in which values it finds.
pub trait DotenvSource: Send + Sync {
    fn load(&self, environment: &str, path: &Path) -> Result<Option<DotenvMap>>;
}
