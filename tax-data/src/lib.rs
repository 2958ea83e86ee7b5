mod loader;

pub use loader::{CONTRIBUTION_SCHEME_CODE, TaxTableLoader, TaxTableLoaderError, TaxTableRecord};
