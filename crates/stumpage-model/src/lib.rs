pub mod enums;
pub mod error;
pub mod record;
pub mod table;

pub use enums::{MergePolicy, PeriodType, PriceUnit};
pub use error::{ModelError, Result};
pub use record::{CanonicalRecord, RecordKey, UNIFIED_COLUMNS};
pub use table::{ClassifiedRow, RawTable, RawTableRow, SectionContext};
