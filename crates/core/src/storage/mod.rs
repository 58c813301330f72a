mod attributes;
mod condition;
mod error;
mod http_mapping;
mod traits;
mod types;
mod update;

pub use attributes::{
    get_datetime, get_i64, get_optional_datetime, get_optional_string, get_string, get_string_map,
    string_map_value,
};
pub use condition::{render_key_condition, Condition, Placeholders, SortKeyCondition};
pub use error::{Result, StoreError, ACCESS_DENIED, VALIDATION};
pub use http_mapping::store_error_to_status_code;
pub use traits::{KvBackend, MAX_BATCH_WRITE_ITEMS};
pub use types::{
    AttrValue, Index, Item, Key, QueryInput, QueryPage, ScanDirection, Timestamps, WriteRequest,
};
pub use update::{
    build_update_expression, FieldPatch, PatchField, PatchValue, SetAction, UpdateExpression,
};
