//! # Wirerecord
//!
//! Typed attribute declaration and marshaling for schema-flexible key-value
//! stores.
//!
//! ## Features
//!
//! - **Declared Attributes**: A per-model registry binds each attribute name
//!   to a marshaler, a wire type tag, an optional key role and a
//!   mutation-tracking flag
//! - **Build Then Freeze**: Declarations happen on a builder; the sealed
//!   registry is immutable and safe for unsynchronized concurrent reads
//! - **Marshalers**: Stateless codecs converting raw values to canonical
//!   domain values (`type_cast`) and typed wire values (`serialize`)
//! - **Lazy Casting**: Instance stores keep raw values verbatim; casting
//!   happens on read and serialize, never on write
//! - **Strict Namespaces**: Attribute names and storage names are validated
//!   at declaration time, in both directions
//!
//! ## Quick Start
//!
//! ```rust
//! use wirerecord::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> WirerecordResult<()> {
//! let registry = Arc::new(
//!     Registry::builder()
//!         .string_attr("forum_uuid", AttrConfig::builder().hash_key(true).build())?
//!         .integer_attr("post_id", AttrConfig::builder().range_key(true).build())?
//!         .string_attr("title", AttrConfig::builder().database_attribute_name("PostTitle").build())?
//!         .datetime_attr("created_at", AttrConfig::default())?
//!         .string_set_attr("tags", AttrConfig::default())?
//!         .build(),
//! );
//!
//! let mut post = Item::new(Arc::clone(&registry));
//! post.write_attribute("forum_uuid", "f-2481")?;
//! post.write_attribute("post_id", 42)?;
//! post.write_attribute("title", "First post")?;
//!
//! assert_eq!(post.read_attribute("post_id")?, Value::Int(42));
//!
//! // The persistence collaborator reads typed wire values.
//! let wire = post.to_wire()?;
//! assert_eq!(wire.get("PostTitle"), Some(&WireValue::S("First post".to_string())));
//! # Ok(())
//! # }
//! ```

pub mod attribute;
pub mod errors;
pub mod item;
pub mod marshal;
pub mod prelude;
pub mod registry;
pub mod value;
pub mod wire;
