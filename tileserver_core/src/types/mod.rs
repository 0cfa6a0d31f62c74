//! Contains types like blobs, tile coordinates, tile formats, layer types and metadata.

mod blob;
pub use blob::*;

mod layer_type;
pub use layer_type::*;

mod metadata;
pub use metadata::*;

mod tile_coord;
pub use tile_coord::*;

mod tile_format;
pub use tile_format::*;

mod tilejson;
pub use tilejson::*;
