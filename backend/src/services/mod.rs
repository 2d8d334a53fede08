//! Service layer: pure processing between the source client and the
//! published snapshot.

pub mod checksum;
pub mod launch_map;
pub mod transform;

pub use checksum::{calculate_checksum, fingerprint};
pub use launch_map::{escape_html, ArtifactBuilder, ArtifactError, MarkerMapBuilder};
pub use transform::{
    parse_net, transform, transform_with_report, transform_with_window, RecordRejection,
    TransformReport, FILTER_WINDOW_DAYS,
};
