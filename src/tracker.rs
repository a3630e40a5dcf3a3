mod detection;
mod history;
mod position;
mod rect;
mod record;
mod region;
mod selector;
mod session;
mod smoothness;
mod trail;

pub use detection::Detection;
pub use history::HistoryBuffer;
pub use position::Position;
pub use rect::Rect;
pub use record::{CSV_HEADER, CsvRecordSink, FrameRecord, RecordEmitter, RecordSink};
pub use region::RegionGate;
pub use selector::{Selection, SelectionPolicy};
pub use session::{FrameOutcome, Overlay, SessionConfig, TrackingSession};
pub use smoothness::{TurnFilter, angle_between_slopes};
pub use trail::{Segment, segments};
