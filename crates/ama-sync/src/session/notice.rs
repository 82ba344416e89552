//! Session notices

use ama_core::{FetchError, RankedView};
use ama_stream::{StreamGap, StreamState};

use crate::reaction::ReactionFailure;

/// Published by the session loop for the UI layer
#[derive(Debug, Clone)]
pub enum SessionNotice {
    /// The ranked view changed (store content or the viewer's flags)
    ViewChanged(RankedView),
    /// The snapshot fetch failed; the session keeps running on stream events
    SnapshotFailed(FetchError),
    /// A reaction toggle was rolled back
    ReactionFailed(ReactionFailure),
    /// The event stream changed state
    StreamState(StreamState),
    /// The event stream reconnected; events may have been missed
    StreamGap(StreamGap),
}
