//! Channel element type for record streams.

/// An element flowing through a pipeline channel.
///
/// End of stream is its own variant, so a record whose fields happen to be
/// empty or zero can never be mistaken for the terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamItem<T> {
    /// A real record.
    Data(T),
    /// No further records will be sent on this channel.
    EndOfStream,
}

impl<T> StreamItem<T> {
    pub fn is_end(&self) -> bool {
        matches!(self, StreamItem::EndOfStream)
    }

    /// The contained record, if any.
    pub fn into_data(self) -> Option<T> {
        match self {
            StreamItem::Data(record) => Some(record),
            StreamItem::EndOfStream => None,
        }
    }
}

impl<T> From<T> for StreamItem<T> {
    fn from(record: T) -> Self {
        StreamItem::Data(record)
    }
}
